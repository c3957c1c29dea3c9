//! Push-file handshake over a single remote session.
//!
//! The remote sink (`scp -t`) only exits after it has consumed the whole
//! stream, and the session's stdin pipe has bounded capacity. The payload is
//! therefore written by a spawned task while the sink command runs on the
//! calling task. The writer owns the pipe and drops it on every path, so the
//! sink always observes end-of-stream. The sink result is only accepted once
//! the writer has been joined. A sink that exits early breaks the pipe; the
//! writer's error then only matters when the sink itself reported success.

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::application::ports::RemoteShell;
use crate::domain::{SessionError, StepError, push_header};

/// Capacity of the in-process pipe feeding the session's stdin.
pub const PIPE_CAPACITY: usize = 64 * 1024;

/// Outcome of a push whose sink returned an error on the allowlist.
#[derive(Debug, PartialEq, Eq)]
pub enum PushOutcome {
    Completed,
    /// The sink failed with an ignorable error; its text is kept for logs.
    Ignored(String),
}

/// Write `header`, `content` and the NUL trailer to `out`, then shut it down.
///
/// # Errors
///
/// Returns any I/O error from the underlying writer.
pub async fn write_push_stream<W>(out: &mut W, filename: &str, content: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(push_header(content.len(), filename).as_bytes())
        .await?;
    out.write_all(content).await?;
    out.write_all(&[0]).await?;
    out.shutdown().await
}

/// Push `content` as `filename` into the remote `sink_command`.
///
/// # Errors
///
/// Returns [`StepError::Transfer`] when the sink fails with a non-ignorable
/// error, and [`StepError::Payload`] when the sink succeeded but the payload
/// could not be written.
pub async fn push_file(
    shell: &impl RemoteShell,
    filename: &str,
    content: Vec<u8>,
    sink_command: &str,
) -> Result<PushOutcome, StepError> {
    let (input, mut pipe) = tokio::io::duplex(PIPE_CAPACITY);

    let name = filename.to_string();
    let writer = tokio::spawn(async move {
        let written = write_push_stream(&mut pipe, &name, &content).await;
        drop(pipe);
        written
    });

    let sink = shell.run_with_input(sink_command, input).await;

    let written = match writer.await {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(join) => Err(join.to_string()),
    };

    match sink {
        Ok(_) => written
            .map(|()| PushOutcome::Completed)
            .map_err(|reason| StepError::Payload {
                filename: filename.to_string(),
                reason,
            }),
        Err(err) if err.is_ignorable() => {
            if let Err(reason) = written {
                tracing::debug!(filename, %reason, "sink exited before reading the whole stream");
            }
            tracing::info!(filename, sink = sink_command, error = %err, "ignoring benign sink exit");
            Ok(PushOutcome::Ignored(err.to_string()))
        }
        Err(err) => Err(transfer_error(filename, sink_command, err)),
    }
}

fn transfer_error(filename: &str, sink: &str, source: SessionError) -> StepError {
    StepError::Transfer {
        filename: filename.to_string(),
        sink: sink.to_string(),
        source,
    }
}
