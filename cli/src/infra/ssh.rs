//! SSH transport — implements `Dialer` and `RemoteShell` over `russh`.
//!
//! One authenticated connection is reused for the whole run; every command
//! gets its own channel that is closed before the call returns.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use russh::client::{self, Handle, Msg};
use russh::{Channel, ChannelMsg, Disconnect, Sig};
use tokio::io::AsyncReadExt;

use crate::application::ports::{Dialer, RemoteShell, SessionInput};
use crate::domain::remote::ExitSignal;
use crate::domain::{ConnectTarget, RemoteExit, SessionError, SessionOutput};

/// Status reported for a command killed by a signal without an exit status.
const SIGNALLED_STATUS: u32 = 128;

/// Chunk size for forwarding session stdin.
const STDIN_CHUNK: usize = 32 * 1024;

/// Client-side handler. Host keys are accepted without verification.
pub struct ClientHandler;

#[async_trait]
impl client::Handler for ClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &russh_keys::key::PublicKey,
    ) -> Result<bool, Self::Error> {
        tracing::debug!(
            fingerprint = %server_public_key.fingerprint(),
            "accepting server host key"
        );
        Ok(true)
    }
}

/// Dials with password authentication.
pub struct SshDialer {
    config: Arc<client::Config>,
}

impl SshDialer {
    #[must_use]
    pub fn new() -> Self {
        let config = client::Config {
            inactivity_timeout: Some(Duration::from_secs(600)),
            ..client::Config::default()
        };
        Self {
            config: Arc::new(config),
        }
    }
}

impl Default for SshDialer {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialer for SshDialer {
    type Connection = SshConnection;

    async fn dial(&self, target: &ConnectTarget) -> Result<SshConnection> {
        let mut handle = client::connect(
            Arc::clone(&self.config),
            (target.host.as_str(), target.port),
            ClientHandler,
        )
        .await
        .with_context(|| format!("dial tcp {}:{}", target.host, target.port))?;

        let accepted = handle
            .authenticate_password(target.username.as_str(), target.password.expose())
            .await
            .context("ssh handshake")?;
        if !accepted {
            let _ = handle
                .disconnect(Disconnect::ByApplication, "", "en")
                .await;
            anyhow::bail!(
                "ssh: unable to authenticate, attempted methods [none password], no supported methods remain"
            );
        }
        Ok(SshConnection { handle })
    }
}

/// An authenticated SSH connection.
pub struct SshConnection {
    handle: Handle<ClientHandler>,
}

impl SshConnection {
    async fn open(&self, command: &str) -> Result<Channel<Msg>, SessionError> {
        let channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(|e| SessionError::Open(e.to_string()))?;
        channel
            .exec(true, command)
            .await
            .map_err(|e| SessionError::Transport(e.to_string()))?;
        Ok(channel)
    }
}

/// Exit information gathered from a channel.
#[derive(Debug, Default)]
struct Collected {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    status: Option<u32>,
    signal: Option<ExitSignal>,
}

impl Collected {
    /// Record `msg`; returns `false` once the channel is finished.
    fn absorb(&mut self, msg: Option<ChannelMsg>) -> bool {
        match msg {
            None | Some(ChannelMsg::Close) => return false,
            Some(ChannelMsg::Data { data }) => self.stdout.extend_from_slice(&data),
            Some(ChannelMsg::ExtendedData { data, .. }) => self.stderr.extend_from_slice(&data),
            Some(ChannelMsg::ExitStatus { exit_status }) => self.status = Some(exit_status),
            Some(ChannelMsg::ExitSignal {
                signal_name,
                error_message,
                lang_tag,
                ..
            }) => {
                self.signal = Some(ExitSignal {
                    name: signal_label(&signal_name),
                    message: error_message,
                    lang: lang_tag,
                });
            }
            Some(_) => {}
        }
        true
    }

    fn finish(self, command: &str) -> Result<SessionOutput, SessionError> {
        if !self.stderr.is_empty() {
            tracing::debug!(
                command,
                stderr = %String::from_utf8_lossy(&self.stderr).trim(),
                "remote stderr"
            );
        }
        classify_exit(self.status, self.signal)?;
        Ok(SessionOutput {
            stdout: self.stdout,
        })
    }
}

fn signal_label(sig: &Sig) -> String {
    match sig {
        Sig::Custom(name) => name.clone(),
        other => format!("{other:?}"),
    }
}

/// Turn what the remote reported into success or a [`RemoteExit`].
///
/// A signal without a status counts as status 128. Neither is an error of
/// its own kind.
fn classify_exit(status: Option<u32>, signal: Option<ExitSignal>) -> Result<(), SessionError> {
    let status = match (status, &signal) {
        (None, None) => return Err(SessionError::MissingStatus),
        (None, Some(_)) => SIGNALLED_STATUS,
        (Some(status), _) => status,
    };
    if status == 0 {
        return Ok(());
    }
    Err(RemoteExit { status, signal }.into())
}

/// Whether stdin forwarding continues after one write to the channel.
///
/// A failed write means the remote stopped reading; its exit status is still
/// collected from the channel.
fn keep_forwarding(command: &str, forwarded: Result<bool, russh::Error>) -> bool {
    match forwarded {
        Ok(open) => open,
        Err(e) => {
            tracing::debug!(command, error = %e, "remote stopped reading stdin");
            false
        }
    }
}

impl RemoteShell for SshConnection {
    async fn run(&self, command: &str) -> Result<SessionOutput, SessionError> {
        tracing::debug!(command, "opening session");
        let mut channel = self.open(command).await?;
        let mut collected = Collected::default();
        while collected.absorb(channel.wait().await) {}
        collected.finish(command)
    }

    async fn run_with_input(
        &self,
        command: &str,
        mut input: SessionInput,
    ) -> Result<SessionOutput, SessionError> {
        tracing::debug!(command, "opening session with stdin");
        let mut channel = self.open(command).await?;
        let mut collected = Collected::default();
        let mut buf = vec![0u8; STDIN_CHUNK];
        let mut input_open = true;

        loop {
            tokio::select! {
                read = input.read(&mut buf), if input_open => {
                    let forwarded = match read {
                        Ok(0) => channel.eof().await.map(|()| false),
                        Ok(n) => channel.data(&buf[..n]).await.map(|()| true),
                        Err(e) => return Err(SessionError::Transport(e.to_string())),
                    };
                    input_open = keep_forwarding(command, forwarded);
                }
                msg = channel.wait() => {
                    if !collected.absorb(msg) {
                        break;
                    }
                }
            }
        }
        collected.finish(command)
    }

    async fn disconnect(&self) -> Result<()> {
        self.handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
            .context("closing ssh connection")
    }
}
