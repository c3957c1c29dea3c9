//! Application service — establish the remote connection.
//!
//! Dials in an explicit loop while a ticker emits liveness notices. The
//! ticker lives only as long as the dial loop, so no notice is emitted once
//! the connection is up.

use tokio::time::{Instant, interval_at, sleep};

use crate::application::ports::{Dialer, ProgressReporter};
use crate::domain::{ConnectError, ConnectPolicy, ConnectTarget};

/// Notice emitted on every tick while dialing.
pub const TRYING_CONNECTION: &str = "Trying connection...";

/// Dial `target` until it succeeds or the policy's attempt bound is reached.
///
/// Authentication and network failures are both treated as transient.
///
/// # Errors
///
/// Returns [`ConnectError::Exhausted`] only when `policy.max_attempts` is set
/// and every attempt failed.
pub async fn connect<D: Dialer>(
    dialer: &D,
    target: &ConnectTarget,
    policy: &ConnectPolicy,
    reporter: &impl ProgressReporter,
) -> Result<D::Connection, ConnectError> {
    let attempts = dial_until_connected(dialer, target, policy);
    tokio::pin!(attempts);

    let mut ticks = interval_at(Instant::now() + policy.tick_interval, policy.tick_interval);
    loop {
        tokio::select! {
            biased;
            result = &mut attempts => return result,
            _ = ticks.tick() => reporter.tick(TRYING_CONNECTION),
        }
    }
}

async fn dial_until_connected<D: Dialer>(
    dialer: &D,
    target: &ConnectTarget,
    policy: &ConnectPolicy,
) -> Result<D::Connection, ConnectError> {
    sleep(policy.initial_delay).await;

    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match dialer.dial(target).await {
            Ok(conn) => {
                tracing::info!(%target, attempt, "connection established");
                return Ok(conn);
            }
            Err(err) => {
                tracing::warn!(%target, attempt, error = %format!("{err:#}"), "failed to dial");
                if policy.max_attempts.is_some_and(|max| attempt >= max) {
                    return Err(ConnectError::Exhausted {
                        target: target.to_string(),
                        attempts: attempt,
                        last: format!("{err:#}"),
                    });
                }
                tracing::debug!(%target, "trying again");
            }
        }
    }
}
