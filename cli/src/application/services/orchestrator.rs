//! Orchestrator — drives a provisioning profile to completion.
//!
//! Steps run strictly in declaration order on the calling task. The first
//! fatal error aborts the run; nothing is retried, rolled back, or
//! checkpointed.

use anyhow::{Context, Result};

use crate::application::ports::{Dialer, LocalGit, LocalWorkspace, ProgressReporter, RemoteShell};
use crate::application::services::connect::connect;
use crate::application::services::executor::{StepContext, StepOutcome};
use crate::domain::{ConnectPolicy, ConnectTarget, ProvisioningProfile};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Connecting,
    /// Executing the step at this zero-based index.
    Executing(usize),
    Done,
    /// A fatal error ended the run: at the step with this index, or while
    /// connecting when `None`.
    Aborted(Option<usize>),
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: usize,
    /// Steps whose remote error was on the allowlist.
    pub ignored: Vec<usize>,
}

/// Owns the run state and the step context for one provisioning run.
pub struct Orchestrator<'a, W, G, R> {
    ctx: StepContext<'a, W, G, R>,
    state: RunState,
}

impl<'a, W: LocalWorkspace, G: LocalGit, R: ProgressReporter> Orchestrator<'a, W, G, R> {
    #[must_use]
    pub fn new(ctx: StepContext<'a, W, G, R>) -> Self {
        Self {
            ctx,
            state: RunState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Establish the connection, retrying according to `policy`.
    ///
    /// # Errors
    ///
    /// Returns an error only when a bounded policy runs out of attempts.
    pub async fn connect<D: Dialer>(
        &mut self,
        dialer: &D,
        target: &ConnectTarget,
        policy: &ConnectPolicy,
    ) -> Result<D::Connection> {
        self.state = RunState::Connecting;
        let conn = match connect(dialer, target, policy, self.ctx.reporter).await {
            Ok(conn) => conn,
            Err(err) => {
                self.state = RunState::Aborted(None);
                return Err(err.into());
            }
        };
        self.ctx.reporter.success("Connection established.");
        Ok(conn)
    }

    /// Run every step of `profile` over `shell`, in order.
    ///
    /// # Errors
    ///
    /// Returns the first fatal step error, with the step number as context.
    /// No later step is executed.
    pub async fn run(
        &mut self,
        profile: &ProvisioningProfile,
        shell: &impl RemoteShell,
    ) -> Result<RunSummary> {
        let mut ignored = Vec::new();
        for (index, step) in profile.steps().iter().enumerate() {
            self.state = RunState::Executing(index);
            tracing::info!(step = index + 1, total = profile.len(), %step, "executing step");

            let outcome = self
                .ctx
                .execute(step, profile, shell)
                .await
                .with_context(|| format!("step {} of {} ({step}) failed", index + 1, profile.len()));

            match outcome {
                Ok(StepOutcome::Completed) => {}
                Ok(StepOutcome::IgnoredError(_)) => ignored.push(index),
                Err(err) => {
                    self.state = RunState::Aborted(Some(index));
                    return Err(err);
                }
            }
        }
        self.state = RunState::Done;
        Ok(RunSummary {
            steps: profile.len(),
            ignored,
        })
    }
}
