//! Fixed-interval polling for runs and uploaded files.

use std::time::{Duration, Instant};

use scommon::{RunId, Sleeper, ThreadId};

use crate::{AssistantBackend, AssistantError, FileStatus, Run, RunHooks, RunStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Upper bound on status fetches; `None` polls until the run settles.
    pub max_polls: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            max_polls: None,
        }
    }
}

impl PollPolicy {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = Some(max_polls.max(1));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Completed(Run),
    RequiresAction(Run),
    Fatal(Run),
}

/// Fetches the run until it completes, needs tool outputs, or reaches a fatal status.
pub async fn poll_run_until(
    backend: &dyn AssistantBackend,
    thread_id: &ThreadId,
    run_id: &RunId,
    policy: &PollPolicy,
    sleeper: &dyn Sleeper,
    hooks: &dyn RunHooks,
) -> Result<PollOutcome, AssistantError> {
    let mut poll = 0_u32;

    loop {
        poll += 1;
        let run = backend.retrieve_run(thread_id, run_id).await?;
        hooks.on_run_polled(thread_id, run_id, run.status, poll);

        match run.status {
            RunStatus::Completed => return Ok(PollOutcome::Completed(run)),
            RunStatus::RequiresAction => return Ok(PollOutcome::RequiresAction(run)),
            status if status.is_fatal() => return Ok(PollOutcome::Fatal(run)),
            status => {
                if let Some(max_polls) = policy.max_polls
                    && poll >= max_polls
                {
                    return Err(AssistantError::run_terminal(
                        status,
                        format!("run {run_id} did not settle after {poll} poll(s)"),
                    ));
                }
            }
        }

        sleeper.sleep(policy.interval).await;
    }
}

/// Waits until an uploaded file is processed and returns its id.
pub async fn wait_for_file(
    backend: &dyn AssistantBackend,
    file_id: &str,
    policy: &PollPolicy,
    sleeper: &dyn Sleeper,
    hooks: &dyn RunHooks,
) -> Result<String, AssistantError> {
    let started = Instant::now();
    let mut poll = 0_u32;

    loop {
        poll += 1;
        let file = backend.retrieve_file(file_id).await?;

        match file.status {
            FileStatus::Processed => {
                hooks.on_file_ready(&file.id, started.elapsed());
                return Ok(file.id);
            }
            FileStatus::Error => {
                let details = file
                    .status_details
                    .unwrap_or_else(|| "no details reported".to_string());
                return Err(AssistantError::upload(format!(
                    "file {file_id} failed processing: {details}"
                )));
            }
            FileStatus::Uploaded => {
                if let Some(max_polls) = policy.max_polls
                    && poll >= max_polls
                {
                    return Err(AssistantError::upload(format!(
                        "file {file_id} was not processed after {poll} poll(s)"
                    )));
                }
            }
        }

        sleeper.sleep(policy.interval).await;
    }
}
