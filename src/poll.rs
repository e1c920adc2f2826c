//! Waiting on assistant runs
//!
//! A run is checked once right after it is created and then after every
//! delay produced by the [`PollPolicy`], until it completes, fails, or the
//! policy's deadline passes.

use crate::ai::{AssistantsApi, Run, RunStatus};
use crate::{Error, Result};
use std::time::Duration;
use tokio_retry::strategy::{ExponentialBackoff, FixedInterval};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay before the second status check.
    pub interval: Duration,
    /// Factor applied to the delay after each check; `1` keeps it fixed.
    pub backoff: u32,
    /// Upper bound for a single delay.
    pub max_interval: Duration,
    /// Overall budget for the wait, measured from the first status check.
    pub deadline: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            backoff: 1,
            max_interval: Duration::from_secs(8),
            deadline: Duration::from_secs(120),
        }
    }
}

impl PollPolicy {
    /// Delays between consecutive status checks.
    pub fn delays(&self) -> Box<dyn Iterator<Item = Duration> + Send> {
        if self.backoff <= 1 {
            let interval = self.interval.min(self.max_interval);
            return Box::new(FixedInterval::new(interval));
        }

        // ExponentialBackoff yields `interval * base^n` for n = 1, 2, ...
        let base = u64::from(self.backoff);
        let interval_ms = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX);
        let first = self.interval.min(self.max_interval);
        Box::new(
            std::iter::once(first).chain(
                ExponentialBackoff::from_millis(base)
                    .factor(interval_ms)
                    .max_delay(self.max_interval),
            ),
        )
    }
}

/// Wait until the run completes.
///
/// Returns [`Error::RunFailed`] when the run settles in any other terminal
/// state and [`Error::RunTimedOut`] when the deadline passes first.
pub async fn wait_for_run(
    api: &dyn AssistantsApi,
    thread_id: &str,
    run_id: &str,
    policy: &PollPolicy,
) -> Result<Run> {
    match tokio::time::timeout(policy.deadline, poll_run(api, thread_id, run_id, policy)).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                "Run {} on thread {} still pending after {:?}",
                run_id, thread_id, policy.deadline
            );
            Err(Error::RunTimedOut(policy.deadline))
        }
    }
}

async fn poll_run(
    api: &dyn AssistantsApi,
    thread_id: &str,
    run_id: &str,
    policy: &PollPolicy,
) -> Result<Run> {
    let mut delays = policy.delays();
    let mut checks: u32 = 0;

    loop {
        let run = api.retrieve_run(thread_id, run_id).await?;
        checks += 1;

        if run.status == RunStatus::Completed {
            debug!("Run {} completed after {} status checks", run_id, checks);
            return Ok(run);
        }

        if run.status.is_failure() {
            warn!(
                "Run {} ended with status {} ({})",
                run_id,
                run.status.as_str(),
                run.last_error.as_deref().unwrap_or("no error detail")
            );
            return Err(Error::RunFailed {
                status: run.status.as_str().to_string(),
            });
        }

        let delay = delays.next().unwrap_or(policy.max_interval);
        debug!(
            "Run {} is {}; checking again in {:?}",
            run_id,
            run.status.as_str(),
            delay
        );
        tokio::time::sleep(delay).await;
    }
}
