use std::future::Future;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::ClientError;

/// Backoff schedule and iteration bound for operation polling. Injectable so
/// tests run with a zero-delay schedule.
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Delays applied between polls, cycled when exhausted.
    pub delays: Vec<Duration>,
    /// Hard cap on poll iterations. Reaching it is an explicit error.
    pub max_polls: usize,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            delays: [1u64, 2, 4, 8, 16, 30]
                .iter()
                .map(|&s| Duration::from_secs(s))
                .collect(),
            max_polls: 120,
        }
    }
}

impl PollOptions {
    /// Zero-delay schedule with a small bound, for tests.
    pub fn immediate(max_polls: usize) -> Self {
        Self {
            delays: vec![Duration::ZERO],
            max_polls,
        }
    }

    pub(crate) fn delay_for(&self, poll: usize) -> Duration {
        self.delays[poll % self.delays.len()]
    }
}

/// Repeatedly evaluate `probe` until it reports a value or the bound elapses.
///
/// The probe returns `Ok(Some(v))` when the awaited condition holds,
/// `Ok(None)` to keep waiting. Replaces fixed-duration sleeps around
/// state convergence: the caller names the condition, the schedule bounds
/// the wait, and timeout is an explicit error.
pub async fn poll_until<F, Fut, T>(
    opts: &PollOptions,
    what: &str,
    mut probe: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, ClientError>>,
{
    for poll in 0..opts.max_polls {
        if let Some(value) = probe().await? {
            return Ok(value);
        }
        let delay = opts.delay_for(poll);
        if (poll + 1) % 10 == 0 {
            info!(poll = poll + 1, what, "still waiting");
        } else {
            debug!(poll = poll + 1, what, delay_ms = delay.as_millis() as u64, "condition pending");
        }
        tokio::time::sleep(delay).await;
    }

    Err(ClientError::PollTimedOut {
        polls: opts.max_polls,
        url: what.to_string(),
    })
}
