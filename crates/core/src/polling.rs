//! Bounded polling loop for asynchronous generation jobs.
//!
//! [`poll_until_terminal`] is a pure retry loop: it knows nothing about
//! providers or persistence, only "poll once" via a caller-supplied async
//! closure. It can therefore back a client-driven status endpoint or a
//! server-side resumed poll identically.
//!
//! Exhausting the attempt bound is a *timeout*, not a failure: the job's
//! outcome is unknown and the owning scene must stay `processing`.

use std::future::Future;
use std::time::Duration;

/// Default number of poll attempts (120 x 5s = 10 minutes).
pub const DEFAULT_POLL_ATTEMPTS: u32 = 120;

/// Default interval between poll attempts.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Result of a single poll attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// The job is still pending or processing.
    InProgress,
    /// The job finished successfully with an artifact reference.
    Completed(T),
    /// The job finished unsuccessfully.
    Failed(String),
}

/// Terminal result of a bounded polling loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalResult<T> {
    Completed(T),
    Failed(String),
    /// The attempt bound was exhausted while the job was still in
    /// progress. Outcome unknown; the caller may re-invoke later.
    TimedOut,
}

/// Poll `poll_once` until it reports a terminal outcome, up to
/// `max_attempts` attempts spaced `interval` apart.
///
/// The first attempt runs immediately; the sleep only happens between
/// attempts. Errors from `poll_once` abort the loop and propagate — a
/// poll that cannot be performed is different from a job still running.
pub async fn poll_until_terminal<T, E, F, Fut>(
    mut poll_once: F,
    interval: Duration,
    max_attempts: u32,
) -> Result<TerminalResult<T>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PollOutcome<T>, E>>,
{
    for attempt in 0..max_attempts {
        if attempt > 0 {
            tokio::time::sleep(interval).await;
        }
        match poll_once().await? {
            PollOutcome::InProgress => continue,
            PollOutcome::Completed(artifact) => return Ok(TerminalResult::Completed(artifact)),
            PollOutcome::Failed(message) => return Ok(TerminalResult::Failed(message)),
        }
    }
    Ok(TerminalResult::TimedOut)
}
