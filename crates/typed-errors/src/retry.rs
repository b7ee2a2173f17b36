//! Blocking retry driver.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::backoff::Backoff;
use crate::checks::{ErrorChecker, RetryableErrorCheck};
use crate::error::TypedError;

/// Total number of times [`do_with_retries`] invokes the operation.
pub const MAX_ATTEMPTS: u32 = 5;

/// Blocks the calling thread for the given duration.
pub type Sleeper = Arc<dyn Fn(Duration) + Send + Sync>;

/// Settings for [`do_with_retries`].
///
/// Defaults: 2s minimum backoff, 5min maximum, factor 2, no jitter, retry on
/// the `Retryable` flag, sleep with [`std::thread::sleep`].
#[derive(Clone)]
pub struct RetryConfig {
    pub backoff: Backoff,
    pub checker: Arc<dyn RetryableErrorCheck + Send + Sync>,
    pub sleeper: Sleeper,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            backoff: Backoff::default(),
            checker: Arc::new(ErrorChecker),
            sleeper: Arc::new(std::thread::sleep),
        }
    }
}

impl fmt::Debug for RetryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryConfig")
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_min_backoff(mut self, min: Duration) -> Self {
        self.backoff.min = min;
        self
    }

    #[must_use]
    pub fn with_max_backoff(mut self, max: Duration) -> Self {
        self.backoff.max = max;
        self
    }

    #[must_use]
    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff.factor = factor;
        self
    }

    #[must_use]
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.backoff.jitter = jitter;
        self
    }

    #[must_use]
    pub fn with_jitter_seed(mut self, seed: u64) -> Self {
        self.backoff.jitter_seed = Some(seed);
        self
    }

    /// Replaces the predicate deciding which failures are retried.
    #[must_use]
    pub fn with_checker(mut self, checker: impl RetryableErrorCheck + Send + Sync + 'static) -> Self {
        self.checker = Arc::new(checker);
        self
    }

    #[must_use]
    pub fn with_sleeper(mut self, sleeper: impl Fn(Duration) + Send + Sync + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }
}

/// Error type of an operation driven by [`do_with_retries`].
///
/// Implemented for [`TypedError`] and for `Box<dyn Error + Send + Sync>`.
/// Other error types implement it directly, or are boxed first.
pub trait RetryFailure: Sized {
    /// The value handed to the retryable check.
    fn as_error(&self) -> &(dyn StdError + 'static);

    /// The error reported when the final attempt failed with `self`.
    fn exhausted(self, attempts: u32) -> Self;
}

/// Keeps the last error's flags and HTTP message and prefixes its message
/// with `too many retries: `.
impl RetryFailure for TypedError {
    fn as_error(&self) -> &(dyn StdError + 'static) {
        self
    }

    fn exhausted(self, _attempts: u32) -> Self {
        let exhausted =
            TypedError::classified(self.flags(), format_args!("too many retries: {self}"));
        match self.http_message() {
            Some(http_message) => exhausted.with_http_message(http_message),
            None => exhausted,
        }
    }
}

impl RetryFailure for Box<dyn StdError + Send + Sync> {
    fn as_error(&self) -> &(dyn StdError + 'static) {
        &**self
    }

    fn exhausted(self, attempts: u32) -> Self {
        Box::new(RetriesExhausted {
            attempts,
            last: self,
        })
    }
}

/// Boxed error reported after every attempt failed. The last failure is its
/// source.
#[derive(Debug, Error)]
#[error("too many retries: {last}")]
pub struct RetriesExhausted {
    pub attempts: u32,
    #[source]
    pub last: Box<dyn StdError + Send + Sync>,
}

/// Runs `operation` until it succeeds, fails with a non-retryable error, or
/// has been invoked [`MAX_ATTEMPTS`] times.
///
/// A non-retryable error is returned exactly as the operation produced it.
/// After the final attempt the last error goes through
/// [`RetryFailure::exhausted`]. Between attempts the calling thread sleeps for
/// the configured backoff; no sleep follows a non-retryable failure or the
/// final attempt.
pub fn do_with_retries<T, E, F>(mut operation: F, config: &RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: RetryFailure,
{
    let mut attempt = 0;
    loop {
        let err = match operation() {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        attempt += 1;

        if !config.checker.is_retryable_error(err.as_error()) {
            trace!(attempt, error = %err.as_error(), "operation failed with a non-retryable error");
            return Err(err);
        }
        if attempt >= MAX_ATTEMPTS {
            warn!(attempts = attempt, error = %err.as_error(), "giving up after too many retries");
            return Err(err.exhausted(attempt));
        }

        let delay = config.backoff.duration_for(attempt - 1);
        debug!(
            attempt,
            ?delay,
            error = %err.as_error(),
            "retryable failure, backing off"
        );
        (config.sleeper)(delay);
    }
}

/// [`do_with_retries`] with [`RetryConfig::default`].
pub fn do_with_default_retries<T, E, F>(operation: F) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: RetryFailure,
{
    do_with_retries(operation, &RetryConfig::default())
}
