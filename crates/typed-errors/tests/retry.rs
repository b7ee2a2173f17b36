use std::cell::Cell;
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use http::StatusCode;
use typed_errors::{
    ErrorChecker, ErrorFlag, MAX_ATTEMPTS, NotFoundErrorCheck, ResponseSink, RetriesExhausted,
    RetryConfig, RetryFailure, RetryableErrorCheck, ToHttpResponse, TypedError, checks,
    do_with_retries,
};

type BoxError = Box<dyn Error + Send + Sync>;

fn recording_config() -> (RetryConfig, Arc<Mutex<Vec<Duration>>>) {
    let sleeps = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&sleeps);
    let config = RetryConfig::new()
        .with_sleeper(move |delay| recorded.lock().expect("sleep log").push(delay));
    (config, sleeps)
}

fn recorded(sleeps: &Arc<Mutex<Vec<Duration>>>) -> Vec<Duration> {
    sleeps.lock().expect("sleep log").clone()
}

#[test]
fn retry_succeeds_on_fifth_call_expected_five_calls_four_sleeps() {
    let (config, sleeps) = recording_config();
    let calls = Cell::new(0);

    let result = do_with_retries(
        || {
            calls.set(calls.get() + 1);
            if calls.get() < 5 {
                Err(TypedError::retryable("upstream busy"))
            } else {
                Ok("done")
            }
        },
        &config,
    );

    assert_eq!(result.expect("fifth call should succeed"), "done");
    assert_eq!(calls.get(), 5);
    assert_eq!(
        recorded(&sleeps),
        vec![
            Duration::from_secs(2),
            Duration::from_secs(4),
            Duration::from_secs(8),
            Duration::from_secs(16),
        ]
    );
}

#[test]
fn retry_always_retryable_expected_exhausted_with_last_message() {
    let (config, sleeps) = recording_config();
    let calls = Cell::new(0u32);

    let result: Result<(), _> = do_with_retries(
        || {
            calls.set(calls.get() + 1);
            Err(typed_errors::typed_error!(retryable, "attempt {} timed out", calls.get()))
        },
        &config,
    );

    let err = result.expect_err("all attempts should fail");
    assert_eq!(err.to_string(), "too many retries: attempt 5 timed out");
    assert_eq!(calls.get(), MAX_ATTEMPTS);
    assert_eq!(recorded(&sleeps).len(), 4);
}

#[test]
fn retry_exhausted_expected_last_classification_kept() {
    let (config, _sleeps) = recording_config();

    let err = do_with_retries(
        || Err::<(), _>(TypedError::retryable_with_http("try again soon", "still down")),
        &config,
    )
    .expect_err("all attempts should fail");

    assert!(checks::is_retryable_error(&err));
    assert!(err.flags().contains(ErrorFlag::Retryable));
    assert_eq!(err.to_string(), "too many retries: still down");
    assert_eq!(err.http_message(), Some("try again soon"));
}

#[test]
fn retry_non_retryable_expected_same_error_one_call_no_sleep() {
    let (config, sleeps) = recording_config();
    let calls = Cell::new(0);
    let original = TypedError::conflict_with_http("already exists", "row 4 exists");

    let result: Result<(), _> = do_with_retries(
        || {
            calls.set(calls.get() + 1);
            Err(original.clone())
        },
        &config,
    );

    let err = result.expect_err("conflict should not be retried");
    assert_eq!(err, original);
    assert_eq!(err.to_string(), "row 4 exists");
    assert_eq!(calls.get(), 1);
    assert!(recorded(&sleeps).is_empty());
}

#[test]
fn retry_non_retryable_after_retries_expected_stops_immediately() {
    let (config, sleeps) = recording_config();
    let calls = Cell::new(0);

    let result: Result<(), _> = do_with_retries(
        || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(TypedError::retryable("blip"))
            } else {
                Err(TypedError::forbidden("revoked"))
            }
        },
        &config,
    );

    let err = result.expect_err("forbidden should surface");
    assert!(err.is_forbidden());
    assert!(err.is_auth());
    assert_eq!(calls.get(), 3);
    assert_eq!(recorded(&sleeps).len(), 2);
}

#[test]
fn retry_first_call_succeeds_expected_no_sleep() {
    let (config, sleeps) = recording_config();

    let result = do_with_retries(|| Ok::<_, TypedError>(7), &config);

    assert_eq!(result.expect("should succeed"), 7);
    assert!(recorded(&sleeps).is_empty());
}

#[test]
fn retry_custom_backoff_expected_capped_schedule() {
    let (config, sleeps) = recording_config();
    let config = config
        .with_min_backoff(Duration::from_millis(100))
        .with_max_backoff(Duration::from_millis(500))
        .with_backoff_factor(3.0);

    let _ = do_with_retries(|| Err::<(), _>(TypedError::retryable("x")), &config);

    assert_eq!(
        recorded(&sleeps),
        vec![
            Duration::from_millis(100),
            Duration::from_millis(300),
            Duration::from_millis(500),
            Duration::from_millis(500),
        ]
    );
}

#[test]
fn retry_jitter_expected_sleeps_between_min_and_uncapped_delay() {
    let (config, sleeps) = recording_config();
    let config = config.with_jitter(true).with_jitter_seed(99);

    let _ = do_with_retries(|| Err::<(), _>(TypedError::retryable("x")), &config);

    let delays = recorded(&sleeps);
    assert_eq!(delays.len(), 4);
    for (attempt, delay) in delays.iter().enumerate() {
        let ceiling = Duration::from_secs(2 << attempt);
        assert!(*delay >= Duration::from_secs(2), "{delay:?}");
        assert!(*delay <= ceiling, "{delay:?} > {ceiling:?}");
    }
}

#[derive(Debug)]
struct StatusError(u16);

impl std::fmt::Display for StatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "status {}", self.0)
    }
}

impl Error for StatusError {}

impl RetryFailure for StatusError {
    fn as_error(&self) -> &(dyn Error + 'static) {
        self
    }

    fn exhausted(self, _attempts: u32) -> Self {
        self
    }
}

struct ServerErrorsRetry;

impl RetryableErrorCheck for ServerErrorsRetry {
    fn is_retryable_error(&self, err: &(dyn Error + 'static)) -> bool {
        err.downcast_ref::<StatusError>()
            .is_some_and(|status| status.0 >= 500)
    }
}

#[test]
fn retry_custom_checker_expected_foreign_errors_retried() {
    let (config, sleeps) = recording_config();
    let config = config.with_checker(ServerErrorsRetry);
    let responses = Cell::new(0);

    let result: Result<(), _> = do_with_retries(
        || {
            responses.set(responses.get() + 1);
            match responses.get() {
                1 => Err(StatusError(502)),
                2 => Err(StatusError(503)),
                _ => Err(StatusError(404)),
            }
        },
        &config,
    );

    let err = result.expect_err("404 is permanent");
    assert_eq!(err.0, 404);
    assert_eq!(responses.get(), 3);
    assert_eq!(recorded(&sleeps).len(), 2);
}

#[test]
fn retry_default_checker_expected_foreign_errors_not_retried() {
    let (config, sleeps) = recording_config();
    let calls = Cell::new(0);

    let result: Result<(), _> = do_with_retries(
        || {
            calls.set(calls.get() + 1);
            Err(StatusError(503))
        },
        &config,
    );

    assert!(matches!(result, Err(StatusError(503))));
    assert_eq!(calls.get(), 1);
    assert!(recorded(&sleeps).is_empty());
}

#[derive(Default)]
struct RecordingSink {
    writes: Vec<(StatusCode, String)>,
}

impl ResponseSink for RecordingSink {
    fn write_error(&mut self, status: StatusCode, body: &str) {
        self.writes.push((status, body.to_string()));
    }
}

struct Handler;

impl NotFoundErrorCheck for Handler {}
impl ToHttpResponse for Handler {}

#[test]
fn retry_non_retryable_expected_error_still_classified_and_renderable() {
    let (config, _sleeps) = recording_config();

    let err = do_with_retries(|| Err::<(), _>(TypedError::not_found("gone")), &config)
        .expect_err("not found should not be retried");

    assert!(checks::is_not_found_error(&err));
    assert!(Handler.is_not_found_error(&err));

    let mut sink = RecordingSink::default();
    assert_eq!(
        ErrorChecker.to_http_response(&err, &mut sink),
        Some(StatusCode::NOT_FOUND)
    );
    assert_eq!(
        Handler.to_http_response(&err, &mut sink),
        Some(StatusCode::NOT_FOUND)
    );
    assert_eq!(sink.writes.len(), 2);
    assert_eq!(sink.writes[0], (StatusCode::NOT_FOUND, "gone".to_string()));
}

#[test]
fn retry_boxed_typed_error_expected_retried_then_succeeds() {
    let (config, sleeps) = recording_config();
    let calls = Cell::new(0);

    let result = do_with_retries(
        || -> Result<&'static str, BoxError> {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(TypedError::retryable("busy").into())
            } else {
                Ok("ready")
            }
        },
        &config,
    );

    assert_eq!(result.expect("third call should succeed"), "ready");
    assert_eq!(calls.get(), 3);
    assert_eq!(recorded(&sleeps).len(), 2);
}

#[test]
fn retry_boxed_non_retryable_expected_same_box_returned() {
    let (config, sleeps) = recording_config();

    let err = do_with_retries(
        || -> Result<(), BoxError> { Err(TypedError::conflict("taken").into()) },
        &config,
    )
    .expect_err("conflict should not be retried");

    assert_eq!(err.downcast_ref::<TypedError>(), Some(&TypedError::conflict("taken")));
    assert!(checks::is_conflict_error(&*err));
    assert!(recorded(&sleeps).is_empty());
}

#[test]
fn retry_boxed_exhausted_expected_source_is_last_error() {
    let (config, sleeps) = recording_config();

    let err = do_with_retries(
        || -> Result<(), BoxError> { Err(TypedError::retryable("down").into()) },
        &config,
    )
    .expect_err("all attempts should fail");

    assert_eq!(err.to_string(), "too many retries: down");
    assert_eq!(recorded(&sleeps).len(), 4);

    let exhausted = err
        .downcast_ref::<RetriesExhausted>()
        .expect("exhaustion should be reported as RetriesExhausted");
    assert_eq!(exhausted.attempts, MAX_ATTEMPTS);
    let source = exhausted.source().expect("last error is the source");
    assert!(checks::is_retryable_error(source));
}
