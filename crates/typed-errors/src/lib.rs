//! Classified errors for services.
//!
//! A [`TypedError`] carries a set of independent [`ErrorFlag`]s next to its
//! message. Downstream code asks what kind of failure it is through the
//! capability traits in [`checks`], renders it as an HTTP status with
//! [`TypedError::to_http_response`], or lets [`do_with_retries`] decide whether
//! to try again.
//!
//! ```
//! use std::error::Error;
//!
//! use typed_errors::{
//!     typed_error, AllErrorCheck, AuthErrorCheck, ClientErrorCheck, ConflictErrorCheck,
//!     NotFoundErrorCheck, NotImplementedErrorCheck, PreconditionFailedErrorCheck,
//!     RetryableErrorCheck,
//! };
//!
//! struct Service;
//!
//! impl AuthErrorCheck for Service {}
//! impl NotFoundErrorCheck for Service {}
//! impl NotImplementedErrorCheck for Service {}
//! impl ClientErrorCheck for Service {}
//! impl RetryableErrorCheck for Service {}
//! impl ConflictErrorCheck for Service {}
//! impl PreconditionFailedErrorCheck for Service {}
//!
//! fn describe(checks: &impl AllErrorCheck, err: &(dyn Error + 'static)) -> String {
//!     if checks.is_not_found_error(err) {
//!         return "resource not found".to_string();
//!     }
//!     if checks.is_not_implemented_error(err) {
//!         return "logic not implemented".to_string();
//!     }
//!     format!("got a generic error: {err}")
//! }
//!
//! let err = typed_error!(not_found, "something went wrong {}", "here");
//! assert_eq!(describe(&Service, &err), "resource not found");
//! ```

mod backoff;
pub mod checks;
mod error;
mod flags;
mod macros;
mod retry;
mod transport;

pub use crate::backoff::{
    Backoff, DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_BACKOFF, DEFAULT_MIN_BACKOFF,
};
pub use crate::checks::{
    AllErrorCheck, AuthErrorCheck, ClientErrorCheck, ConflictErrorCheck, ErrorChecker,
    NotFoundErrorCheck, NotImplementedErrorCheck, PreconditionFailedErrorCheck,
    RetryableErrorCheck,
};
pub use crate::error::{NOT_IMPLEMENTED_MESSAGE, TypedError};
pub use crate::flags::{ErrorFlag, ErrorFlags};
pub use crate::retry::{
    MAX_ATTEMPTS, RetriesExhausted, RetryConfig, RetryFailure, Sleeper, do_with_default_retries,
    do_with_retries,
};
pub use crate::transport::{ResponseSink, ToHttpResponse};

/// Re-exported so hosts can name statuses without depending on `http` directly.
pub use http::StatusCode;
