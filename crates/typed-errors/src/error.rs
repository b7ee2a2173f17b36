//! The classified error value.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::flags::{ErrorFlag, ErrorFlags};

/// Message used by [`TypedError::unimplemented`].
pub const NOT_IMPLEMENTED_MESSAGE: &str = "not implemented";

/// An operation failure tagged with classification flags.
///
/// The payload is stringified once at construction; `Display` returns it
/// verbatim, without any of the flags. `http_message`, when present, replaces
/// the payload in HTTP responses only.
///
/// There are no `&mut self` methods. The `with_*` helpers consume the value and
/// return a new one.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypedError {
    flags: ErrorFlags,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    http_message: Option<String>,
}

impl TypedError {
    /// Generic error with no classification.
    pub fn new(data: impl fmt::Display) -> Self {
        Self::classified(ErrorFlags::empty(), data)
    }

    pub fn new_with_http(http_message: impl Into<String>, data: impl fmt::Display) -> Self {
        Self::new(data).with_http_message(http_message)
    }

    /// Error carrying exactly `flags`.
    pub fn classified(flags: ErrorFlags, data: impl fmt::Display) -> Self {
        Self {
            flags,
            message: data.to_string(),
            http_message: None,
        }
    }

    pub fn client(data: impl fmt::Display) -> Self {
        Self::classified(ErrorFlag::ClientError.into(), data)
    }

    pub fn client_with_http(http_message: impl Into<String>, data: impl fmt::Display) -> Self {
        Self::client(data).with_http_message(http_message)
    }

    /// Auth error that is neither specifically forbidden nor unauthorized.
    pub fn auth(data: impl fmt::Display) -> Self {
        Self::classified(ErrorFlag::Auth.into(), data)
    }

    pub fn auth_with_http(http_message: impl Into<String>, data: impl fmt::Display) -> Self {
        Self::auth(data).with_http_message(http_message)
    }

    /// Sets both `Auth` and `Forbidden`.
    pub fn forbidden(data: impl fmt::Display) -> Self {
        Self::classified(
            ErrorFlags::from_flag(ErrorFlag::Auth).with(ErrorFlag::Forbidden),
            data,
        )
    }

    pub fn forbidden_with_http(http_message: impl Into<String>, data: impl fmt::Display) -> Self {
        Self::forbidden(data).with_http_message(http_message)
    }

    /// Sets both `Auth` and `Unauthorized`.
    pub fn unauthorized(data: impl fmt::Display) -> Self {
        Self::classified(
            ErrorFlags::from_flag(ErrorFlag::Auth).with(ErrorFlag::Unauthorized),
            data,
        )
    }

    pub fn unauthorized_with_http(
        http_message: impl Into<String>,
        data: impl fmt::Display,
    ) -> Self {
        Self::unauthorized(data).with_http_message(http_message)
    }

    pub fn not_found(data: impl fmt::Display) -> Self {
        Self::classified(ErrorFlag::NotFound.into(), data)
    }

    pub fn not_found_with_http(http_message: impl Into<String>, data: impl fmt::Display) -> Self {
        Self::not_found(data).with_http_message(http_message)
    }

    pub fn not_implemented(data: impl fmt::Display) -> Self {
        Self::classified(ErrorFlag::NotImplemented.into(), data)
    }

    /// Not-implemented error with the stock [`NOT_IMPLEMENTED_MESSAGE`].
    pub fn unimplemented() -> Self {
        Self::not_implemented(NOT_IMPLEMENTED_MESSAGE)
    }

    pub fn not_implemented_with_http(
        http_message: impl Into<String>,
        data: impl fmt::Display,
    ) -> Self {
        Self::not_implemented(data).with_http_message(http_message)
    }

    /// Transient failure; the retry driver's default checker retries these.
    pub fn retryable(data: impl fmt::Display) -> Self {
        Self::classified(ErrorFlag::Retryable.into(), data)
    }

    pub fn retryable_with_http(http_message: impl Into<String>, data: impl fmt::Display) -> Self {
        Self::retryable(data).with_http_message(http_message)
    }

    pub fn conflict(data: impl fmt::Display) -> Self {
        Self::classified(ErrorFlag::Conflict.into(), data)
    }

    pub fn conflict_with_http(http_message: impl Into<String>, data: impl fmt::Display) -> Self {
        Self::conflict(data).with_http_message(http_message)
    }

    pub fn precondition_failed(data: impl fmt::Display) -> Self {
        Self::classified(ErrorFlag::PreconditionFailed.into(), data)
    }

    pub fn precondition_failed_with_http(
        http_message: impl Into<String>,
        data: impl fmt::Display,
    ) -> Self {
        Self::precondition_failed(data).with_http_message(http_message)
    }

    /// Returns a copy of this error whose HTTP body is `http_message`.
    #[must_use]
    pub fn with_http_message(self, http_message: impl Into<String>) -> Self {
        Self {
            http_message: Some(http_message.into()),
            ..self
        }
    }

    /// Returns a copy of this error with `flag` added.
    #[must_use]
    pub fn with_flag(self, flag: ErrorFlag) -> Self {
        Self {
            flags: self.flags.with(flag),
            ..self
        }
    }

    pub fn flags(&self) -> ErrorFlags {
        self.flags
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn http_message(&self) -> Option<&str> {
        self.http_message.as_deref()
    }

    /// True when no flag is set.
    pub fn is_generic(&self) -> bool {
        self.flags.is_empty()
    }

    /// True for `Auth`, `Unauthorized` or `Forbidden`.
    pub fn is_auth(&self) -> bool {
        self.flags.is_auth()
    }

    pub fn is_unauthorized(&self) -> bool {
        self.flags.contains(ErrorFlag::Unauthorized)
    }

    pub fn is_forbidden(&self) -> bool {
        self.flags.contains(ErrorFlag::Forbidden)
    }

    pub fn is_client(&self) -> bool {
        self.flags.contains(ErrorFlag::ClientError)
    }

    pub fn is_not_found(&self) -> bool {
        self.flags.contains(ErrorFlag::NotFound)
    }

    pub fn is_not_implemented(&self) -> bool {
        self.flags.contains(ErrorFlag::NotImplemented)
    }

    pub fn is_retryable(&self) -> bool {
        self.flags.contains(ErrorFlag::Retryable)
    }

    pub fn is_conflict(&self) -> bool {
        self.flags.contains(ErrorFlag::Conflict)
    }

    pub fn is_precondition_failed(&self) -> bool {
        self.flags.contains(ErrorFlag::PreconditionFailed)
    }
}

impl fmt::Display for TypedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TypedError {}
