//! HTTP rendering of classified errors.
//!
//! Exactly one status is chosen per error, by the first matching flag in this
//! order: Auth family (403 when `Forbidden`, else 401), `ClientError` 400,
//! `NotFound` 404, `NotImplemented` 501, `Retryable` 503, `Conflict` 409,
//! `PreconditionFailed` 412. An error with none of these has no mapping and
//! nothing is written.

use std::error::Error as StdError;

use http::{HeaderValue, Response, StatusCode, header};

use crate::checks::ErrorChecker;
use crate::error::TypedError;
use crate::flags::ErrorFlag;

/// Checked after the Auth family, in order.
const STATUS_PRIORITY: [(ErrorFlag, StatusCode); 6] = [
    (ErrorFlag::ClientError, StatusCode::BAD_REQUEST),
    (ErrorFlag::NotFound, StatusCode::NOT_FOUND),
    (ErrorFlag::NotImplemented, StatusCode::NOT_IMPLEMENTED),
    (ErrorFlag::Retryable, StatusCode::SERVICE_UNAVAILABLE),
    (ErrorFlag::Conflict, StatusCode::CONFLICT),
    (ErrorFlag::PreconditionFailed, StatusCode::PRECONDITION_FAILED),
];

/// Destination for a rendered error response.
pub trait ResponseSink {
    fn write_error(&mut self, status: StatusCode, body: &str);
}

impl<S: ResponseSink + ?Sized> ResponseSink for &mut S {
    fn write_error(&mut self, status: StatusCode, body: &str) {
        (**self).write_error(status, body);
    }
}

/// Plain-text error response: replaces status and body, marks the content
/// as `text/plain` and terminates the body with a newline.
impl ResponseSink for Response<String> {
    fn write_error(&mut self, status: StatusCode, body: &str) {
        *self.status_mut() = status;

        let headers = self.headers_mut();
        headers.remove(header::CONTENT_LENGTH);
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        headers.insert(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        );

        let out = self.body_mut();
        out.clear();
        out.push_str(body);
        out.push('\n');
    }
}

impl TypedError {
    /// Status this error renders as, or `None` when no flag maps to one.
    pub fn http_status(&self) -> Option<StatusCode> {
        let flags = self.flags();
        if flags.is_auth() {
            return Some(if flags.contains(ErrorFlag::Forbidden) {
                StatusCode::FORBIDDEN
            } else {
                StatusCode::UNAUTHORIZED
            });
        }

        STATUS_PRIORITY
            .iter()
            .find(|(flag, _)| flags.contains(*flag))
            .map(|(_, status)| *status)
    }

    /// Body used for HTTP responses: the HTTP message when one was given and
    /// is non-empty, the error message otherwise.
    pub fn http_body(&self) -> &str {
        self.http_message()
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| self.message())
    }

    /// Writes this error to `sink` once and returns the status written.
    ///
    /// Returns `None` without touching the sink when the error has no mapping.
    pub fn to_http_response<S: ResponseSink + ?Sized>(&self, sink: &mut S) -> Option<StatusCode> {
        let status = self.http_status()?;
        sink.write_error(status, self.http_body());
        Some(status)
    }
}

/// HTTP rendering for arbitrary error values.
///
/// Like the capability checks, a host type gains the method through an empty
/// impl. Anything that is not a [`TypedError`] is left unrendered.
pub trait ToHttpResponse {
    fn to_http_response(
        &self,
        err: &(dyn StdError + 'static),
        sink: &mut dyn ResponseSink,
    ) -> Option<StatusCode> {
        err.downcast_ref::<TypedError>()?.to_http_response(sink)
    }
}

impl ToHttpResponse for ErrorChecker {}
