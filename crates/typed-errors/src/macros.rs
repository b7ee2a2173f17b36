/// Builds a [`TypedError`](crate::TypedError) from a format string.
///
/// The first argument names the constructor (`new`, `client`, `auth`,
/// `forbidden`, `unauthorized`, `not_found`, `not_implemented`, `retryable`,
/// `conflict` or `precondition_failed`). An optional `http = <expr>` sets the
/// HTTP-facing message.
///
/// ```
/// use typed_errors::{typed_error, ErrorFlag};
///
/// let id = 7;
/// let err = typed_error!(not_found, "user {id} does not exist");
/// assert_eq!(err.to_string(), "user 7 does not exist");
/// assert!(err.flags().contains(ErrorFlag::NotFound));
///
/// let err = typed_error!(conflict, http = "already taken", "name {:?} exists", "ada");
/// assert_eq!(err.to_string(), r#"name "ada" exists"#);
/// assert_eq!(err.http_message(), Some("already taken"));
/// ```
#[macro_export]
macro_rules! typed_error {
    ($kind:ident, http = $http:expr, $($arg:tt)+) => {
        $crate::TypedError::$kind(::std::format!($($arg)+)).with_http_message($http)
    };
    ($kind:ident, $($arg:tt)+) => {
        $crate::TypedError::$kind(::std::format!($($arg)+))
    };
}
