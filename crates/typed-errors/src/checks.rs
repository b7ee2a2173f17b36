//! Capability checks.
//!
//! Each kind of classification has its own small trait whose methods come with
//! default implementations, so a host type opts into exactly the checks it
//! needs with an empty impl block:
//!
//! ```
//! use typed_errors::{NotFoundErrorCheck, TypedError};
//!
//! struct Repository;
//!
//! impl NotFoundErrorCheck for Repository {}
//!
//! let repo = Repository;
//! let error = TypedError::not_found("user 7");
//! assert!(repo.is_not_found_error(&error));
//! assert!(!repo.is_not_found_error(&TypedError::new("user 7")));
//! ```
//!
//! [`ErrorChecker`] implements every check and is what the retry driver uses
//! by default. Values that are not a [`TypedError`] never match.

use std::error::Error as StdError;

use crate::error::TypedError;

fn as_typed<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a TypedError> {
    err.downcast_ref::<TypedError>()
}

/// `Auth`, `Unauthorized` or `Forbidden`.
pub fn is_auth_error(err: &(dyn StdError + 'static)) -> bool {
    as_typed(err).is_some_and(TypedError::is_auth)
}

pub fn is_unauthorized_error(err: &(dyn StdError + 'static)) -> bool {
    as_typed(err).is_some_and(TypedError::is_unauthorized)
}

pub fn is_forbidden_error(err: &(dyn StdError + 'static)) -> bool {
    as_typed(err).is_some_and(TypedError::is_forbidden)
}

pub fn is_client_error(err: &(dyn StdError + 'static)) -> bool {
    as_typed(err).is_some_and(TypedError::is_client)
}

pub fn is_not_found_error(err: &(dyn StdError + 'static)) -> bool {
    as_typed(err).is_some_and(TypedError::is_not_found)
}

pub fn is_not_implemented_error(err: &(dyn StdError + 'static)) -> bool {
    as_typed(err).is_some_and(TypedError::is_not_implemented)
}

pub fn is_retryable_error(err: &(dyn StdError + 'static)) -> bool {
    as_typed(err).is_some_and(TypedError::is_retryable)
}

pub fn is_conflict_error(err: &(dyn StdError + 'static)) -> bool {
    as_typed(err).is_some_and(TypedError::is_conflict)
}

pub fn is_precondition_failed_error(err: &(dyn StdError + 'static)) -> bool {
    as_typed(err).is_some_and(TypedError::is_precondition_failed)
}

pub trait AuthErrorCheck {
    /// True when `err` carries any of the Auth-family flags.
    fn is_auth_error(&self, err: &(dyn StdError + 'static)) -> bool {
        is_auth_error(err)
    }

    fn is_unauthorized_error(&self, err: &(dyn StdError + 'static)) -> bool {
        is_unauthorized_error(err)
    }

    fn is_forbidden_error(&self, err: &(dyn StdError + 'static)) -> bool {
        is_forbidden_error(err)
    }
}

pub trait NotFoundErrorCheck {
    fn is_not_found_error(&self, err: &(dyn StdError + 'static)) -> bool {
        is_not_found_error(err)
    }
}

pub trait NotImplementedErrorCheck {
    fn is_not_implemented_error(&self, err: &(dyn StdError + 'static)) -> bool {
        is_not_implemented_error(err)
    }
}

pub trait ClientErrorCheck {
    fn is_client_error(&self, err: &(dyn StdError + 'static)) -> bool {
        is_client_error(err)
    }
}

/// Predicate consulted by [`do_with_retries`](crate::do_with_retries).
///
/// Override the method to retry on something other than the `Retryable` flag.
pub trait RetryableErrorCheck {
    fn is_retryable_error(&self, err: &(dyn StdError + 'static)) -> bool {
        is_retryable_error(err)
    }
}

pub trait ConflictErrorCheck {
    fn is_conflict_error(&self, err: &(dyn StdError + 'static)) -> bool {
        is_conflict_error(err)
    }
}

pub trait PreconditionFailedErrorCheck {
    fn is_precondition_failed_error(&self, err: &(dyn StdError + 'static)) -> bool {
        is_precondition_failed_error(err)
    }
}

/// Every check at once. Implemented for any type that has all of them.
pub trait AllErrorCheck:
    AuthErrorCheck
    + NotFoundErrorCheck
    + NotImplementedErrorCheck
    + ClientErrorCheck
    + RetryableErrorCheck
    + ConflictErrorCheck
    + PreconditionFailedErrorCheck
{
}

impl<T> AllErrorCheck for T where
    T: AuthErrorCheck
        + NotFoundErrorCheck
        + NotImplementedErrorCheck
        + ClientErrorCheck
        + RetryableErrorCheck
        + ConflictErrorCheck
        + PreconditionFailedErrorCheck
        + ?Sized
{
}

/// Shared checker implementing every capability with the default predicates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ErrorChecker;

impl AuthErrorCheck for ErrorChecker {}
impl NotFoundErrorCheck for ErrorChecker {}
impl NotImplementedErrorCheck for ErrorChecker {}
impl ClientErrorCheck for ErrorChecker {}
impl RetryableErrorCheck for ErrorChecker {}
impl ConflictErrorCheck for ErrorChecker {}
impl PreconditionFailedErrorCheck for ErrorChecker {}
