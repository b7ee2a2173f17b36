//! Classification flags carried by [`TypedError`](crate::TypedError).
//!
//! Flags are independent bits. Nothing is derived when a flag is inserted:
//! `Forbidden` does not imply `Auth` at the storage level, the Auth union is
//! only applied when the set is queried through [`ErrorFlags::is_auth`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// One classification a [`TypedError`](crate::TypedError) may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorFlag {
    Auth,
    Unauthorized,
    Forbidden,
    ClientError,
    NotFound,
    NotImplemented,
    Retryable,
    Conflict,
    PreconditionFailed,
}

impl ErrorFlag {
    pub const ALL: [ErrorFlag; 9] = [
        ErrorFlag::Auth,
        ErrorFlag::Unauthorized,
        ErrorFlag::Forbidden,
        ErrorFlag::ClientError,
        ErrorFlag::NotFound,
        ErrorFlag::NotImplemented,
        ErrorFlag::Retryable,
        ErrorFlag::Conflict,
        ErrorFlag::PreconditionFailed,
    ];

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorFlag::Auth => "auth",
            ErrorFlag::Unauthorized => "unauthorized",
            ErrorFlag::Forbidden => "forbidden",
            ErrorFlag::ClientError => "client_error",
            ErrorFlag::NotFound => "not_found",
            ErrorFlag::NotImplemented => "not_implemented",
            ErrorFlag::Retryable => "retryable",
            ErrorFlag::Conflict => "conflict",
            ErrorFlag::PreconditionFailed => "precondition_failed",
        }
    }
}

impl fmt::Display for ErrorFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bitset over [`ErrorFlag`]. Serializes as a list of flag names.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<ErrorFlag>", into = "Vec<ErrorFlag>")]
pub struct ErrorFlags(u16);

impl ErrorFlags {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_flag(flag: ErrorFlag) -> Self {
        Self(flag.bit())
    }

    /// Returns a new set with `flag` inserted.
    #[must_use]
    pub const fn with(self, flag: ErrorFlag) -> Self {
        Self(self.0 | flag.bit())
    }

    #[must_use]
    pub const fn union(self, other: ErrorFlags) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, flag: ErrorFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Auth is the union of `Auth`, `Unauthorized` and `Forbidden`.
    pub const fn is_auth(self) -> bool {
        self.contains(ErrorFlag::Auth)
            || self.contains(ErrorFlag::Unauthorized)
            || self.contains(ErrorFlag::Forbidden)
    }

    pub fn iter(self) -> impl Iterator<Item = ErrorFlag> {
        ErrorFlag::ALL
            .into_iter()
            .filter(move |flag| self.contains(*flag))
    }
}

impl From<ErrorFlag> for ErrorFlags {
    fn from(flag: ErrorFlag) -> Self {
        Self::from_flag(flag)
    }
}

impl FromIterator<ErrorFlag> for ErrorFlags {
    fn from_iter<I: IntoIterator<Item = ErrorFlag>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), ErrorFlags::with)
    }
}

impl From<Vec<ErrorFlag>> for ErrorFlags {
    fn from(flags: Vec<ErrorFlag>) -> Self {
        flags.into_iter().collect()
    }
}

impl From<ErrorFlags> for Vec<ErrorFlag> {
    fn from(flags: ErrorFlags) -> Self {
        flags.iter().collect()
    }
}

impl fmt::Debug for ErrorFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
