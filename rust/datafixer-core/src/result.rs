//! [`DataResult`] — the success/error monad used throughout the codec and
//! dynamic-value layers.
//!
//! Unlike `std::result::Result`, a `DataResult::Error` can carry a
//! *best-effort* partial value alongside its message. Codecs use this to
//! recover when one element of a list fails to decode: the overall decode
//! still reports failure, but callers that only need a degraded result (for
//! example a diff tool, or a migration step that prefers "missing data" over
//! "aborted migration") can recover it via [`DataResult::result`] or
//! [`DataResult::partial`].
//!
//! Grounded on the context-chaining style of a runtime's `ErrorContext` /
//! `ErrorChain` (error messages compose by prepending context without losing
//! the underlying cause), adapted here to prepend context onto a `DataResult`
//! error without losing its partial value.

use std::fmt;

/// Success/error sum type with an optional best-effort partial value.
#[derive(Debug, Clone)]
pub enum DataResult<A> {
    /// The operation fully succeeded.
    Success(A),
    /// The operation failed. `partial` may carry a best-effort value
    /// recovered despite the failure (e.g. all-but-one list elements).
    Error { message: String, partial: Option<A> },
}

impl<A> DataResult<A> {
    /// Build a success.
    pub fn success(value: A) -> Self {
        DataResult::Success(value)
    }

    /// Build a failure with no recoverable value.
    pub fn error(message: impl Into<String>) -> Self {
        DataResult::Error {
            message: message.into(),
            partial: None,
        }
    }

    /// Build a failure that still carries a best-effort value.
    pub fn error_partial(message: impl Into<String>, partial: A) -> Self {
        DataResult::Error {
            message: message.into(),
            partial: Some(partial),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DataResult::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DataResult::Error { .. })
    }

    /// The successful value, if any. An error's partial value is
    /// deliberately *not* surfaced here — use [`DataResult::partial`] or
    /// [`DataResult::or`] to opt into degraded recovery.
    pub fn result(self) -> Option<A> {
        match self {
            DataResult::Success(value) => Some(value),
            DataResult::Error { .. } => None,
        }
    }

    /// The error message, if any.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            DataResult::Success(_) => None,
            DataResult::Error { message, .. } => Some(message),
        }
    }

    /// The best-effort partial value carried by an error, if any. Always
    /// `None` for a success (there's nothing partial about a success).
    pub fn partial(self) -> Option<A> {
        match self {
            DataResult::Success(_) => None,
            DataResult::Error { partial, .. } => partial,
        }
    }

    /// Transform a success value; errors pass through unchanged.
    pub fn map<B>(self, f: impl FnOnce(A) -> B) -> DataResult<B> {
        match self {
            DataResult::Success(value) => DataResult::Success(f(value)),
            DataResult::Error { message, partial } => DataResult::Error {
                message,
                partial: partial.map(f),
            },
        }
    }

    /// Chain onto a success; errors short-circuit. An error's partial value
    /// cannot survive the type change to `B`, so it is dropped.
    pub fn flat_map<B>(self, f: impl FnOnce(A) -> DataResult<B>) -> DataResult<B> {
        match self {
            DataResult::Success(value) => f(value),
            DataResult::Error { message, .. } => DataResult::Error {
                message,
                partial: None,
            },
        }
    }

    /// Rewrite the error message; a partial value (and successes) are
    /// untouched.
    pub fn map_error(self, f: impl FnOnce(String) -> String) -> Self {
        match self {
            DataResult::Success(value) => DataResult::Success(value),
            DataResult::Error { message, partial } => DataResult::Error {
                message: f(message),
                partial,
            },
        }
    }

    /// Prepend context to an error's message without disturbing its partial
    /// value; a no-op on success.
    pub fn with_context(self, context: impl fmt::Display) -> Self {
        self.map_error(|message| format!("{context}: {message}"))
    }

    /// Prefer `self` if it succeeded, otherwise fall back to `other`.
    pub fn or(self, other: Self) -> Self {
        match self {
            DataResult::Success(_) => self,
            DataResult::Error { .. } => other,
        }
    }

    /// Unwrap a success, panicking with the error message otherwise.
    ///
    /// Named to mirror the source contract's `get_or_throw`; reserved for
    /// call sites (bootstrap code, tests) where a `DataResult` failure is a
    /// programming error rather than routine control flow.
    pub fn get_or_throw(self) -> A {
        match self {
            DataResult::Success(value) => value,
            DataResult::Error { message, .. } => panic!("DataResult::get_or_throw: {message}"),
        }
    }
}

impl<A: PartialEq> PartialEq for DataResult<A> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DataResult::Success(a), DataResult::Success(b)) => a == b,
            (
                DataResult::Error { message: m1, partial: p1 },
                DataResult::Error { message: m2, partial: p2 },
            ) => m1 == m2 && p1 == p2,
            _ => false,
        }
    }
}
