//! Error types used by the wait coordinator and the result set.
//!
//! This module defines two error enums:
//!
//! - [`WaitError`] — outcomes of a wait that did not produce a value.
//! - [`ResultError`] — failures of typed [`ResultSet`](crate::ResultSet) accessors.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logs,
//! plus [`WaitError::is_retryable`].

use std::time::Duration;
use thiserror::Error;

use crate::result::ValueKind;

/// # Errors produced by a wait.
///
/// None of these are fatal: a timed-out or cancelled wait is an ordinary
/// outcome. The coordinator never retries on its own; re-initialising keys
/// and waiting again is up to the caller.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WaitError {
    /// The wait was issued against a key that was never initialised.
    #[error("key not initialised: {key}")]
    KeyNotFound {
        /// Debug rendering of the missing key.
        key: String,
    },

    /// The caller scope (or the call's internal scope) was cancelled.
    #[error("wait cancelled")]
    Cancelled,

    /// The deadline elapsed before enough events fired.
    #[error("timed out after {timeout:?} ({fired}/{expected} keys fired)")]
    TimedOut {
        /// Timeout the deadline was derived from.
        timeout: Duration,
        /// How many of the awaited keys fired before the deadline.
        fired: usize,
        /// How many keys had to fire for the call to succeed.
        expected: usize,
    },
}

impl WaitError {
    pub(crate) fn key_not_found<K: std::fmt::Debug + ?Sized>(key: &K) -> Self {
        WaitError::KeyNotFound {
            key: format!("{key:?}"),
        }
    }

    pub(crate) fn timed_out(timeout: Duration, fired: usize, expected: usize) -> Self {
        WaitError::TimedOut {
            timeout,
            fired,
            expected,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use keywait::WaitError;
    ///
    /// assert_eq!(WaitError::Cancelled.as_label(), "wait_cancelled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WaitError::KeyNotFound { .. } => "wait_key_not_found",
            WaitError::Cancelled => "wait_cancelled",
            WaitError::TimedOut { .. } => "wait_timed_out",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            WaitError::KeyNotFound { key } => format!("not initialised: {key}"),
            WaitError::Cancelled => "scope cancelled".to_string(),
            WaitError::TimedOut {
                timeout,
                fired,
                expected,
            } => format!("timeout: {timeout:?}; fired {fired} of {expected}"),
        }
    }

    /// Indicates whether waiting again on the same keys can succeed as is.
    ///
    /// `TimedOut` and `Cancelled` are ordinary outcomes; `KeyNotFound`
    /// needs the key to be initialised first.
    ///
    /// # Example
    /// ```
    /// use keywait::WaitError;
    ///
    /// assert!(WaitError::Cancelled.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(self, WaitError::Cancelled | WaitError::TimedOut { .. })
    }
}

/// # Errors produced by typed result accessors.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultError {
    /// The stored value has a different kind than the accessor asked for.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Kind requested by the accessor.
        expected: ValueKind,
        /// Kind actually stored under the key.
        found: ValueKind,
    },
}

impl ResultError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ResultError::TypeMismatch { .. } => "result_type_mismatch",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ResultError::TypeMismatch { expected, found } => {
                format!("wanted {expected}, stored {found}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(
            WaitError::key_not_found(&"a").as_label(),
            "wait_key_not_found"
        );
        assert_eq!(
            WaitError::timed_out(Duration::from_millis(5), 1, 3).as_label(),
            "wait_timed_out"
        );
        let mismatch = ResultError::TypeMismatch {
            expected: ValueKind::String,
            found: ValueKind::Int,
        };
        assert_eq!(mismatch.as_label(), "result_type_mismatch");
    }

    #[test]
    fn key_not_found_renders_debug_key() {
        let err = WaitError::key_not_found(&"job-7");
        assert_eq!(err.to_string(), "key not initialised: \"job-7\"");
        assert!(!err.is_retryable());
    }

    #[test]
    fn timed_out_reports_progress() {
        let err = WaitError::timed_out(Duration::from_secs(1), 2, 3);
        assert_eq!(err.as_message(), "timeout: 1s; fired 2 of 3");
        assert!(err.is_retryable());
    }
}
