//! # Coordinator configuration.
//!
//! Provides [`WaitConfig`], the defaults a [`Waiter`](crate::Waiter) applies
//! to every call that does not override them through a [`WaitSpec`](crate::WaitSpec).
//!
//! ## Sentinel values
//! - `timeout = 0s` → no deadline (the wait ends only on a value or cancellation)

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Default wait timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default settings for a [`Waiter`](crate::Waiter).
///
/// ## Field semantics
/// - `timeout`: deadline applied to each wait call (`0s` = wait without deadline)
/// - `scope`: cancellation scope every call derives from unless overridden
///
/// All fields are public. Prefer the helper accessors over checking the
/// `0s` sentinel by hand.
#[derive(Clone, Debug)]
pub struct WaitConfig {
    /// Default timeout for a single wait call.
    ///
    /// One deadline is computed per call from this value and shared by the
    /// call and all of its per-key waits.
    pub timeout: Duration,

    /// Default cancellation scope.
    ///
    /// Cancelling it fails every in-flight wait that did not bring its own
    /// scope with [`WaitError::Cancelled`](crate::WaitError::Cancelled).
    pub scope: CancellationToken,
}

impl WaitConfig {
    /// Returns the timeout as an `Option`.
    ///
    /// - `None` → no deadline
    /// - `Some(d)` → calls give up after `d`
    #[inline]
    pub fn default_timeout(&self) -> Option<Duration> {
        if self.timeout == Duration::ZERO {
            None
        } else {
            Some(self.timeout)
        }
    }

    /// Computes the deadline for a call starting now.
    #[inline]
    pub fn deadline(&self) -> Option<Deadline> {
        Deadline::after(self.timeout)
    }
}

impl Default for WaitConfig {
    /// Default configuration:
    ///
    /// - `timeout = 30s`
    /// - `scope = CancellationToken::new()` (never cancelled unless the caller does)
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            scope: CancellationToken::new(),
        }
    }
}

/// Absolute point in time a wait gives up at, plus the timeout it came from.
///
/// A coordinator call computes one `Deadline` and hands copies of it to every
/// per-key wait, so the call and its children expire together.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deadline {
    /// When the wait expires.
    pub at: Instant,
    /// The relative timeout `at` was computed from (reported in errors).
    pub timeout: Duration,
}

impl Deadline {
    /// Deadline `timeout` from now; `None` for the `0s` sentinel.
    pub fn after(timeout: Duration) -> Option<Self> {
        if timeout == Duration::ZERO {
            None
        } else {
            Some(Self {
                at: Instant::now() + timeout,
                timeout,
            })
        }
    }

    /// Resolves at `deadline`; never resolves for `None`.
    pub(crate) async fn elapsed(deadline: Option<Deadline>) -> Deadline {
        match deadline {
            Some(d) => {
                tokio::time::sleep_until(d.at).await;
                d
            }
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_thirty_seconds() {
        let cfg = WaitConfig::default();
        assert_eq!(cfg.timeout, DEFAULT_TIMEOUT);
        assert_eq!(cfg.default_timeout(), Some(Duration::from_secs(30)));
        assert!(!cfg.scope.is_cancelled());
    }

    #[test]
    fn zero_timeout_means_no_deadline() {
        let cfg = WaitConfig {
            timeout: Duration::ZERO,
            ..WaitConfig::default()
        };
        assert_eq!(cfg.default_timeout(), None);
        assert!(cfg.deadline().is_none());
    }

    #[test]
    fn deadline_keeps_its_timeout() {
        let d = Deadline::after(Duration::from_secs(5)).expect("non-zero timeout");
        assert_eq!(d.timeout, Duration::from_secs(5));
        assert!(d.at > Instant::now());
    }
}
