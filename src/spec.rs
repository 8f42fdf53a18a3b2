//! # Per-call wait specification.
//!
//! Defines [`WaitSpec`], the overrides a single wait call can bring:
//! cancellation scope, timeout, and producer work.
//!
//! Anything left unset falls back to the [`Waiter`](crate::Waiter)'s
//! [`WaitConfig`](crate::WaitConfig).
//!
//! ## Rules
//! - Producer work is started **after** every awaited key is parked, so a
//!   trigger it issues right away is not lost
//! - Producer work is never awaited; its outcome is invisible to the wait

use std::fmt;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

/// Producer work dispatched alongside a wait.
pub type Work = BoxFuture<'static, ()>;

/// Overrides for one wait call.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use keywait::WaitSpec;
///
/// let scope = CancellationToken::new();
/// let spec = WaitSpec::new()
///     .with_scope(scope.clone())
///     .with_timeout(Duration::from_millis(500))
///     .with_work(async move {
///         // kick off whatever will trigger the keys
///     });
///
/// assert_eq!(spec.timeout(), Some(Duration::from_millis(500)));
/// assert!(spec.has_work());
/// ```
#[derive(Default)]
pub struct WaitSpec {
    scope: Option<CancellationToken>,
    timeout: Option<Duration>,
    work: Option<Work>,
}

impl fmt::Debug for WaitSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitSpec")
            .field("scope", &self.scope)
            .field("timeout", &self.timeout)
            .field("work", &self.work.is_some())
            .finish()
    }
}

impl WaitSpec {
    /// Creates a spec that overrides nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new spec with the caller's cancellation scope.
    pub fn with_scope(mut self, scope: CancellationToken) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Returns a new spec with an explicit timeout (`0s` = no deadline).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns a new spec carrying producer work.
    pub fn with_work<F>(mut self, work: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.work = Some(work.boxed());
        self
    }

    /// Returns the scope override, if any.
    pub fn scope(&self) -> Option<&CancellationToken> {
        self.scope.as_ref()
    }

    /// Returns the timeout override, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns `true` if producer work is attached.
    pub fn has_work(&self) -> bool {
        self.work.is_some()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (Option<CancellationToken>, Option<Duration>, Option<Work>) {
        (self.scope, self.timeout, self.work)
    }
}
