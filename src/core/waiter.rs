//! # Waiter: keyed wait-one / wait-any / wait-all coordination.
//!
//! The [`Waiter`] owns an [`EventRegistry`], a default timeout, and a default
//! cancellation scope. Producers trigger keys; consumers wait on them.
//!
//! ## Operations
//! Each operation exists in a default form and a `_with` form taking a
//! [`WaitSpec`]. The spec may override the scope and the timeout, and may
//! carry producer work:
//!
//! | Operation        | Succeeds when               | Returns            |
//! |------------------|-----------------------------|--------------------|
//! | [`wait_one`]     | the key fires               | [`Value`]          |
//! | [`wait_any`]     | the first of the keys fires | 1-entry [`ResultSet`] |
//! | [`wait_all`]     | every key has fired         | full [`ResultSet`] |
//!
//! [`wait_one`]: Waiter::wait_one
//! [`wait_any`]: Waiter::wait_any
//! [`wait_all`]: Waiter::wait_all
//!
//! ## Failures
//! - `KeyNotFound`: any awaited key was never initialised (checked before waiting,
//!   with or without producer work)
//! - `Cancelled`: the effective scope was cancelled
//! - `TimedOut`: the deadline elapsed first; `wait_all` discards the values
//!   that did arrive and only reports how many
//!
//! ## Rules
//! - A trigger with nobody parked on the key is lost; waits started later
//!   will not see it
//! - Keys are parked before producer work starts, so work may trigger at once
//! - One deadline per call, shared by the call and its per-key waits

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::{Deadline, WaitConfig};
use crate::core::builder::WaiterBuilder;
use crate::core::fanout::{self, Need};
use crate::core::registry::EventRegistry;
use crate::error::WaitError;
use crate::result::{ResultSet, Value};
use crate::spec::{WaitSpec, Work};

/// Keyed event coordinator.
///
/// Cloning yields another handle on the same registry; the defaults
/// (timeout, scope) are per handle.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use keywait::{WaitSpec, Waiter};
///
/// #[tokio::main]
/// async fn main() -> Result<(), keywait::WaitError> {
///     let waiter: Waiter<&str> = Waiter::new();
///     waiter.init_keys(["a", "b", "c"]);
///
///     let producer = waiter.clone();
///     let spec = WaitSpec::new()
///         .with_timeout(Duration::from_secs(5))
///         .with_work(async move {
///             producer.trigger_value("b", 2_i64);
///             producer.trigger_value("a", 1_i64);
///             producer.trigger_value("c", 3_i64);
///         });
///
///     let results = waiter.wait_all_with(spec, &["a", "b", "c"]).await?;
///     assert_eq!(results.get_i64("b"), Ok(Some(2)));
///     assert_eq!(results.len(), 3);
///     Ok(())
/// }
/// ```
pub struct Waiter<K> {
    cfg: WaitConfig,
    registry: Arc<EventRegistry<K>>,
}

impl<K> Clone for Waiter<K> {
    fn clone(&self) -> Self {
        Self {
            cfg: self.cfg.clone(),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<K> fmt::Debug for Waiter<K>
where
    K: Eq + Hash + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Waiter")
            .field("cfg", &self.cfg)
            .field("registry", &self.registry)
            .finish()
    }
}

impl<K> Default for Waiter<K>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Waiter<K>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
{
    /// Creates a waiter with [`WaitConfig::default`] (30s timeout, fresh scope).
    pub fn new() -> Self {
        Self::with_config(WaitConfig::default())
    }

    /// Creates a waiter with the given defaults.
    pub fn with_config(cfg: WaitConfig) -> Self {
        Self {
            cfg,
            registry: Arc::new(EventRegistry::new()),
        }
    }

    /// Returns a builder for configuring defaults fluently.
    pub fn builder() -> WaiterBuilder<K> {
        WaiterBuilder::new()
    }

    /// Sets the default timeout for calls without an override.
    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.cfg.timeout = timeout;
        self
    }

    /// Sets the default cancellation scope for calls without an override.
    pub fn set_scope(&mut self, scope: CancellationToken) -> &mut Self {
        self.cfg.scope = scope;
        self
    }

    /// Returns the default timeout.
    pub fn timeout(&self) -> Duration {
        self.cfg.timeout
    }

    /// Returns the default cancellation scope.
    pub fn scope(&self) -> &CancellationToken {
        &self.cfg.scope
    }

    /// Returns the underlying registry.
    pub fn registry(&self) -> &EventRegistry<K> {
        &self.registry
    }

    /// Creates a fresh event per key, replacing (abandoning) existing ones.
    pub fn init_keys<I>(&self, keys: I)
    where
        I: IntoIterator<Item = K>,
    {
        self.registry.init_keys(keys);
    }

    /// Fires `key` with no payload ([`Value::Nil`]).
    ///
    /// Returns whether a parked waiter received it.
    pub fn trigger<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        self.registry.trigger(key, Value::Nil)
    }

    /// Fires `key` with `value`.
    ///
    /// Returns whether a parked waiter received it. Unknown keys and keys
    /// with nobody waiting drop the value silently.
    pub fn trigger_value<Q>(&self, key: &Q, value: impl Into<Value>) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        self.registry.trigger(key, value.into())
    }

    /// Waits for `key` using the default scope and timeout.
    pub async fn wait_one<Q>(&self, key: &Q) -> Result<Value, WaitError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        self.wait_one_with(WaitSpec::new(), key).await
    }

    /// Waits for `key` under `spec`.
    ///
    /// Fails with `KeyNotFound` if `key` was never initialised, even when
    /// producer work is attached.
    pub async fn wait_one_with<Q>(&self, spec: WaitSpec, key: &Q) -> Result<Value, WaitError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let (scope, deadline, work) = self.resolve(spec);
        let event = self
            .registry
            .lookup(key)
            .ok_or_else(|| WaitError::key_not_found(key))?;

        let parked = event.park();
        fanout::dispatch(work);

        let res = parked.wait(deadline, Some(&scope)).await;
        debug!(key = ?key, ok = res.is_ok(), "wait_one finished");
        res
    }

    /// Waits for the first of `keys` using the default scope and timeout.
    pub async fn wait_any(&self, keys: &[K]) -> Result<ResultSet<K>, WaitError> {
        self.wait_any_with(WaitSpec::new(), keys).await
    }

    /// Waits for the first of `keys` under `spec`.
    ///
    /// The result holds exactly one entry: the key that fired first.
    pub async fn wait_any_with(
        &self,
        spec: WaitSpec,
        keys: &[K],
    ) -> Result<ResultSet<K>, WaitError> {
        self.wait_many(spec, keys, Need::Any).await
    }

    /// Waits for every key in `keys` using the default scope and timeout.
    pub async fn wait_all(&self, keys: &[K]) -> Result<ResultSet<K>, WaitError> {
        self.wait_all_with(WaitSpec::new(), keys).await
    }

    /// Waits for every key in `keys` under `spec`.
    ///
    /// On `TimedOut` the values that did arrive are discarded; the error
    /// reports how many fired.
    pub async fn wait_all_with(
        &self,
        spec: WaitSpec,
        keys: &[K],
    ) -> Result<ResultSet<K>, WaitError> {
        self.wait_many(spec, keys, Need::All).await
    }

    async fn wait_many(
        &self,
        spec: WaitSpec,
        keys: &[K],
        need: Need,
    ) -> Result<ResultSet<K>, WaitError> {
        let (scope, deadline, work) = self.resolve(spec);
        let parked = fanout::park_all(&self.registry, keys)?;
        let res = fanout::collect(parked, need, &scope, deadline, work).await;
        if let Err(err) = &res {
            debug!(?need, error = err.as_label(), "multi-key wait failed");
        }
        res
    }

    /// Applies `spec` overrides on top of the defaults and fixes the deadline.
    fn resolve(&self, spec: WaitSpec) -> (CancellationToken, Option<Deadline>, Option<Work>) {
        let (scope, timeout, work) = spec.into_parts();
        let scope = scope.unwrap_or_else(|| self.cfg.scope.clone());
        let deadline = Deadline::after(timeout.unwrap_or(self.cfg.timeout));
        (scope, deadline, work)
    }
}
