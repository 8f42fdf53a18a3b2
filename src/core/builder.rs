use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::WaitConfig;
use super::waiter::Waiter;

/// Builder for constructing a [`Waiter`] with non-default settings.
pub struct WaiterBuilder<K> {
    cfg: WaitConfig,
    _keys: PhantomData<fn() -> K>,
}

impl<K> WaiterBuilder<K>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
{
    /// Creates a new builder starting from [`WaitConfig::default`].
    pub fn new() -> Self {
        Self {
            cfg: WaitConfig::default(),
            _keys: PhantomData,
        }
    }

    /// Sets the default timeout (`0s` = no deadline).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.timeout = timeout;
        self
    }

    /// Sets the default cancellation scope.
    ///
    /// Cancelling it fails every wait that does not bring its own scope.
    pub fn with_scope(mut self, scope: CancellationToken) -> Self {
        self.cfg.scope = scope;
        self
    }

    /// Builds the waiter with an empty registry.
    pub fn build(self) -> Waiter<K> {
        Waiter::with_config(self.cfg)
    }
}

impl<K> Default for WaiterBuilder<K>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
