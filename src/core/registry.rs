//! # Event registry - keyed one-shot events.
//!
//! Maps caller-chosen keys to [`OneShotEvent`]s. Owned by one
//! [`Waiter`](crate::Waiter); there is no process-wide registry.
//!
//! ## Architecture
//! ```text
//! init_keys([k1, k2]) ──► DashMap<K, OneShotEvent<Value>>
//!                             │
//! lookup(k1) ─────────────────┤ clone of the live event (or None)
//!                             │
//! trigger(k1, v) ─────────────┘ non-blocking handoff, absent key → no-op
//! ```
//!
//! ## Rules
//! - Events exist only after an explicit `init_keys`; lookups and triggers never create them
//! - At most one live event per key; re-initialising replaces the event,
//!   abandoning waiters parked on the old one
//! - Entries are never removed

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use dashmap::DashMap;
use tracing::trace;

use crate::event::OneShotEvent;
use crate::result::Value;

/// Keyed registry of one-shot events.
pub struct EventRegistry<K> {
    events: DashMap<K, OneShotEvent<Value>>,
}

impl<K: Eq + Hash> Default for EventRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + fmt::Debug> fmt::Debug for EventRegistry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("keys", &self.events.len())
            .finish()
    }
}

impl<K: Eq + Hash> EventRegistry<K> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            events: DashMap::new(),
        }
    }

    /// Returns the live event for `key`.
    pub fn lookup<Q>(&self, key: &Q) -> Option<OneShotEvent<Value>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.events.get(key).map(|e| e.value().clone())
    }

    /// Returns `true` if `key` has been initialised.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.events.contains_key(key)
    }

    /// Number of initialised keys.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if no key has been initialised.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<K: Eq + Hash + fmt::Debug> EventRegistry<K> {
    /// Creates one fresh event per key, replacing any existing one.
    pub fn init_keys<I>(&self, keys: I)
    where
        I: IntoIterator<Item = K>,
    {
        for key in keys {
            trace!(key = ?key, "init key");
            if self.events.insert(key, OneShotEvent::new()).is_some() {
                trace!("replaced existing event; stale waiters abandoned");
            }
        }
    }

    /// Triggers the event for `key` without blocking.
    ///
    /// Returns `true` if a parked waiter received the value. An absent key,
    /// or a key nobody is waiting on, drops the value silently.
    pub fn trigger<Q>(&self, key: &Q, value: Value) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        // Clone out of the map so the handoff runs without a shard lock.
        let Some(event) = self.lookup(key) else {
            trace!(key = ?key, "trigger on unknown key ignored");
            return false;
        };
        let delivered = event.trigger(value);
        trace!(key = ?key, delivered, "trigger");
        delivered
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn lookup_never_creates() {
        let reg: EventRegistry<&str> = EventRegistry::new();
        assert!(reg.lookup("a").is_none());
        assert!(!reg.trigger("a", Value::Nil));
        assert!(reg.is_empty());
    }

    #[tokio::test]
    async fn trigger_reaches_parked_waiter() {
        let reg = EventRegistry::new();
        reg.init_keys(["a", "b"]);
        assert_eq!(reg.len(), 2);

        let parked = reg.lookup("a").expect("initialised").park();
        assert!(reg.trigger("a", Value::from(5_i32)));
        assert_eq!(
            parked.wait_timeout(Duration::from_secs(1)).await,
            Ok(Value::I32(5))
        );
    }

    #[tokio::test]
    async fn reinit_abandons_stale_waiter() {
        let reg = EventRegistry::new();
        reg.init_keys(["k"]);
        let stale = reg.lookup("k").expect("initialised").park();

        reg.init_keys(["k"]);
        assert!(!reg.trigger("k", Value::Bool(true)));

        let res = stale.wait_timeout(Duration::from_millis(30)).await;
        assert!(res.is_err());
    }

    #[test]
    fn default_needs_no_debug_keys() {
        #[derive(PartialEq, Eq, Hash)]
        struct Opaque(u8);

        let reg: EventRegistry<Opaque> = EventRegistry::default();
        assert!(reg.is_empty());
        assert!(reg.lookup(&Opaque(1)).is_none());
        assert!(!reg.contains(&Opaque(1)));
    }
}
