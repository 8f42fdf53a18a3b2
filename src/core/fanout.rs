//! # Fan-out / fan-in of per-key waits for one multi-key call.
//!
//! Every awaited key gets its own task; all of them live in one [`JoinSet`]
//! and observe one sub-scope derived from the caller's scope.
//!
//! ## Flow
//! ```text
//! park_all(keys)            (synchronous: every key has a slot before work starts)
//!     │
//!     ▼
//! sub = scope.child_token()
//! JoinSet ◄── spawn(parked[i].wait(deadline, sub))   one per key
//!     │
//! dispatch(work)            (spawned, never awaited)
//!     │
//!     ▼
//! loop select! {
//!     join_next()        → merge (key, value) into ResultSet
//!     scope.cancelled()  → Err(Cancelled)
//!     deadline           → Err(TimedOut { fired, expected })
//! }
//!     │
//! exit (any path) → slots released + sub.cancel() + JoinSet dropped
//! ```
//!
//! ## Rules
//! - One deadline is shared by the aggregator and every per-key wait
//! - `Any` completes on the first value, `All` once every key has one
//! - Every slot is deregistered before the call returns, so a later trigger
//!   reaches the next waiter instead of a losing per-key task
//! - A value handed to a losing task just before the call returns is dropped
//!   together with the task (accepted narrow race for `Any`)
//! - Duplicate keys are awaited once

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::Deadline;
use crate::core::registry::EventRegistry;
use crate::error::WaitError;
use crate::event::{Parked, SlotRelease};
use crate::result::{ResultSet, Value};
use crate::spec::Work;

/// How many keys must fire before a multi-key call succeeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Need {
    /// First key to fire wins.
    Any,
    /// Every key must fire.
    All,
}

impl Need {
    fn expected(self, keys: usize) -> usize {
        match self {
            // An empty `Any` can only end by deadline or cancellation.
            Need::Any => 1,
            Need::All => keys,
        }
    }
}

/// Parks a waiter on every distinct key, failing on the first unknown one.
///
/// Slots parked before the failure are released when the partial vector drops.
pub(crate) fn park_all<K>(
    registry: &EventRegistry<K>,
    keys: &[K],
) -> Result<Vec<(K, Parked<Value>)>, WaitError>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    let mut seen = HashSet::with_capacity(keys.len());
    let mut parked = Vec::with_capacity(keys.len());
    for key in keys {
        if !seen.insert(key) {
            continue;
        }
        let event = registry
            .lookup(key)
            .ok_or_else(|| WaitError::key_not_found(key))?;
        parked.push((key.clone(), event.park()));
    }
    Ok(parked)
}

/// Starts producer work without awaiting it.
pub(crate) fn dispatch(work: Option<Work>) {
    if let Some(work) = work {
        debug!("dispatching producer work");
        drop(tokio::spawn(work));
    }
}

/// Waits on every parked key concurrently and aggregates per `need`.
pub(crate) async fn collect<K>(
    parked: Vec<(K, Parked<Value>)>,
    need: Need,
    scope: &CancellationToken,
    deadline: Option<Deadline>,
    work: Option<Work>,
) -> Result<ResultSet<K>, WaitError>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
{
    let expected = need.expected(parked.len());
    let sub = scope.child_token();
    // Cancels the sub-scope on every exit path.
    let _sub_guard = sub.clone().drop_guard();
    // Aborted tasks drop their slots lazily; withdraw them here instead.
    let _released: Vec<SlotRelease<Value>> =
        parked.iter().map(|(_, slot)| slot.release_guard()).collect();

    let mut set = JoinSet::new();
    for (key, slot) in parked {
        let sub = sub.clone();
        set.spawn(async move {
            let res = slot.wait(deadline, Some(&sub)).await;
            (key, res)
        });
    }
    debug!(?need, keys = set.len(), "fan-out started");

    dispatch(work);

    let results = ResultSet::new();
    let mut fired = 0;
    while fired < expected {
        let joined = tokio::select! {
            biased;
            Some(joined) = set.join_next() => joined,
            _ = scope.cancelled() => {
                debug!(fired, expected, "caller scope cancelled");
                return Err(WaitError::Cancelled);
            }
            d = Deadline::elapsed(deadline) => {
                debug!(fired, expected, "deadline elapsed");
                return Err(WaitError::timed_out(d.timeout, fired, expected));
            }
        };

        match joined {
            Ok((key, Ok(value))) => {
                debug!(key = ?key, "key fired");
                results.set(key, value);
                fired += 1;
            }
            Ok((_, Err(WaitError::TimedOut { timeout, .. }))) => {
                return Err(WaitError::timed_out(timeout, fired, expected));
            }
            Ok((_, Err(err))) => return Err(err),
            Err(join_err) => {
                warn!(error = %join_err, "per-key wait did not complete");
            }
        }
    }

    debug!(fired, "fan-in complete");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn expected_counts() {
        assert_eq!(Need::Any.expected(3), 1);
        assert_eq!(Need::Any.expected(0), 1);
        assert_eq!(Need::All.expected(3), 3);
    }

    #[tokio::test]
    async fn park_all_skips_duplicates_and_rejects_unknown() {
        let reg = EventRegistry::new();
        reg.init_keys([1, 2]);

        let parked = park_all(&reg, &[1, 2, 1]).expect("all known");
        assert_eq!(parked.len(), 2);
        drop(parked);

        let err = park_all(&reg, &[1, 9]).err();
        assert_eq!(err, Some(WaitError::key_not_found(&9)));
        // The slot parked on key 1 before the failure was released.
        assert_eq!(reg.lookup(&1).map(|e| e.waiters()), Some(0));
    }

    #[tokio::test]
    async fn work_runs_after_keys_are_parked() {
        let reg = std::sync::Arc::new(EventRegistry::new());
        reg.init_keys(["a"]);
        let parked = park_all(&reg, &["a"]).expect("known");

        let producer = std::sync::Arc::clone(&reg);
        let work: Work = Box::pin(async move {
            producer.trigger("a", Value::from(1_u8));
        });

        let scope = CancellationToken::new();
        let res = collect(
            parked,
            Need::All,
            &scope,
            Deadline::after(Duration::from_secs(2)),
            Some(work),
        )
        .await
        .expect("triggered by work");
        assert_eq!(res.get_u8("a"), Ok(Some(1)));
    }

    #[tokio::test]
    async fn losing_slots_are_gone_when_any_returns() {
        let reg = std::sync::Arc::new(EventRegistry::new());
        reg.init_keys(["a", "b", "c"]);
        let parked = park_all(&reg, &["a", "b", "c"]).expect("known");

        let producer = std::sync::Arc::clone(&reg);
        let work: Work = Box::pin(async move {
            producer.trigger("b", Value::from(2_u8));
        });

        let scope = CancellationToken::new();
        let res = collect(
            parked,
            Need::Any,
            &scope,
            Deadline::after(Duration::from_secs(2)),
            Some(work),
        )
        .await
        .expect("b fired");
        assert_eq!(res.get_u8("b"), Ok(Some(2)));

        // No yield since `collect` returned: the aborted tasks may still be alive.
        for key in ["a", "b", "c"] {
            assert_eq!(reg.lookup(key).map(|e| e.waiters()), Some(0), "{key}");
        }
        assert!(!reg.trigger("a", Value::Nil));
    }
}
