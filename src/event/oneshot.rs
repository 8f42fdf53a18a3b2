//! # Non-buffering rendezvous between a trigger and a parked waiter.
//!
//! [`OneShotEvent::trigger`] hands its value to a waiter that is parked
//! **right now**, or drops it. Nothing is queued for later waiters.
//!
//! ```text
//! waiter:  park() ──► slot registered ──► wait(deadline, scope)
//!                            ▲                     │
//! trigger: ──────────────────┘ try handoff         ├─ value       → Ok(value)
//!          (no slot → value dropped)               ├─ scope done  → Err(Cancelled)
//!                                                  └─ deadline    → Err(TimedOut)
//! ```
//!
//! ## Rules
//! - A trigger reaches at most one waiter (oldest parked first)
//! - A value handed off at the same instant the deadline or cancellation
//!   resolves is still returned; once handed off it is never lost
//! - Dropping a [`Parked`] deregisters its slot
//! - The event never resets itself and never buffers

use std::collections::VecDeque;
use std::future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::config::Deadline;
use crate::error::WaitError;

/// Parked waiter slot inside an event.
struct Slot<T> {
    id: u64,
    tx: oneshot::Sender<T>,
}

struct Inner<T> {
    waiters: Mutex<VecDeque<Slot<T>>>,
    next_id: AtomicU64,
}

/// Single-value, non-buffering rendezvous.
///
/// Cloning yields another handle to the same event.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use keywait::OneShotEvent;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let event = OneShotEvent::new();
///     let parked = event.park();
///
///     assert!(event.trigger(123));
///     let value = parked.wait_timeout(Duration::from_secs(1)).await;
///     assert_eq!(value, Ok(123));
///
///     // Nobody is parked any more: the value is dropped.
///     assert!(!event.trigger(456));
/// }
/// ```
pub struct OneShotEvent<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for OneShotEvent<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for OneShotEvent<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for OneShotEvent<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneShotEvent")
            .field("waiters", &self.waiters())
            .finish()
    }
}

impl<T> OneShotEvent<T> {
    /// Creates a fresh, armed event with no waiters.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                waiters: Mutex::new(VecDeque::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Registers a waiter slot.
    ///
    /// Any trigger issued after this returns can be delivered to the slot,
    /// even if [`Parked::wait`] has not been polled yet.
    pub fn park(&self) -> Parked<T> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.inner.waiters.lock().push_back(Slot { id, tx });
        Parked {
            id,
            rx,
            event: self.clone(),
        }
    }

    /// Attempts a non-blocking handoff of `value` to a parked waiter.
    ///
    /// Returns `true` if a waiter accepted the value, `false` if the value
    /// was dropped because nobody was parked.
    pub fn trigger(&self, value: T) -> bool {
        let mut value = value;
        let mut waiters = self.inner.waiters.lock();
        while let Some(slot) = waiters.pop_front() {
            match slot.tx.send(value) {
                Ok(()) => return true,
                // Receiver gone between its deadline and its deregistration.
                Err(back) => value = back,
            }
        }
        false
    }

    /// Number of currently parked waiters.
    pub fn waiters(&self) -> usize {
        self.inner.waiters.lock().len()
    }

    /// Parks and waits until a value, scope cancellation, or `timeout`.
    pub async fn wait(
        &self,
        scope: &CancellationToken,
        timeout: Duration,
    ) -> Result<T, WaitError> {
        self.park().wait(Deadline::after(timeout), Some(scope)).await
    }

    /// Parks and waits until a value or `timeout`.
    pub async fn wait_timeout(&self, timeout: Duration) -> Result<T, WaitError> {
        self.park().wait(Deadline::after(timeout), None).await
    }

    /// Parks and waits until a value or scope cancellation, with no deadline.
    pub async fn wait_cancellable(&self, scope: &CancellationToken) -> Result<T, WaitError> {
        self.park().wait(None, Some(scope)).await
    }

    fn unpark(&self, id: u64) {
        self.inner.waiters.lock().retain(|slot| slot.id != id);
    }
}

/// A waiter slot registered on a [`OneShotEvent`].
///
/// Dropping it without waiting deregisters the slot.
pub struct Parked<T> {
    id: u64,
    rx: oneshot::Receiver<T>,
    event: OneShotEvent<T>,
}

impl<T> Parked<T> {
    /// Waits until the first of: a delivered value, `scope` cancelled, `deadline` elapsed.
    ///
    /// `None` for `deadline` or `scope` disables that condition.
    pub async fn wait(
        mut self,
        deadline: Option<Deadline>,
        scope: Option<&CancellationToken>,
    ) -> Result<T, WaitError> {
        let failure = tokio::select! {
            biased;
            Ok(value) = &mut self.rx => return Ok(value),
            _ = cancelled(scope) => WaitError::Cancelled,
            d = Deadline::elapsed(deadline) => WaitError::timed_out(d.timeout, 0, 1),
        };

        // A handoff racing the deadline or cancellation still wins.
        match self.rx.try_recv() {
            Ok(value) => Ok(value),
            Err(_) => Err(failure),
        }
    }

    /// Waits until a value or `timeout`, with no cancellation scope.
    pub async fn wait_timeout(self, timeout: Duration) -> Result<T, WaitError> {
        self.wait(Deadline::after(timeout), None).await
    }

    /// Returns a guard that deregisters this slot when dropped.
    ///
    /// Lets an owner that has handed the `Parked` to another task withdraw
    /// the slot synchronously, without waiting for that task to be dropped.
    pub(crate) fn release_guard(&self) -> SlotRelease<T> {
        SlotRelease {
            id: self.id,
            event: self.event.clone(),
        }
    }
}

impl<T> Drop for Parked<T> {
    fn drop(&mut self) {
        self.event.unpark(self.id);
    }
}

/// Deregisters one slot on drop. Releasing an already consumed slot is a no-op.
pub(crate) struct SlotRelease<T> {
    id: u64,
    event: OneShotEvent<T>,
}

impl<T> Drop for SlotRelease<T> {
    fn drop(&mut self) {
        self.event.unpark(self.id);
    }
}

/// Resolves when `scope` is cancelled; never resolves for `None`.
async fn cancelled(scope: Option<&CancellationToken>) {
    match scope {
        Some(token) => token.cancelled().await,
        None => future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_to_parked_waiter() {
        let event = OneShotEvent::new();
        let parked = event.park();
        assert_eq!(event.waiters(), 1);

        assert!(event.trigger("ready"));
        assert_eq!(parked.wait_timeout(Duration::from_secs(1)).await, Ok("ready"));
        assert_eq!(event.waiters(), 0);
    }

    #[tokio::test]
    async fn trigger_without_waiter_is_dropped() {
        let event = OneShotEvent::new();
        assert!(!event.trigger(1));

        let res = event.wait_timeout(Duration::from_millis(30)).await;
        assert!(matches!(res, Err(WaitError::TimedOut { .. })));
    }

    #[tokio::test]
    async fn triggered_later_from_another_task() {
        let event = OneShotEvent::new();
        let producer = event.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            producer.trigger(123);
        });

        assert_eq!(event.wait_timeout(Duration::from_secs(2)).await, Ok(123));
    }

    #[tokio::test]
    async fn cancellation_wins_over_long_timeout() {
        let event: OneShotEvent<u32> = OneShotEvent::new();
        let scope = CancellationToken::new();
        let canceller = scope.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let started = tokio::time::Instant::now();
        let res = event.wait(&scope, Duration::from_secs(30)).await;
        assert_eq!(res, Err(WaitError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn already_cancelled_scope_fails_immediately() {
        let event: OneShotEvent<u32> = OneShotEvent::new();
        let scope = CancellationToken::new();
        scope.cancel();
        assert_eq!(event.wait_cancellable(&scope).await, Err(WaitError::Cancelled));
    }

    #[tokio::test]
    async fn handoff_beats_elapsed_deadline() {
        let event = OneShotEvent::new();
        let parked = event.park();
        assert!(event.trigger(7));

        // Deadline already in the past: the delivered value is still returned.
        let deadline = Deadline {
            at: tokio::time::Instant::now(),
            timeout: Duration::ZERO,
        };
        assert_eq!(parked.wait(Some(deadline), None).await, Ok(7));
    }

    #[tokio::test]
    async fn dropped_parked_slot_is_deregistered() {
        let event: OneShotEvent<u8> = OneShotEvent::new();
        let parked = event.park();
        drop(parked);
        assert_eq!(event.waiters(), 0);
        assert!(!event.trigger(1));
    }

    #[tokio::test]
    async fn each_trigger_reaches_one_waiter_in_order() {
        let event = OneShotEvent::new();
        let first = event.park();
        let second = event.park();

        assert!(event.trigger(1));
        assert!(event.trigger(2));
        assert!(!event.trigger(3));

        assert_eq!(first.wait_timeout(Duration::from_secs(1)).await, Ok(1));
        assert_eq!(second.wait_timeout(Duration::from_secs(1)).await, Ok(2));
    }

    #[tokio::test]
    async fn released_slot_stops_taking_triggers() {
        let event = OneShotEvent::new();
        let held = event.park();
        let release = held.release_guard();

        // The slot is gone even though `held` is still alive elsewhere.
        drop(release);
        assert_eq!(event.waiters(), 0);

        let fresh = event.park();
        assert!(event.trigger(9));
        assert_eq!(fresh.wait_timeout(Duration::from_secs(1)).await, Ok(9));

        let res = held.wait_timeout(Duration::from_millis(20)).await;
        assert!(matches!(res, Err(WaitError::TimedOut { .. })));
    }
}
