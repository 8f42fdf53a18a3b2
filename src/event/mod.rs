//! # One-shot, non-buffering events.
//!
//! This module provides [`OneShotEvent`], the rendezvous every key in a
//! [`Waiter`](crate::Waiter) is backed by, and [`Parked`], a registered
//! waiter slot on such an event.

mod oneshot;

pub use oneshot::{OneShotEvent, Parked};
pub(crate) use oneshot::SlotRelease;
