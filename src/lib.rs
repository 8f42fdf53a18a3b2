//! # keywait
//!
//! **keywait** is an in-process keyed event coordination library for Rust.
//!
//! Producers fire named events; consumers wait until one named event fires
//! (wait-one), until any of a set fires (wait-any), or until all of a set
//! fire (wait-all). Every wait honours a cancellation scope and a deadline.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   init_keys([a, b, c])            trigger_value(b, v)      (producers)
//!          │                                 │
//!          ▼                                 ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Waiter (per instance, no globals)                                │
//! │  - WaitConfig (default timeout + default scope)                   │
//! │  - EventRegistry: key → OneShotEvent<Value>                       │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!   wait_one(k)        wait_any(keys)     wait_all(keys)
//!        │                  │                  │
//!        │           ┌──────┴──────────────────┴──────┐
//!        │           │ fan-out: one task per key      │
//!        │           │ sub-scope = scope.child_token()│
//!        │           │ one shared deadline            │
//!        │           └──────┬─────────────────────────┘
//!        ▼                  ▼
//!    Value            ResultSet<K> (first entry / all entries)
//! ```
//!
//! ### One-shot semantics
//! ```text
//! trigger(k, v) ──► waiter parked on k?  ── yes ──► handed off (exactly one waiter)
//!                                        └─ no  ──► dropped (never queued)
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types                          |
//! |-------------------|----------------------------------------------------------|------------------------------------|
//! | **Coordination**  | Wait for one, any, or all keys with scope and deadline.  | [`Waiter`], [`WaitSpec`]           |
//! | **Events**        | Non-buffering single-value rendezvous.                   | [`OneShotEvent`], [`Parked`]       |
//! | **Results**       | Thread-safe keyed bag with checked typed accessors.      | [`ResultSet`], [`Value`]           |
//! | **Errors**        | Typed failure outcomes.                                  | [`WaitError`], [`ResultError`]     |
//! | **Configuration** | Default timeout and cancellation scope.                  | [`WaitConfig`]                     |
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use keywait::{WaitError, WaitSpec, Waiter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let waiter: Waiter<u32> = Waiter::builder()
//!         .with_timeout(Duration::from_secs(5))
//!         .build();
//!     waiter.init_keys([1, 2, 3]);
//!
//!     // Producer work is started once the keys are parked and never awaited.
//!     let producer = waiter.clone();
//!     let spec = WaitSpec::new().with_work(async move {
//!         tokio::time::sleep(Duration::from_millis(10)).await;
//!         producer.trigger_value(&2, "second");
//!     });
//!
//!     let first = waiter.wait_any_with(spec, &[1, 2, 3]).await?;
//!     assert_eq!(first.get_string(&2)?, Some("second".to_string()));
//!     assert_eq!(first.len(), 1);
//!
//!     // Cancelling the scope ends a wait promptly.
//!     let scope = CancellationToken::new();
//!     scope.cancel();
//!     let res = waiter
//!         .wait_one_with(WaitSpec::new().with_scope(scope), &1)
//!         .await;
//!     assert_eq!(res, Err(WaitError::Cancelled));
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod event;
mod result;
mod spec;

// ---- Public re-exports ----

pub use config::{DEFAULT_TIMEOUT, Deadline, WaitConfig};
pub use crate::core::{EventRegistry, Waiter, WaiterBuilder};
pub use error::{ResultError, WaitError};
pub use event::{OneShotEvent, Parked};
pub use result::{ResultSet, Value, ValueKind};
pub use spec::{WaitSpec, Work};
