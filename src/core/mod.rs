//! Coordinator core: registry, fan-out, and the public [`Waiter`].
//!
//! Internal modules:
//! - [`registry`]: keyed one-shot events, created only by `init_keys`;
//! - [`fanout`]: per-key tasks and aggregation for multi-key waits;
//! - [`waiter`]: wait-one / wait-any / wait-all over the registry;
//! - [`builder`]: fluent construction of a [`Waiter`].

mod builder;
mod fanout;
mod registry;
mod waiter;

pub use builder::WaiterBuilder;
pub use registry::EventRegistry;
pub use waiter::Waiter;
