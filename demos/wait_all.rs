//! # Example: wait_all
//!
//! Fans out a batch of jobs and collects every result, then shows a batch
//! that misses its deadline.
//!
//! Demonstrates how to:
//! - Wait for every key with [`Waiter::wait_all_with`].
//! - Read typed values out of the [`ResultSet`](keywait::ResultSet).
//! - Inspect a [`WaitError::TimedOut`] with its progress counters.
//!
//! ## Flow
//! ```text
//! init_keys([job-1, job-2, job-3])
//!     │
//! wait_all_with(work, keys)
//!     ├─► work triggers job-3, job-1, job-2 (any order)
//!     └─► ResultSet { job-1, job-2, job-3 }
//!
//! wait_all_with(work that skips job-2, keys, timeout 200ms)
//!     └─► Err(TimedOut { fired: 2, expected: 3 })
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example wait_all
//! ```

use std::time::Duration;

use keywait::{WaitError, WaitSpec, Waiter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // 1. Waiter with default settings (30s deadline)
    let waiter: Waiter<String> = Waiter::new();
    let keys: Vec<String> = (1..=3).map(|i| format!("job-{i}")).collect();
    waiter.init_keys(keys.clone());

    // 2. Every job reports its square, out of order
    let producer = waiter.clone();
    let spec = WaitSpec::new().with_work(async move {
        for i in [3_i64, 1, 2] {
            tokio::time::sleep(Duration::from_millis(20)).await;
            producer.trigger_value(format!("job-{i}").as_str(), i * i);
        }
    });

    let all = waiter.wait_all_with(spec, &keys).await?;
    for key in &keys {
        println!("[wait_all] {key} = {:?}", all.get_i64(key.as_str())?);
    }

    // 3. job-2 never reports: the call ends at its deadline
    let producer = waiter.clone();
    let spec = WaitSpec::new()
        .with_timeout(Duration::from_millis(200))
        .with_work(async move {
            producer.trigger_value("job-1", 1_i64);
            producer.trigger_value("job-3", 9_i64);
        });

    match waiter.wait_all_with(spec, &keys).await {
        Err(err @ WaitError::TimedOut { .. }) => {
            println!("[wait_all] {} ({})", err.as_label(), err.as_message());
        }
        other => println!("[wait_all] unexpected outcome: {other:?}"),
    }
    Ok(())
}
