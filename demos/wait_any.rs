//! # Example: wait_any
//!
//! Races three workers and takes whichever reports first.
//!
//! Demonstrates how to:
//! - Initialise keys on a [`Waiter`].
//! - Attach producer work with [`WaitSpec::with_work`].
//! - Read the single winning entry from the [`ResultSet`](keywait::ResultSet).
//! - Reuse a losing key for a fresh wait right after the race.
//!
//! ## Flow
//! ```text
//! init_keys([fast, medium, slow])
//!     │
//! wait_any_with(work, keys)
//!     ├─► park a slot on every key
//!     ├─► spawn work: three workers sleep, then trigger their key
//!     └─► first trigger (fast) → ResultSet { fast }
//!          losing slots released → later triggers reach new waiters
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example wait_any
//! ```

use std::time::Duration;

use keywait::{WaitSpec, Waiter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // 1. Waiter with a 2s default deadline
    let waiter: Waiter<&'static str> = Waiter::builder()
        .with_timeout(Duration::from_secs(2))
        .build();
    let keys = ["fast", "medium", "slow"];
    waiter.init_keys(keys);

    // 2. Producer work: each worker reports after its own delay
    let producer = waiter.clone();
    let spec = WaitSpec::new().with_work(async move {
        for (key, delay_ms) in [("slow", 300_u64), ("medium", 150), ("fast", 50)] {
            let producer = producer.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                let delivered = producer.trigger_value(key, delay_ms);
                println!("[{key}] reported after {delay_ms}ms (delivered={delivered})");
            });
        }
    });

    // 3. First key to fire wins
    let winner = waiter.wait_any_with(spec, &keys).await?;
    for key in winner.keys() {
        println!("[wait_any] winner: {key} = {:?}", winner.get_u64(key)?);
    }

    // 4. "slow" has not fired yet; a fresh wait on it still gets its value
    let late = waiter.wait_one("slow").await?;
    println!("[wait_one] slow = {late:?}");
    Ok(())
}
