//! # Demo: fixed_churn
//!
//! Simulates membership churn with a [`FixedSource`] and a small polling loop.
//!
//! Demonstrates how to:
//! - Seed a [`FixedSource`] and hand it to [`DiscoveredHosts`].
//! - Poll with `refresh()` and react only when it reports a change.
//! - Read the filtered fleet views after each change.
//!
//! ## Flow
//! ```text
//! FixedSource{w1:4, w2:2} ──► refresh() == true  ──► re-plan layout
//! (steady state)          ──► refresh() == false ──► sleep
//! set({w1:4, w2:2, w3:2}) ──► refresh() == true  ──► re-plan layout
//! set({w1:4})             ──► refresh() == true  ──► re-plan layout
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example fixed_churn
//! ```

use std::sync::Arc;
use std::time::Duration;

use hostvisor::{DiscoveredHosts, FixedSource, Snapshot};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let source = Arc::new(FixedSource::new(Snapshot::from_pairs([
        ("worker-1", 4),
        ("worker-2", 2),
    ])));
    let hosts = Arc::new(DiscoveredHosts::new(source.clone()));

    // Script the churn a real discovery source would produce over time.
    let churn = vec![
        None, // steady state: refresh() reports no change
        Some(Snapshot::from_pairs([
            ("worker-1", 4),
            ("worker-2", 2),
            ("worker-3", 2),
        ])),
        Some(Snapshot::from_pairs([("worker-1", 4)])),
    ];

    hosts.refresh().await?;
    println!("[bootstrap] slots={}", hosts.available_slot_count().await);

    for step in churn {
        if let Some(snapshot) = step {
            source.set(snapshot);
        }
        tokio::time::sleep(Duration::from_millis(200)).await;

        match hosts.refresh().await {
            Ok(true) => {
                let mut fleet = hosts.available_hosts().await;
                fleet.sort_unstable();
                println!(
                    "[changed] fleet={fleet:?} slots={}",
                    hosts.available_slot_count().await
                );
            }
            Ok(false) => println!("[steady] nothing to re-plan"),
            Err(e) => println!("[poll-failed] {} (will retry)", e.as_message()),
        }
    }
    Ok(())
}
