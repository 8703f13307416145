//! # Demo: blacklist_wait
//!
//! A monitoring task blocks on a host's next state change while another task
//! reports the host as failed.
//!
//! Demonstrates how to:
//! - Obtain a [`WaitHandle`] via `wait_for_change()` **before** the event.
//! - Wake up exactly when `blacklist()` fires, observing the flag already set.
//! - Bound the wait with `tokio::time::timeout` (the core has no built-in one).
//!
//! ## Flow
//! ```text
//! monitor task:  wait_for_change("worker-2") ──► handle.wait() ─── parked ───┐
//! failure path:  sleep(300ms) ──► blacklist("worker-2") ──► signal ──────────┘
//!                                                                 │
//! monitor task:  ◄── wakes, is_blacklisted("worker-2") == true ◄──┘
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example blacklist_wait
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
    let hosts = Arc::new(DiscoveredHosts::new(source));
    hosts.refresh().await?;

    let handle = hosts.wait_for_change("worker-2").await;
    let monitor = {
        let hosts = hosts.clone();
        tokio::spawn(async move {
            println!("[monitor] waiting on worker-2");
            // Bound the wait externally; abandoning it would leak nothing.
            match tokio::time::timeout(Duration::from_secs(5), handle.wait()).await {
                Ok(()) => println!(
                    "[monitor] woke: blacklisted={}",
                    hosts.is_blacklisted("worker-2").await
                ),
                Err(_) => println!("[monitor] gave up after 5s"),
            }
        })
    };

    tokio::time::sleep(Duration::from_millis(300)).await;
    println!("[failure-path] worker on worker-2 died; blacklisting");
    hosts.blacklist("worker-2").await;

    monitor.await?;
    println!(
        "[done] available={:?} blacklisted_slots={}",
        hosts.available_hosts().await,
        hosts.blacklisted_slot_count().await
    );
    Ok(())
}
