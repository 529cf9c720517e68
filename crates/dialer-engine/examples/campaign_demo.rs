//! End-to-end campaign demo against the simulated originator.
//!
//! Seeds a small queue (manual adds plus a bulk import), runs one batch at a
//! compressed time scale, then prints the stats and the exported CDR report.
//!
//! ```bash
//! RUST_LOG=info cargo run --example campaign_demo
//! ```

use std::sync::Arc;
use std::time::Duration;

use dialer_engine::prelude::*;
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = DialerConfig {
        stagger_interval: Duration::from_millis(400),
        tick_interval: Duration::from_millis(250),
        ..Default::default()
    };
    // 2% time scale: the 15s "answered" delay lands in ~300ms
    let engine = DialerEngine::new(config, Arc::new(SimulatedOriginator::with_time_scale(0.02)));
    engine.start_ticker().await;

    for (phone, name, note) in [
        ("+90 532 123 4567", "Ahmet Yilmaz", "warm lead"),
        ("+90 533 987 6543", "Elif Demir", ""),
        ("+90 534 555 0101", "Mert Kaya", "asked for a callback"),
    ] {
        engine.add_number(phone, name, note).await?;
    }

    let rows = vec![
        serde_json::json!({ "Telefon": "+90 535 111 2233", "Ad": "Imported Lead" }),
        serde_json::json!({ "comment": "row without a phone, dropped" }),
    ];
    let accepted = engine.import_rows(&rows).await;
    println!("bulk import accepted {accepted} of {} rows", rows.len());

    let placed = engine.start(5).await?;
    println!("batch started, {placed} calls scheduled");

    loop {
        let stats = engine.stats().await;
        println!(
            "waiting={} calling={} answered={} busy={} no-answer={} unavailable={}",
            stats.waiting, stats.calling, stats.answered, stats.busy, stats.no_answer, stats.unavailable
        );
        if !engine.is_running().await && stats.calling == 0 {
            break;
        }
        sleep(Duration::from_millis(300)).await;
    }

    println!("\nCDR report (newest first):\n{}", engine.export_cdr_json().await?);
    engine.shutdown().await;
    Ok(())
}
