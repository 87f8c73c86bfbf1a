//! Sequential and parallel dispatch over a small order pipeline.
//!
//! Run with `RUST_LOG=cadence_events=debug cargo run --example order_pipeline`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use cadence_events::prelude::*;
use cadence_telemetry::LogConfig;

struct OrderPlaced;

impl Event for OrderPlaced {
    type Args = (u64, u64);
    const NAME: &'static str = "order_placed";
}

#[tokio::main]
async fn main() -> Result<(), ListenerError> {
    cadence_telemetry::setup_logging(&LogConfig::from_env()?)?;

    let emitter = EventEmitter::new();
    let revenue = Arc::new(AtomicU64::new(0));

    let total = Arc::clone(&revenue);
    emitter
        .on(Listener::<OrderPlaced>::sync(move |(_, cents)| {
            total.fetch_add(cents, Ordering::SeqCst);
            Ok(())
        }))
        .on(Listener::<OrderPlaced>::new(|(id, _)| async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            tracing::info!(order_id = id, "Confirmation sent");
            Ok(())
        }))
        .once(Listener::<OrderPlaced>::sync(|(id, _)| {
            tracing::info!(order_id = id, "First order of the day");
            Ok(())
        }));

    emitter.emit::<OrderPlaced>((1, 2_500)).await?;
    emitter.emit_parallel::<OrderPlaced>((2, 1_200)).await?;

    tracing::info!(
        revenue = revenue.load(Ordering::SeqCst),
        listeners = emitter.listener_count::<OrderPlaced>(),
        "Done"
    );
    Ok(())
}
