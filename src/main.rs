//! Demo harness for the orders engine.
//!
//! Seeds a small catalog, drives the order and reversal paths, and prints
//! the resulting statistics. Run with `RUST_LOG=info cargo run` (or `debug`
//! for per-order detail).

use orders_engine::config::EngineConfig;
use orders_engine::error::OrdersError;
use orders_engine::model::{Item, Order, OrderStatus, Product};
use orders_engine::pipeline::OrderSystem;
use orders_engine::tracing::setup_tracing;
use rust_decimal_macros::dec;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> orders_engine::error::Result<()> {
    setup_tracing();
    info!("orders engine demo starting");

    let system = OrderSystem::new(EngineConfig {
        // Keep the simulated processing cost short so the demo is snappy.
        delay_max_ms: 50,
        ..EngineConfig::default()
    });
    system
        .seed([
            Product::new("P100", "Blue Widget", dec!(2.00), 10),
            Product::new("P200", "Red Widget", dec!(3.75), 25),
            Product::new("P300", "Widget Polish", dec!(0.99), 120),
        ])
        .await;
    system.open().await;

    let first = system
        .create_order(Item {
            product_id: "P100".to_string(),
            amount: 5,
        })
        .await?;
    info!(order_id = %first.id, "order placed");

    // More than the remaining stock; the loop will reject this one.
    let doomed = system
        .create_order(Item {
            product_id: "P100".to_string(),
            amount: 8,
        })
        .await?;

    let first = wait_for_terminal(&system, &first.id).await?;
    info!(order_id = %first.id, status = %first.status, total = %first.total, "order finalized");

    let doomed = wait_for_terminal(&system, &doomed.id).await?;
    info!(order_id = %doomed.id, status = %doomed.status, error = %doomed.error, "order finalized");

    let reversal = system.request_reversal(&first.id).await?;
    let reversal = wait_for_terminal(&system, &reversal.id).await?;
    info!(order_id = %reversal.id, status = %reversal.status, total = %reversal.total, "reversal finalized");

    match system.get_statistics(Duration::from_secs(2)).await {
        Ok(stats) => info!(?stats, "final statistics"),
        Err(err) => warn!(error = %err, "statistics not available in time"),
    }

    for product in system.all_products().await {
        info!(product_id = %product.id, stock = product.stock, "closing stock");
    }

    system.shutdown().await;
    info!("orders engine demo finished");
    Ok(())
}

/// Polls the ledger until the order leaves its in-flight status.
async fn wait_for_terminal(system: &OrderSystem, order_id: &str) -> Result<Order, OrdersError> {
    loop {
        let order = system.get_order(order_id).await?;
        match order.status {
            OrderStatus::New | OrderStatus::ReversalRequested => {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            _ => return Ok(order),
        }
    }
}
