use orders_engine::config::EngineConfig;
use orders_engine::error::OrdersError;
use orders_engine::model::{Item, OrderStatus, Product, Statistics};
use orders_engine::pipeline::OrderSystem;
use rust_decimal_macros::dec;
use std::time::Duration;

fn item(product_id: &str, amount: i64) -> Item {
    Item {
        product_id: product_id.to_string(),
        amount,
    }
}

async fn open_system(config: EngineConfig) -> OrderSystem {
    let system = OrderSystem::new(config);
    system
        .seed([Product::new("P1", "Widget", dec!(2.00), 100)])
        .await;
    system.open().await;
    system
}

/// Polls until the aggregate matches; panics if it never converges.
async fn wait_for_stats(
    system: &OrderSystem,
    matches: impl Fn(&Statistics) -> bool,
) -> Statistics {
    for _ in 0..200 {
        let stats = system
            .get_statistics(Duration::from_secs(1))
            .await
            .expect("snapshot should not time out");
        if matches(&stats) {
            return stats;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("statistics never reached the expected value");
}

/// With a generous deadline the snapshot reflects everything reconciled so
/// far, regardless of the order the workers finished in.
#[tokio::test]
async fn test_statistics_reflect_finalized_orders() {
    let system = open_system(EngineConfig {
        delay_min_ms: 0,
        delay_max_ms: 1,
        ..EngineConfig::default()
    })
    .await;

    for _ in 0..3 {
        system.create_order(item("P1", 2)).await.unwrap();
    }
    // One rejection: more than the catalog holds.
    system.create_order(item("P1", 500)).await.unwrap();

    let stats = wait_for_stats(&system, |s| {
        s.completed_orders == 3 && s.rejected_orders == 1
    })
    .await;
    assert_eq!(stats.revenue, dec!(12.00));
    assert_eq!(stats.reversed_orders, 0);

    system.shutdown().await;
}

/// A reversal's negative total cancels the original contribution.
#[tokio::test]
async fn test_statistics_net_out_after_reversal() {
    let system = open_system(EngineConfig {
        delay_min_ms: 0,
        delay_max_ms: 1,
        ..EngineConfig::default()
    })
    .await;

    let order = system.create_order(item("P1", 5)).await.unwrap();
    wait_for_stats(&system, |s| s.completed_orders == 1).await;

    // The order is already Completed in the ledger once its stats landed.
    assert_eq!(
        system.get_order(&order.id).await.unwrap().status,
        OrderStatus::Completed
    );
    system.request_reversal(&order.id).await.unwrap();

    let stats = wait_for_stats(&system, |s| s.completed_orders == 2).await;
    assert_eq!(stats.revenue, dec!(0));

    system.shutdown().await;
}

/// A deadline shorter than the simulated snapshot cost always times out.
#[tokio::test]
async fn test_statistics_deadline_times_out() {
    let system = open_system(EngineConfig {
        delay_min_ms: 200,
        delay_max_ms: 200,
        ..EngineConfig::default()
    })
    .await;

    let deadline = Duration::from_millis(20);
    assert_eq!(
        system.get_statistics(deadline).await,
        Err(OrdersError::StatsTimeout(deadline))
    );

    system.shutdown().await;
}
