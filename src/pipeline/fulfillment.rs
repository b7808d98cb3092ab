//! The fulfillment loop: the single consumer that mutates inventory and
//! finalizes orders.
//!
//! Routing every stock mutation through this one task is the engine's
//! concurrency-control mechanism: there is no lock around the check-then-set
//! on stock because only this loop ever performs it.

use crate::error::OrdersError;
use crate::model::{Order, OrderStatus};
use crate::store::{OrderLedger, ProductCatalog};
use rust_decimal::{Decimal, RoundingStrategy};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// One generation's fulfillment loop.
///
/// Owns the receiving end of the intake channel. Finalized orders are
/// persisted to the ledger unconditionally and then forwarded to the
/// statistics service.
pub(crate) struct FulfillmentLoop {
    pub(crate) generation: u64,
    pub(crate) catalog: ProductCatalog,
    pub(crate) ledger: OrderLedger,
    pub(crate) intake: mpsc::Receiver<Order>,
    pub(crate) finalized: mpsc::Sender<Order>,
    pub(crate) shutdown: CancellationToken,
}

impl FulfillmentLoop {
    /// Runs the loop until the generation's done signal fires or the intake
    /// channel closes.
    pub(crate) async fn run(mut self) {
        info!(generation = self.generation, "order processing started");
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                received = self.intake.recv() => {
                    let Some(order) = received else { break };
                    let order = self.fulfill(order).await;
                    self.ledger.upsert(order.clone()).await;
                    debug!(order_id = %order.id, status = %order.status, "order finalized");

                    tokio::select! {
                        _ = self.shutdown.cancelled() => break,
                        sent = self.finalized.send(order) => {
                            // The stats side of this generation is gone;
                            // nothing left to forward to.
                            if sent.is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        }
        info!(generation = self.generation, "order processing stopped");
    }

    /// Completes or rejects a single order against the catalog.
    ///
    /// For a reversal the effective amount is the negation of the stored one,
    /// so the stock check passes trivially and the decrement restores stock.
    /// The finalized order carries the effective item and a total computed
    /// from it, which is negative for reversals.
    async fn fulfill(&self, mut order: Order) -> Order {
        let mut item = order.item.clone();
        if order.status == OrderStatus::ReversalRequested {
            item.amount = -item.amount;
        }

        let Some(mut product) = self.catalog.find(&item.product_id).await else {
            order.reject(OrdersError::ProductNotFound(item.product_id.clone()).to_string());
            return order;
        };

        if product.stock < item.amount {
            order.reject(
                OrdersError::InsufficientStock {
                    id: product.id.clone(),
                    available: product.stock,
                    requested: item.amount,
                }
                .to_string(),
            );
            return order;
        }

        product.stock -= item.amount;
        let price = product.price;
        self.catalog.upsert(product).await;

        order.total = (Decimal::from(item.amount) * price)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        order.item = item;
        order.complete();
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, Product};
    use rust_decimal_macros::dec;

    fn test_loop(catalog: ProductCatalog) -> FulfillmentLoop {
        let (_intake_tx, intake) = mpsc::channel(1);
        let (finalized, _finalized_rx) = mpsc::channel(1);
        FulfillmentLoop {
            generation: 1,
            catalog,
            ledger: OrderLedger::new(),
            intake,
            finalized,
            shutdown: CancellationToken::new(),
        }
    }

    fn order_for(amount: i64) -> Order {
        Order::new(Item {
            product_id: "widget".to_string(),
            amount,
        })
    }

    #[tokio::test]
    async fn test_fulfill_completes_and_decrements_stock() {
        let catalog = ProductCatalog::new();
        catalog
            .upsert(Product::new("widget", "Widget", dec!(2.00), 10))
            .await;
        let fulfillment = test_loop(catalog.clone());

        let order = fulfillment.fulfill(order_for(5)).await;
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.total, dec!(10.00));
        assert_eq!(catalog.find("widget").await.unwrap().stock, 5);
    }

    #[tokio::test]
    async fn test_fulfill_rejects_on_insufficient_stock() {
        let catalog = ProductCatalog::new();
        catalog
            .upsert(Product::new("widget", "Widget", dec!(2.00), 3))
            .await;
        let fulfillment = test_loop(catalog.clone());

        let order = fulfillment.fulfill(order_for(5)).await;
        assert_eq!(order.status, OrderStatus::Rejected);
        assert_eq!(
            order.error,
            "not enough stock for product widget: got 3, want 5"
        );
        // Stock untouched by a rejected order.
        assert_eq!(catalog.find("widget").await.unwrap().stock, 3);
    }

    #[tokio::test]
    async fn test_fulfill_rejects_unknown_product() {
        let fulfillment = test_loop(ProductCatalog::new());

        let order = fulfillment.fulfill(order_for(1)).await;
        assert_eq!(order.status, OrderStatus::Rejected);
        assert!(order.error.contains("does not exist"));
    }

    #[tokio::test]
    async fn test_fulfill_rounds_half_up() {
        let catalog = ProductCatalog::new();
        catalog
            .upsert(Product::new("widget", "Widget", dec!(0.335), 10))
            .await;
        let fulfillment = test_loop(catalog);

        let order = fulfillment.fulfill(order_for(3)).await;
        // 3 × 0.335 = 1.005 rounds up, not to even.
        assert_eq!(order.total, dec!(1.01));
    }

    #[tokio::test]
    async fn test_fulfill_reversal_restores_stock_and_negates_total() {
        let catalog = ProductCatalog::new();
        catalog
            .upsert(Product::new("widget", "Widget", dec!(2.00), 5))
            .await;
        let fulfillment = test_loop(catalog.clone());

        let mut order = order_for(5);
        order.status = OrderStatus::ReversalRequested;

        let reversed = fulfillment.fulfill(order).await;
        assert_eq!(reversed.status, OrderStatus::Completed);
        assert_eq!(reversed.item.amount, -5);
        assert_eq!(reversed.total, dec!(-10.00));
        assert_eq!(catalog.find("widget").await.unwrap().stock, 10);
    }
}
