use crate::model::Order;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The order ledger: latest known state of every order, keyed by order id.
///
/// Purely a keyed store, last-write-wins. The intake path records `New`
/// orders and the fulfillment loop records terminal states; the two writers
/// own disjoint phases of an order's lifecycle.
#[derive(Default, Clone)]
pub struct OrderLedger {
    orders: Arc<RwLock<HashMap<String, Order>>>,
}

impl OrderLedger {
    /// Creates a new, empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the order with the given id, if any.
    pub async fn find(&self, id: &str) -> Option<Order> {
        let orders = self.orders.read().await;
        orders.get(id).cloned()
    }

    /// Inserts or replaces an order by id.
    pub async fn upsert(&self, order: Order) {
        let mut orders = self.orders.write().await;
        orders.insert(order.id.clone(), order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, OrderStatus};

    fn order() -> Order {
        Order::new(Item {
            product_id: "widget".to_string(),
            amount: 2,
        })
    }

    #[tokio::test]
    async fn test_find_missing_order() {
        let ledger = OrderLedger::new();
        assert!(ledger.find("nope").await.is_none());
    }

    #[tokio::test]
    async fn test_upsert_is_last_write_wins() {
        let ledger = OrderLedger::new();
        let mut order = order();
        ledger.upsert(order.clone()).await;

        order.complete();
        ledger.upsert(order.clone()).await;

        let found = ledger.find(&order.id).await.unwrap();
        assert_eq!(found.status, OrderStatus::Completed);
    }
}
