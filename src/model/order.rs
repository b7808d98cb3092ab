use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The lifecycle states an order moves through.
///
/// `New` orders are accepted but not yet fulfilled. The fulfillment loop
/// finalizes them as `Completed` or `Rejected`. A `Completed` order can be
/// re-submitted as `ReversalRequested`, which finalizes again as `Completed`
/// (carrying the inverted amount) or `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    New,
    Completed,
    Rejected,
    ReversalRequested,
    Reversed,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::New => "New",
            OrderStatus::Completed => "Completed",
            OrderStatus::Rejected => "Rejected",
            OrderStatus::ReversalRequested => "ReversalRequested",
            OrderStatus::Reversed => "Reversed",
        };
        write!(f, "{name}")
    }
}

/// What a caller asks for: a product and how many units of it.
///
/// `amount` must be at least 1 on intake; the fulfillment loop negates it
/// internally when processing a reversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub product_id: String,
    pub amount: i64,
}

/// A customer order.
///
/// The [`OrderLedger`](crate::store::OrderLedger) holds the latest known
/// state of every order; the pipeline works on a transient copy while an
/// order is in flight. `total` and `error` are filled in by the fulfillment
/// loop when the order is finalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub item: Item,
    #[serde(default)]
    pub total: Decimal,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
}

impl Order {
    /// Creates a `New` order for the given item with a freshly generated id.
    pub fn new(item: Item) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            item,
            total: Decimal::ZERO,
            error: String::new(),
            created_at: Utc::now(),
            status: OrderStatus::New,
        }
    }

    /// Marks the order as successfully fulfilled.
    pub fn complete(&mut self) {
        self.status = OrderStatus::Completed;
    }

    /// Marks the order as rejected, recording the reason.
    pub fn reject(&mut self, reason: impl Into<String>) {
        self.status = OrderStatus::Rejected;
        self.error = reason.into();
    }
}
