use crate::model::{Order, OrderStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate order statistics.
///
/// A single order's contribution is produced by [`Statistics::for_order`] and
/// folded into the running aggregate with [`Statistics::combine`]. Combination
/// is commutative and associative (sums of counts and signed revenue), so the
/// reconciler may fold worker output in any order and still converge on the
/// same value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub completed_orders: u64,
    pub reversed_orders: u64,
    pub rejected_orders: u64,
    pub revenue: Decimal,
}

impl Statistics {
    /// Computes the contribution of a single finalized order.
    ///
    /// `Completed` orders add their total to the revenue; for a completed
    /// reversal the total is already negative, so revenue self-corrects.
    /// `Reversed` orders subtract their total. Anything else counts as a
    /// rejection.
    pub fn for_order(order: &Order) -> Statistics {
        match order.status {
            OrderStatus::Completed => Statistics {
                completed_orders: 1,
                revenue: order.total,
                ..Statistics::default()
            },
            OrderStatus::Reversed => Statistics {
                reversed_orders: 1,
                revenue: -order.total,
                ..Statistics::default()
            },
            _ => Statistics {
                rejected_orders: 1,
                ..Statistics::default()
            },
        }
    }

    /// Folds another contribution into this aggregate.
    pub fn combine(&mut self, other: Statistics) {
        self.completed_orders += other.completed_orders;
        self.reversed_orders += other.reversed_orders;
        self.rejected_orders += other.rejected_orders;
        self.revenue += other.revenue;
    }
}
