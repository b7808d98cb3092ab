//! Error types for the orders engine.

use crate::model::OrderStatus;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OrdersError>;

/// Errors surfaced by the engine's caller-facing operations.
///
/// Validation failures are returned synchronously from `create_order` and
/// `request_reversal`. Fulfillment-time failures are never returned to the
/// original caller: they are recorded on the order's `status`/`error` fields
/// and observed through a later `get_order`. [`OrdersError::InsufficientStock`]
/// exists so that rejection reasons are rendered consistently; it is written
/// into the order, not thrown.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrdersError {
    /// The requested amount is below the minimum of 1.
    #[error("order amount must be at least 1, got {0}")]
    InvalidAmount(i64),

    /// The item references a product the catalog does not know.
    #[error("product {0} does not exist")]
    ProductNotFound(String),

    /// The app is closed; no new orders or reversals are accepted.
    #[error("orders app is closed, please try again later")]
    Closed,

    /// No order with the given id exists in the ledger.
    #[error("no order found for id {0}")]
    OrderNotFound(String),

    /// Only completed orders can be reversed.
    #[error("order status is {0}, only completed orders can be reversed")]
    NotReversible(OrderStatus),

    /// The product has fewer units in stock than the order asks for.
    /// Recorded on the rejected order rather than returned from a call.
    #[error("not enough stock for product {id}: got {available}, want {requested}")]
    InsufficientStock {
        id: String,
        available: i64,
        requested: i64,
    },

    /// The statistics snapshot did not arrive before the caller's deadline.
    #[error("statistics deadline of {0:?} exceeded")]
    StatsTimeout(Duration),
}
