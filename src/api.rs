//! The narrow interface the HTTP-facing collaborator programs against.
//!
//! Keeping the surface behind a trait lets the outer layer hold a
//! `dyn OrdersApi` and lets its tests substitute the engine without spawning
//! the real pipeline.

use crate::error::Result;
use crate::model::{Item, Order, Product, Statistics};
use crate::pipeline::OrderSystem;
use async_trait::async_trait;
use std::time::Duration;

/// Everything the engine exposes to the outside world.
#[async_trait]
pub trait OrdersApi: Send + Sync {
    /// Creates a new order for the given item; returns it with status `New`.
    async fn create_order(&self, item: Item) -> Result<Order>;

    /// Returns the latest known state of an order.
    async fn get_order(&self, id: &str) -> Result<Order>;

    /// Returns all products in the catalog.
    async fn all_products(&self) -> Vec<Product>;

    /// Requests the reversal of a completed order.
    async fn request_reversal(&self, order_id: &str) -> Result<Order>;

    /// Opens the app for new orders.
    async fn open(&self);

    /// Closes the app; in-flight work drains on a best-effort basis.
    async fn close(&self);

    /// Whether the app currently accepts orders.
    async fn is_open(&self) -> bool;

    /// Fetches a statistics snapshot, racing the given deadline.
    async fn get_statistics(&self, deadline: Duration) -> Result<Statistics>;
}

#[async_trait]
impl OrdersApi for OrderSystem {
    async fn create_order(&self, item: Item) -> Result<Order> {
        OrderSystem::create_order(self, item).await
    }

    async fn get_order(&self, id: &str) -> Result<Order> {
        OrderSystem::get_order(self, id).await
    }

    async fn all_products(&self) -> Vec<Product> {
        OrderSystem::all_products(self).await
    }

    async fn request_reversal(&self, order_id: &str) -> Result<Order> {
        OrderSystem::request_reversal(self, order_id).await
    }

    async fn open(&self) {
        OrderSystem::open(self).await
    }

    async fn close(&self) {
        OrderSystem::close(self).await
    }

    async fn is_open(&self) -> bool {
        OrderSystem::is_open(self).await
    }

    async fn get_statistics(&self, deadline: Duration) -> Result<Statistics> {
        OrderSystem::get_statistics(self, deadline).await
    }
}
