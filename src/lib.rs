//! # Orders Engine
//!
//! > **An in-memory order-fulfillment engine built on message-passing.**
//!
//! This crate accepts order requests against a product catalog, serializes
//! every inventory mutation through a single fulfillment loop, and produces
//! aggregate statistics asynchronously through a worker pool. HTTP routing,
//! wire encoding and process bootstrap live outside the crate and reach it
//! through the narrow [`OrdersApi`](api::OrdersApi) trait.
//!
//! ## 🏗️ Design Philosophy
//!
//! The hard part of this system is the concurrency core, and the crate leans
//! on one idea throughout: **single-writer ownership enforced by channels,
//! not locks**.
//!
//! - The fulfillment loop is the only task that mutates product stock, so the
//!   check-then-set on stock needs no lock: FIFO intake *is* the
//!   linearization point.
//! - The statistics reconciler is the only task that mutates the aggregate;
//!   workers merely compute contributions, which combine commutatively, so
//!   worker output order never matters.
//! - Open/close is modeled as *generations*: each open allocates fresh
//!   channels, a fresh cancellation token and fresh statistics, and each
//!   close cancels and awaits that generation's tasks, so stale workers can
//!   never leak into a reopened app.
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`] - the value types: [`Product`](model::Product),
//!   [`Item`](model::Item), [`Order`](model::Order),
//!   [`Statistics`](model::Statistics).
//! - [`store`] - typed keyed stores:
//!   [`ProductCatalog`](store::ProductCatalog) and
//!   [`OrderLedger`](store::OrderLedger).
//! - [`pipeline`] - [`OrderSystem`](pipeline::OrderSystem), the lifecycle
//!   owner, plus the fulfillment loop.
//! - [`stats`] - the worker pool, reconciler and deadline-raced snapshot
//!   queries.
//! - [`api`] - the [`OrdersApi`](api::OrdersApi) seam for the outer layer.
//! - [`config`], [`error`], [`tracing`] - the ambient stack.
//!
//! ## 🚀 Quick Start
//!
//! ```rust,no_run
//! use orders_engine::config::EngineConfig;
//! use orders_engine::model::{Item, Product};
//! use orders_engine::pipeline::OrderSystem;
//! use rust_decimal_macros::dec;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> orders_engine::error::Result<()> {
//!     let system = OrderSystem::new(EngineConfig::default());
//!     system
//!         .seed([Product::new("P100", "Blue Widget", dec!(2.00), 10)])
//!         .await;
//!     system.open().await;
//!
//!     let order = system
//!         .create_order(Item {
//!             product_id: "P100".to_string(),
//!             amount: 5,
//!         })
//!         .await?;
//!
//!     // Fulfillment is asynchronous; re-query for the terminal status.
//!     let latest = system.get_order(&order.id).await?;
//!     println!("{:?}", latest.status);
//!
//!     let stats = system.get_statistics(Duration::from_secs(1)).await?;
//!     println!("{stats:?}");
//!
//!     system.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod stats;
pub mod store;
pub mod tracing;
