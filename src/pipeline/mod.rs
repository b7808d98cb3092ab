//! # Order Processing Pipeline
//!
//! [`OrderSystem`] is the caller-facing facade and the owner of the app's
//! open/closed lifecycle. It validates incoming items, hands accepted orders
//! to the fulfillment loop over the intake channel, and supervises one
//! *generation* of background tasks per open/close cycle.
//!
//! ## Generations
//!
//! Opening the app allocates a fresh intake channel, a fresh cancellation
//! token and a fresh [`StatsService`] (with a zeroed aggregate), then spawns
//! the generation's tasks. Closing cancels the token and awaits the task
//! handles; senders still pointing at the old generation fail their handoff
//! instead of leaking. An order racing a close either lands in the loop
//! before it observes the signal or fails with
//! [`Closed`](crate::error::OrdersError::Closed); which one wins is
//! deliberately unspecified.

mod fulfillment;

use crate::config::EngineConfig;
use crate::error::{OrdersError, Result};
use crate::model::{Item, Order, OrderStatus, Product, Statistics};
use crate::stats::StatsService;
use crate::store::{OrderLedger, ProductCatalog};
use self::fulfillment::FulfillmentLoop;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// One open/close cycle's live channels and workers.
struct Generation {
    number: u64,
    intake: mpsc::Sender<Order>,
    shutdown: CancellationToken,
    stats: StatsService,
    handles: Vec<JoinHandle<()>>,
}

#[derive(Default)]
struct AppState {
    generation_counter: u64,
    generation: Option<Generation>,
}

/// The order-fulfillment engine.
///
/// Construct with [`OrderSystem::new`], load the initial catalog with
/// [`OrderSystem::seed`], then call [`OrderSystem::open`] to start accepting
/// orders. All methods take `&self`; the system is shared by reference (or
/// behind an `Arc`) with however many callers the outer layer has.
pub struct OrderSystem {
    catalog: ProductCatalog,
    ledger: OrderLedger,
    config: EngineConfig,
    state: RwLock<AppState>,
}

impl OrderSystem {
    /// Creates a closed system with an empty catalog.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            catalog: ProductCatalog::new(),
            ledger: OrderLedger::new(),
            config,
            state: RwLock::new(AppState::default()),
        }
    }

    /// Loads the initial product catalog. Called once at startup by the
    /// seeding collaborator, before the app opens.
    pub async fn seed(&self, products: impl IntoIterator<Item = Product>) {
        for product in products {
            self.catalog.upsert(product).await;
        }
    }

    /// Opens the app: spawns a fresh generation of fulfillment and
    /// statistics tasks and starts accepting orders.
    ///
    /// A no-op if the app is already open; the caller-facing layer surfaces
    /// "already open" to users.
    pub async fn open(&self) {
        let mut state = self.state.write().await;
        if state.generation.is_some() {
            debug!("orders app already open");
            return;
        }

        state.generation_counter += 1;
        let number = state.generation_counter;
        let shutdown = CancellationToken::new();
        let (intake_tx, intake_rx) = mpsc::channel(self.config.intake_capacity.max(1));
        let (finalized_tx, finalized_rx) = mpsc::channel(self.config.stats_workers.max(1));

        let (stats, mut handles) =
            StatsService::spawn(finalized_rx, shutdown.clone(), &self.config);
        handles.push(tokio::spawn(
            FulfillmentLoop {
                generation: number,
                catalog: self.catalog.clone(),
                ledger: self.ledger.clone(),
                intake: intake_rx,
                finalized: finalized_tx,
                shutdown: shutdown.clone(),
            }
            .run(),
        ));

        state.generation = Some(Generation {
            number,
            intake: intake_tx,
            shutdown,
            stats,
            handles,
        });
        info!(generation = number, "orders app open");
    }

    /// Closes the app: signals the current generation's done token and waits
    /// for its tasks to stop.
    ///
    /// In-flight orders past the handoff point are finalized or dropped on a
    /// best-effort basis; new handoffs fail with
    /// [`Closed`](OrdersError::Closed). A no-op if already closed.
    pub async fn close(&self) {
        let generation = { self.state.write().await.generation.take() };
        let Some(generation) = generation else {
            debug!("orders app already closed");
            return;
        };

        generation.shutdown.cancel();
        for handle in generation.handles {
            if let Err(join_error) = handle.await {
                error!(?join_error, "generation task failed");
            }
        }
        info!(generation = generation.number, "orders app closed");
    }

    /// Closes the app and consumes the system.
    pub async fn shutdown(self) {
        self.close().await;
    }

    /// Whether the app currently accepts orders.
    pub async fn is_open(&self) -> bool {
        self.state.read().await.generation.is_some()
    }

    /// Creates a new order for the given item.
    ///
    /// Returns the order with status `New` as soon as the handoff to the
    /// fulfillment loop succeeds; completion or rejection happens
    /// asynchronously and is observed through [`OrderSystem::get_order`].
    pub async fn create_order(&self, item: Item) -> Result<Order> {
        self.validate_item(&item).await?;
        let order = Order::new(item);
        debug!(order_id = %order.id, "order accepted for fulfillment");
        self.submit(order).await
    }

    /// Re-injects a completed order, inverted, through the fulfillment loop.
    pub async fn request_reversal(&self, order_id: &str) -> Result<Order> {
        let mut order = self.get_order(order_id).await?;
        if order.status != OrderStatus::Completed {
            return Err(OrdersError::NotReversible(order.status));
        }
        order.status = OrderStatus::ReversalRequested;
        debug!(order_id = %order.id, "reversal accepted for fulfillment");
        self.submit(order).await
    }

    /// Returns the latest known state of an order.
    pub async fn get_order(&self, id: &str) -> Result<Order> {
        self.ledger
            .find(id)
            .await
            .ok_or_else(|| OrdersError::OrderNotFound(id.to_string()))
    }

    /// Returns all products. Iteration order is unspecified.
    pub async fn all_products(&self) -> Vec<Product> {
        self.catalog.all_products().await
    }

    /// Fetches a statistics snapshot, racing the given deadline.
    pub async fn get_statistics(&self, deadline: Duration) -> Result<Statistics> {
        let stats = {
            let state = self.state.read().await;
            match &state.generation {
                Some(generation) => generation.stats.clone(),
                None => return Err(OrdersError::Closed),
            }
        };
        stats.get_stats(deadline).await
    }

    async fn validate_item(&self, item: &Item) -> Result<()> {
        if item.amount < 1 {
            return Err(OrdersError::InvalidAmount(item.amount));
        }
        if !self.catalog.exists(&item.product_id).await {
            return Err(OrdersError::ProductNotFound(item.product_id.clone()));
        }
        Ok(())
    }

    /// Hands an order to the current generation's fulfillment loop.
    ///
    /// The send races the generation's done token; only after a successful
    /// handoff is the order persisted and returned, so a `Closed` failure
    /// leaves no record behind.
    async fn submit(&self, order: Order) -> Result<Order> {
        let (intake, shutdown) = {
            let state = self.state.read().await;
            let Some(generation) = &state.generation else {
                return Err(OrdersError::Closed);
            };
            (generation.intake.clone(), generation.shutdown.clone())
        };

        tokio::select! {
            _ = shutdown.cancelled() => Err(OrdersError::Closed),
            sent = intake.send(order.clone()) => match sent {
                Ok(()) => {
                    self.ledger.upsert(order.clone()).await;
                    Ok(order)
                }
                Err(_) => Err(OrdersError::Closed),
            },
        }
    }
}
