//! # Statistics Service
//!
//! Consumes finalized orders and maintains the aggregate [`Statistics`] for
//! one pipeline generation.
//!
//! ## Concurrency Model
//!
//! A fixed pool of workers reads from the shared finalized-orders channel,
//! computes each order's contribution (behind a bounded random delay that
//! models processing cost) and emits it on the partial-statistics channel.
//! A single reconciler folds every partial into the aggregate (it is the
//! only writer, so the aggregate needs no lock) and publishes each new value
//! on a watch channel. Because combination is commutative and associative,
//! workers finishing out of order never corrupt the result.
//!
//! Snapshot queries race a per-query responder task against the caller's
//! deadline; a deadline that fires first abandons the responder, which
//! completes unobserved.
//!
//! All tasks stop when the generation's cancellation token fires; a reopened
//! app gets a fresh service with a zeroed aggregate.

use crate::config::{DelayRange, EngineConfig};
use crate::error::{OrdersError, Result};
use crate::model::{Order, Statistics};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Handle to one generation's statistics pipeline.
///
/// Cloning is cheap; every clone observes the same aggregate.
#[derive(Clone)]
pub struct StatsService {
    snapshot: watch::Receiver<Statistics>,
    delay: DelayRange,
}

impl StatsService {
    /// Spawns the worker pool and the reconciler for one generation.
    ///
    /// Returns the service handle plus the task handles, which the caller
    /// supervises alongside the generation's other tasks.
    pub(crate) fn spawn(
        orders: mpsc::Receiver<Order>,
        shutdown: CancellationToken,
        config: &EngineConfig,
    ) -> (Self, Vec<JoinHandle<()>>) {
        let workers = config.stats_workers.max(1);
        let delay = config.simulated_delay();

        let (partials_tx, partials_rx) = mpsc::channel(workers);
        let (aggregate_tx, aggregate_rx) = watch::channel(Statistics::default());
        let orders = Arc::new(Mutex::new(orders));

        let mut handles = Vec::with_capacity(workers + 1);
        for worker in 0..workers {
            handles.push(tokio::spawn(process_orders(
                worker,
                Arc::clone(&orders),
                partials_tx.clone(),
                shutdown.clone(),
                delay,
            )));
        }
        // Workers hold the only remaining senders; once they all stop, the
        // reconciler drains and exits on its own.
        drop(partials_tx);
        handles.push(tokio::spawn(reconcile(partials_rx, aggregate_tx, shutdown)));

        let service = Self {
            snapshot: aggregate_rx,
            delay,
        };
        (service, handles)
    }

    /// Requests a point-in-time snapshot of the aggregate, racing it against
    /// the given deadline.
    ///
    /// The snapshot itself sits behind a randomized delay that models cost.
    /// If the deadline elapses first the call fails with
    /// [`OrdersError::StatsTimeout`] and the in-flight responder finishes
    /// unobserved; there is no retry.
    pub async fn get_stats(&self, deadline: Duration) -> Result<Statistics> {
        let (respond_to, response) = oneshot::channel();
        let snapshot = self.snapshot.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            delay.sleep().await;
            let _ = respond_to.send(snapshot.borrow().clone());
        });

        match tokio::time::timeout(deadline, response).await {
            Ok(Ok(stats)) => {
                info!(?stats, "statistics fetched");
                Ok(stats)
            }
            _ => Err(OrdersError::StatsTimeout(deadline)),
        }
    }
}

/// Worker loop: pull a finalized order, measure it, emit the contribution.
///
/// The mutex serializes only the dequeue handoff; the delay and the
/// contribution run with the lock released, so the pool processes orders in
/// parallel.
async fn process_orders(
    worker: usize,
    orders: Arc<Mutex<mpsc::Receiver<Order>>>,
    partials: mpsc::Sender<Statistics>,
    shutdown: CancellationToken,
    delay: DelayRange,
) {
    info!(worker, "stats processing started");
    loop {
        let order = tokio::select! {
            _ = shutdown.cancelled() => break,
            received = async { orders.lock().await.recv().await } => match received {
                Some(order) => order,
                None => break,
            },
        };

        delay.sleep().await;
        let contribution = Statistics::for_order(&order);
        debug!(order_id = %order.id, status = %order.status, "order measured");

        tokio::select! {
            _ = shutdown.cancelled() => break,
            sent = partials.send(contribution) => {
                if sent.is_err() {
                    break;
                }
            }
        }
    }
    warn!(worker, "stats processing stopped");
}

/// Reconciler loop: the sole writer of the aggregate.
async fn reconcile(
    mut partials: mpsc::Receiver<Statistics>,
    aggregate: watch::Sender<Statistics>,
    shutdown: CancellationToken,
) {
    info!("reconcile started");
    let mut current = Statistics::default();
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            received = partials.recv() => {
                let Some(partial) = received else { break };
                current.combine(partial);
                aggregate.send_replace(current.clone());
            }
        }
    }
    warn!("reconcile stopped");
}
