//! Expiry Sweeper Task
//!
//! Background task that periodically removes expired cache entries.
//!
//! Each cache owns one sweeper. The task ticks on a fixed interval, runs one
//! sweep cycle per tick, and exits as soon as its shutdown channel fires or
//! its owning handle is dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::StoreInner;

// == Sweeper Handle ==
/// Owning handle to a running sweeper task.
///
/// Dropping the handle signals the task to stop.
#[derive(Debug)]
pub(crate) struct SweeperHandle {
    shutdown_tx: watch::Sender<bool>,
    /// Taken by `shutdown` once awaited
    task: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Spawns a sweeper over `store` on the current Tokio runtime.
    ///
    /// The first sweep runs one full `interval` after spawning.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn spawn<V>(store: Arc<StoreInner<V>>, interval: Duration) -> Self
    where
        V: Clone + Send + Sync + 'static,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(sweeper_loop(store, interval, shutdown_rx));

        Self {
            shutdown_tx,
            task: Some(task),
        }
    }

    /// Signals the task to stop without waiting for it.
    pub fn stop(&self) {
        // Err only when the task has already exited
        let _ = self.shutdown_tx.send(true);
    }

    /// Signals the task to stop and waits until it has exited.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                debug!(error = %err, "Sweeper task ended abnormally");
            }
        }
    }

    /// Returns true until the task has exited.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn next_tick(ticker: Option<&mut time::Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// The main sweeper loop.
async fn sweeper_loop<V>(
    store: Arc<StoreInner<V>>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) where
    V: Clone + Send + Sync + 'static,
{
    // An interval past the clock range never ticks; the task only awaits shutdown
    let mut ticker = Instant::now().checked_add(interval).map(|start| {
        let mut ticker = time::interval_at(start, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    });

    info!(interval = ?interval, ticking = ticker.is_some(), "Expiry sweeper started");

    loop {
        tokio::select! {
            biased;

            changed = shutdown_rx.changed() => {
                // Err means every sender is gone
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
            _ = next_tick(ticker.as_mut()) => {
                store.sweep_expired();
            }
        }
    }

    info!("Expiry sweeper stopped");
}
