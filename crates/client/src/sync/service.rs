// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync service: the offline queue plus its delivery loop.
//!
//! Operations are delivered one at a time in enqueue order. A drain pass
//! works on a snapshot taken when it starts; anything enqueued meanwhile
//! waits for the next trigger. Triggers are an enqueue while online and an
//! offline to online transition.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;

use iw_core::op::DEFAULT_ATTEMPT_LIMIT;
use iw_core::{OpKind, ResourceType, Storage, SyncOperation};

use super::dispatch::Dispatcher;
use super::queue::{FailureOutcome, OfflineQueue};
use crate::connectivity::{ConnectivityObserver, NetworkState};

/// Configuration for the sync queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Failed deliveries after which an operation is discarded.
    pub max_attempts: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            max_attempts: DEFAULT_ATTEMPT_LIMIT,
        }
    }
}

/// Error type for sync service operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The queue could not be read or persisted.
    #[error("queue storage error: {0}")]
    Store(#[from] iw_core::Error),
}

/// Result type for sync service operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Outcome of one drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    pub delivered: usize,
    /// Failed but kept for a later pass.
    pub failed: usize,
    /// Failed and dropped at the attempt limit.
    pub discarded: usize,
}

impl DrainReport {
    pub fn processed(&self) -> usize {
        self.delivered + self.failed + self.discarded
    }
}

/// Read-only view of the queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncStatus {
    pub is_online: bool,
    pub is_syncing: bool,
    pub queue_length: usize,
    pub pending_operations: Vec<SyncOperation>,
}

/// Stops the connectivity listener when dropped.
#[derive(Debug)]
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    pub fn cancel(self) {
        self.task.abort();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Clears the draining flag when a pass ends, however it ends.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Offline mutation queue with connectivity-driven delivery.
pub struct SyncService<D: Dispatcher> {
    dispatcher: D,
    queue: Mutex<OfflineQueue>,
    online: AtomicBool,
    draining: AtomicBool,
    attempt_limit: u32,
}

impl<D: Dispatcher> SyncService<D> {
    /// Loads the persisted queue. The service starts offline.
    pub fn new(storage: Storage, dispatcher: D, config: &SyncConfig) -> SyncResult<Self> {
        let queue = OfflineQueue::load(storage)?;
        Ok(SyncService {
            dispatcher,
            queue: Mutex::new(queue),
            online: AtomicBool::new(false),
            draining: AtomicBool::new(false),
            attempt_limit: config.max_attempts,
        })
    }

    /// Subscribes to `observer` and drains once if already online.
    ///
    /// Dropping the returned [`Subscription`] stops listening.
    pub async fn initialize(
        self: &Arc<Self>,
        observer: &dyn ConnectivityObserver,
    ) -> Subscription
    where
        D: 'static,
    {
        let mut changes = observer.subscribe();
        let current = observer.current_state();
        self.online.store(current.is_connected, Ordering::Release);

        let service = Arc::clone(self);
        let task = tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let state = *changes.borrow_and_update();
                if let Err(e) = service.handle_connectivity(state).await {
                    tracing::error!(error = %e, "drain after reconnect failed");
                }
            }
        });

        tracing::info!(
            online = current.is_connected,
            pending = self.queue_length(),
            "sync service initialized"
        );
        if current.is_connected {
            if let Err(e) = self.drain().await {
                tracing::error!(error = %e, "initial drain failed");
            }
        }

        Subscription { task }
    }

    /// Applies a connectivity notification.
    ///
    /// Only an offline to online transition drains; the report of that
    /// pass is returned.
    pub async fn handle_connectivity(
        &self,
        state: NetworkState,
    ) -> SyncResult<Option<DrainReport>> {
        let was_online = self.online.swap(state.is_connected, Ordering::AcqRel);
        if was_online || !state.is_connected {
            return Ok(None);
        }
        tracing::info!("connection restored");
        self.drain().await.map(Some)
    }

    /// Queues a mutation and, if online and idle, drains immediately.
    ///
    /// Succeeds once the operation is persisted; delivery problems are
    /// logged and left to the drain.
    pub async fn enqueue(
        &self,
        kind: OpKind,
        resource: ResourceType,
        payload: Value,
    ) -> SyncResult<SyncOperation> {
        let op = SyncOperation::new(kind, resource, payload, self.attempt_limit);
        self.lock_queue().push(op.clone())?;
        tracing::debug!(id = %op.id, %kind, %resource, "operation queued");

        if self.is_online() && !self.is_syncing() {
            if let Err(e) = self.drain().await {
                tracing::error!(id = %op.id, error = %e, "drain after enqueue failed");
            }
        }
        Ok(op)
    }

    /// Delivers a snapshot of the queue, one operation at a time.
    ///
    /// Does nothing when offline, already draining, or empty. A queue write
    /// that fails leaves that operation as it was and the pass moves on.
    pub async fn drain(&self) -> SyncResult<DrainReport> {
        let mut report = DrainReport::default();
        if !self.is_online() {
            return Ok(report);
        }
        if self
            .draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("drain already in progress");
            return Ok(report);
        }
        let _guard = DrainGuard(&self.draining);

        let snapshot = self.lock_queue().snapshot();
        if snapshot.is_empty() {
            return Ok(report);
        }
        tracing::info!(pending = snapshot.len(), "draining offline queue");

        for op in snapshot {
            let delivery = self.dispatcher.dispatch(&op).await;
            match delivery {
                Ok(()) => {
                    report.delivered += 1;
                    match self.lock_queue().remove(&op.id) {
                        Ok(_) => tracing::debug!(id = %op.id, "operation delivered"),
                        Err(store) => tracing::error!(
                            id = %op.id,
                            error = %store,
                            "operation delivered but could not be removed from the queue"
                        ),
                    }
                }
                Err(e) => {
                    let outcome = match self.lock_queue().record_failure(&op.id) {
                        Ok(outcome) => outcome,
                        Err(store) => {
                            report.failed += 1;
                            tracing::error!(
                                id = %op.id,
                                error = %e,
                                store_error = %store,
                                "delivery failed and the attempt could not be recorded"
                            );
                            continue;
                        }
                    };
                    match outcome {
                        FailureOutcome::Retained { attempts } => {
                            report.failed += 1;
                            tracing::warn!(
                                id = %op.id,
                                kind = %op.kind,
                                resource = %op.resource,
                                attempts,
                                error = %e,
                                "delivery failed, will retry"
                            );
                        }
                        FailureOutcome::Discarded { attempts } => {
                            report.discarded += 1;
                            tracing::error!(
                                id = %op.id,
                                kind = %op.kind,
                                resource = %op.resource,
                                attempts,
                                error = %e,
                                "delivery failed, discarding operation"
                            );
                        }
                        FailureOutcome::Missing => {
                            tracing::debug!(id = %op.id, "operation removed during drain");
                        }
                    }
                }
            }
        }

        if let Err(e) = self.lock_queue().persist() {
            tracing::warn!(error = %e, "could not persist queue after drain");
        }
        tracing::info!(
            delivered = report.delivered,
            failed = report.failed,
            discarded = report.discarded,
            "drain complete"
        );
        Ok(report)
    }

    pub fn status(&self) -> SyncStatus {
        let queue = self.lock_queue();
        SyncStatus {
            is_online: self.is_online(),
            is_syncing: self.is_syncing(),
            queue_length: queue.len(),
            pending_operations: queue.snapshot(),
        }
    }

    /// Empties the queue.
    pub fn clear(&self) -> SyncResult<()> {
        self.lock_queue().clear()?;
        tracing::info!("offline queue cleared");
        Ok(())
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    pub fn is_syncing(&self) -> bool {
        self.draining.load(Ordering::Acquire)
    }

    pub fn queue_length(&self) -> usize {
        self.lock_queue().len()
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    fn lock_queue(&self) -> MutexGuard<'_, OfflineQueue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
