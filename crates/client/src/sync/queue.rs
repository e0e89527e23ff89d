// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline queue for operations awaiting delivery.
//!
//! The queue lives in memory and is written in full to the `sync.queue` key
//! on every change. A change is applied in memory only after its write
//! succeeds, so a restart resumes with exactly what the process last saw.

use iw_core::{Result, Storage, SyncOperation};

/// Storage key holding the serialized queue.
pub const QUEUE_KEY: &str = "sync.queue";

/// What happened to an operation after a failed delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    /// Kept in place for a later drain.
    Retained { attempts: u32 },
    /// Reached its attempt limit and was removed.
    Discarded { attempts: u32 },
    /// No operation with that id is queued.
    Missing,
}

/// FIFO queue of pending operations, persisted through [`Storage`].
pub struct OfflineQueue {
    storage: Storage,
    ops: Vec<SyncOperation>,
}

impl OfflineQueue {
    /// Loads the persisted queue. A missing or unreadable value is an empty queue.
    pub fn load(storage: Storage) -> Result<Self> {
        let ops: Vec<SyncOperation> = storage.get_json(QUEUE_KEY)?.unwrap_or_default();
        if !ops.is_empty() {
            tracing::debug!(pending = ops.len(), "loaded offline queue");
        }
        Ok(OfflineQueue { storage, ops })
    }

    /// Appends an operation and persists the queue.
    ///
    /// If persisting fails the operation is not kept.
    pub fn push(&mut self, op: SyncOperation) -> Result<()> {
        let mut next = self.ops.clone();
        next.push(op);
        self.commit(next)
    }

    /// Copy of the queued operations in delivery order.
    pub fn snapshot(&self) -> Vec<SyncOperation> {
        self.ops.clone()
    }

    pub fn operations(&self) -> &[SyncOperation] {
        &self.ops
    }

    /// Removes a delivered operation. Returns false if it was not queued.
    ///
    /// The operation stays queued if the shortened queue cannot be persisted.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        if !self.ops.iter().any(|op| op.id == id) {
            return Ok(false);
        }
        let next = self.ops.iter().filter(|op| op.id != id).cloned().collect();
        self.commit(next)?;
        Ok(true)
    }

    /// Counts a failed delivery, discarding the operation at its limit.
    ///
    /// Nothing changes if the updated queue cannot be persisted.
    pub fn record_failure(&mut self, id: &str) -> Result<FailureOutcome> {
        let Some(index) = self.ops.iter().position(|op| op.id == id) else {
            return Ok(FailureOutcome::Missing);
        };

        let mut next = self.ops.clone();
        let exhausted = next[index].record_failure();
        let attempts = next[index].attempt_count;
        if exhausted {
            next.remove(index);
        }
        self.commit(next)?;

        Ok(if exhausted {
            FailureOutcome::Discarded { attempts }
        } else {
            FailureOutcome::Retained { attempts }
        })
    }

    /// Drops every queued operation.
    pub fn clear(&mut self) -> Result<()> {
        self.commit(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Writes the current queue to storage.
    pub fn persist(&self) -> Result<()> {
        self.storage.set_json(QUEUE_KEY, &self.ops)
    }

    /// Persists `next` and adopts it only once the write succeeded.
    fn commit(&mut self, next: Vec<SyncOperation>) -> Result<()> {
        self.storage.set_json(QUEUE_KEY, &next)?;
        self.ops = next;
        Ok(())
    }
}
