// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline mutation queue and its delivery to the backend.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ SyncService │────►│ Dispatcher  │────►│ HttpClient  │
//! │ (drain loop)│     │   (trait)   │     │             │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!     │      ▲
//!     ▼      │ connectivity changes
//! ┌─────────────┐     ┌──────────────────────┐
//! │   Queue     │     │ ConnectivityObserver │
//! │ (sync.queue)│     └──────────────────────┘
//! └─────────────┘
//! ```
//!
//! # Features
//!
//! - FIFO queue persisted after every change
//! - At most one drain pass at a time
//! - Per-operation attempt limit, after which the operation is discarded
//! - Drain on reconnect and on enqueue while online
//! - Injectable dispatcher trait for testing

mod dispatch;
mod queue;
mod service;

pub use dispatch::{content_type_for, ApiDispatcher, DispatchError, DispatchResult, Dispatcher};
pub use queue::{FailureOutcome, OfflineQueue, QUEUE_KEY};
pub use service::{
    DrainReport, Subscription, SyncConfig, SyncError, SyncResult, SyncService, SyncStatus,
};

#[cfg(test)]
mod test_helpers;
