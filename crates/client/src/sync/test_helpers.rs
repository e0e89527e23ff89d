// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;
use tokio::sync::{Notify, Semaphore};

use iw_core::store::MemoryBackend;
use iw_core::{Backend, OpKind, ResourceType, Storage, StoredValue, SyncOperation};

use super::dispatch::{DispatchError, DispatchResult, Dispatcher};
use super::service::{SyncConfig, SyncService};
use crate::error::ApiError;

/// Dispatcher that records every attempt and fails on request.
#[derive(Default)]
pub struct RecordingDispatcher {
    attempts: Mutex<Vec<SyncOperation>>,
    always_fail: AtomicBool,
    /// Upcoming dispatches that fail before the rest succeed.
    fail_next: AtomicU32,
    /// When set, each dispatch waits for a permit.
    gate: Option<Arc<Semaphore>>,
    started: Arc<Notify>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        RecordingDispatcher::default()
    }

    pub fn failing() -> Self {
        let dispatcher = RecordingDispatcher::default();
        dispatcher.always_fail.store(true, Ordering::SeqCst);
        dispatcher
    }

    /// A dispatcher whose deliveries block until `gate` has permits.
    pub fn gated(gate: Arc<Semaphore>) -> Self {
        RecordingDispatcher {
            gate: Some(gate),
            ..RecordingDispatcher::default()
        }
    }

    pub fn fail_next(&self, count: u32) {
        self.fail_next.store(count, Ordering::SeqCst);
    }

    pub fn set_always_fail(&self, fail: bool) {
        self.always_fail.store(fail, Ordering::SeqCst);
    }

    /// Every dispatch attempt, in order.
    pub fn attempts(&self) -> Vec<SyncOperation> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }

    /// Resolves once a dispatch has started.
    pub fn started(&self) -> Arc<Notify> {
        Arc::clone(&self.started)
    }

    fn should_fail(&self) -> bool {
        if self.always_fail.load(Ordering::SeqCst) {
            return true;
        }
        self.fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl Dispatcher for RecordingDispatcher {
    fn dispatch<'a>(
        &'a self,
        op: &'a SyncOperation,
    ) -> Pin<Box<dyn Future<Output = DispatchResult> + Send + 'a>> {
        Box::pin(async move {
            self.attempts.lock().unwrap().push(op.clone());
            self.started.notify_one();
            if let Some(gate) = &self.gate {
                gate.acquire().await.expect("gate closed").forget();
            }
            if self.should_fail() {
                Err(DispatchError::Api(ApiError::Network("mock failure".into())))
            } else {
                Ok(())
            }
        })
    }
}

/// In-memory backend whose writes can be made to fail.
#[derive(Clone)]
pub struct FlakyBackend {
    inner: Arc<MemoryBackend>,
    /// Writes still allowed before every write fails; `None` allows all.
    writes_left: Arc<Mutex<Option<usize>>>,
}

impl FlakyBackend {
    pub fn new() -> Self {
        FlakyBackend {
            inner: Arc::new(MemoryBackend::new()),
            writes_left: Arc::new(Mutex::new(None)),
        }
    }

    /// Lets `count` more writes through, then fails the rest.
    pub fn fail_writes_after(&self, count: usize) {
        *self.writes_left.lock().unwrap() = Some(count);
    }

    pub fn heal(&self) {
        *self.writes_left.lock().unwrap() = None;
    }

    fn check_write(&self) -> iw_core::Result<()> {
        let mut left = self.writes_left.lock().unwrap();
        match left.as_mut() {
            None => Ok(()),
            Some(0) => Err(std::io::Error::other("disk full").into()),
            Some(n) => {
                *n -= 1;
                Ok(())
            }
        }
    }
}

impl Default for FlakyBackend {
    fn default() -> Self {
        FlakyBackend::new()
    }
}

impl Backend for FlakyBackend {
    fn name(&self) -> &'static str {
        "flaky"
    }

    fn get(&self, key: &str) -> iw_core::Result<Option<StoredValue>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: StoredValue) -> iw_core::Result<()> {
        self.check_write()?;
        self.inner.set(key, value)
    }

    fn delete(&self, key: &str) -> iw_core::Result<()> {
        self.check_write()?;
        self.inner.delete(key)
    }

    fn keys(&self) -> iw_core::Result<Vec<String>> {
        self.inner.keys()
    }

    fn clear(&self) -> iw_core::Result<()> {
        self.check_write()?;
        self.inner.clear()
    }
}

/// The queue as last written to `storage`.
pub fn stored_queue(storage: &Storage) -> Vec<SyncOperation> {
    storage
        .get_json(super::queue::QUEUE_KEY)
        .unwrap()
        .unwrap_or_default()
}

/// A project update for `id`.
pub fn project_update(id: &str, title: &str) -> (OpKind, ResourceType, serde_json::Value) {
    (
        OpKind::Update,
        ResourceType::Project,
        json!({"id": id, "title": title}),
    )
}

/// A service over in-memory storage with the default attempt limit.
pub fn service_with(dispatcher: RecordingDispatcher) -> Arc<SyncService<RecordingDispatcher>> {
    service_on(Storage::in_memory(), dispatcher)
}

pub fn service_on(
    storage: Storage,
    dispatcher: RecordingDispatcher,
) -> Arc<SyncService<RecordingDispatcher>> {
    Arc::new(SyncService::new(storage, dispatcher, &SyncConfig::default()).unwrap())
}
