// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::{Backend, StoredValue};
use crate::error::{Error, Result};

/// Process-local engine; contents are lost on exit.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<BTreeMap<String, StoredValue>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, BTreeMap<String, StoredValue>>> {
        self.entries.lock().map_err(|_| Error::LockPoisoned)
    }
}

impl Backend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<StoredValue>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: StoredValue) -> Result<()> {
        self.entries()?.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.entries()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries()?.keys().cloned().collect())
    }

    fn clear(&self) -> Result<()> {
        self.entries()?.clear();
        Ok(())
    }
}
