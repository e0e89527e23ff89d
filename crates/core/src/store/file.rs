// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Single-document JSON key-value engine.
//!
//! The whole map is held in memory and rewritten on every mutation: written to
//! a sibling temp file, fsynced, then renamed over the original so a crash
//! never leaves a half-written document behind. The in-memory map only takes
//! a change once its document has been written.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::{ensure_parent, Backend, StoredValue};
use crate::error::{Error, Result};

type Entries = BTreeMap<String, StoredValue>;

/// Key-value engine persisted as one JSON document.
pub struct FileBackend {
    path: PathBuf,
    entries: Mutex<Entries>,
}

impl FileBackend {
    /// Opens the document at `path`, creating it on first write.
    pub fn open(path: &Path) -> Result<Self> {
        ensure_parent(path)?;
        let entries = match std::fs::read_to_string(path) {
            Ok(text) if text.trim().is_empty() => Entries::new(),
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| Error::CorruptedData(format!("{}: {}", path.display(), e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Entries::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(FileBackend {
            path: path.to_path_buf(),
            entries: Mutex::new(entries),
        })
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn entries(&self) -> Result<MutexGuard<'_, Entries>> {
        self.entries.lock().map_err(|_| Error::LockPoisoned)
    }

    fn persist(&self, entries: &Entries) -> Result<()> {
        let tmp = self.path.with_extension("tmp");
        {
            let mut file = File::create(&tmp)?;
            let json = serde_json::to_string(entries)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Backend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    fn get(&self, key: &str) -> Result<Option<StoredValue>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: StoredValue) -> Result<()> {
        let mut entries = self.entries()?;
        let mut next = entries.clone();
        next.insert(key.to_string(), value);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.entries()?;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries()?.keys().cloned().collect())
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.entries()?;
        self.persist(&Entries::new())?;
        entries.clear();
        Ok(())
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
