// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable key-value storage surviving process restarts.
//!
//! [`Storage`] is a cheap-to-clone handle over a [`Backend`]. The backend is
//! chosen by explicit configuration at startup ([`StorageConfig::engine`]):
//!
//! - `sqlite` - [`SqliteBackend`], a single `kv` table (the fast engine)
//! - `file` - [`FileBackend`], one JSON document rewritten on every change
//! - `memory` - [`MemoryBackend`], nothing survives the process
//!
//! When the sqlite engine cannot be opened and `fallback` is set, the file
//! engine is used at the same location with a `.json` extension.

mod file;
mod memory;
mod sqlite;

pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Error, Result};

/// A typed value held by a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StoredValue {
    String(String),
    Bool(bool),
    Number(f64),
}

impl StoredValue {
    /// Returns the kind tag used in storage.
    pub fn kind(&self) -> &'static str {
        match self {
            StoredValue::String(_) => "string",
            StoredValue::Bool(_) => "bool",
            StoredValue::Number(_) => "number",
        }
    }

    /// Encodes the value as text for column storage.
    pub fn encode(&self) -> String {
        match self {
            StoredValue::String(s) => s.clone(),
            StoredValue::Bool(b) => b.to_string(),
            StoredValue::Number(n) => n.to_string(),
        }
    }

    /// Decodes a value from its kind tag and text form.
    pub fn decode(kind: &str, text: &str) -> Result<Self> {
        match kind {
            "string" => Ok(StoredValue::String(text.to_string())),
            "bool" => text
                .parse()
                .map(StoredValue::Bool)
                .map_err(|_| Error::CorruptedData(format!("invalid bool '{text}'"))),
            "number" => text
                .parse()
                .map(StoredValue::Number)
                .map_err(|_| Error::CorruptedData(format!("invalid number '{text}'"))),
            other => Err(Error::CorruptedData(format!("unknown value kind '{other}'"))),
        }
    }
}

/// Storage engine capability.
///
/// Implementations must be safe to share across tasks; every call is
/// synchronous and completes its write before returning.
pub trait Backend: Send + Sync {
    /// Short engine name for diagnostics.
    fn name(&self) -> &'static str;

    fn get(&self, key: &str) -> Result<Option<StoredValue>>;

    fn set(&self, key: &str, value: StoredValue) -> Result<()>;

    /// Removes a key. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Returns all keys in ascending order.
    fn keys(&self) -> Result<Vec<String>>;

    fn clear(&self) -> Result<()>;
}

/// Which backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Engine {
    Sqlite,
    File,
    Memory,
}

impl Engine {
    /// Returns the string representation used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Sqlite => "sqlite",
            Engine::File => "file",
            Engine::Memory => "memory",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Engine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(Engine::Sqlite),
            "file" => Ok(Engine::File),
            "memory" => Ok(Engine::Memory),
            _ => Err(Error::InvalidEngine(s.to_string())),
        }
    }
}

/// Storage configuration, usually the `[storage]` table of the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_engine")]
    pub engine: Engine,
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// Degrade to the file engine if sqlite cannot be opened.
    #[serde(default = "default_fallback")]
    pub fallback: bool,
}

fn default_engine() -> Engine {
    Engine::Sqlite
}

fn default_fallback() -> bool {
    true
}

/// Default store location: `<data dir>/invitationweb/store.db`.
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invitationweb")
        .join("store.db")
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            engine: default_engine(),
            path: default_store_path(),
            fallback: default_fallback(),
        }
    }
}

/// Handle to the configured key-value backend.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn Backend>,
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("engine", &self.backend.name())
            .finish()
    }
}

impl Storage {
    /// Wraps an already opened backend.
    pub fn new(backend: impl Backend + 'static) -> Self {
        Storage {
            backend: Arc::new(backend),
        }
    }

    /// Creates a storage handle that keeps everything in memory.
    pub fn in_memory() -> Self {
        Storage::new(MemoryBackend::new())
    }

    /// Opens the backend selected by `config`.
    pub fn open(config: &StorageConfig) -> Result<Self> {
        match config.engine {
            Engine::Memory => Ok(Storage::in_memory()),
            Engine::File => Ok(Storage::new(FileBackend::open(&config.path)?)),
            Engine::Sqlite => match SqliteBackend::open(&config.path) {
                Ok(backend) => Ok(Storage::new(backend)),
                Err(e) if config.fallback => {
                    let fallback = fallback_path(&config.path);
                    tracing::warn!(
                        "sqlite store unavailable at {}: {}; using file store at {}",
                        config.path.display(),
                        e,
                        fallback.display()
                    );
                    Ok(Storage::new(FileBackend::open(&fallback)?))
                }
                Err(e) => Err(e),
            },
        }
    }

    /// Name of the engine backing this handle.
    pub fn engine_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn get_string(&self, key: &str) -> Result<Option<String>> {
        match self.backend.get(key)? {
            Some(StoredValue::String(s)) => Ok(Some(s)),
            _ => Ok(None),
        }
    }

    pub fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.backend.set(key, StoredValue::String(value.to_string()))
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.backend.get(key)? {
            Some(StoredValue::Bool(b)) => Ok(Some(b)),
            _ => Ok(None),
        }
    }

    pub fn set_bool(&self, key: &str, value: bool) -> Result<()> {
        self.backend.set(key, StoredValue::Bool(value))
    }

    pub fn get_number(&self, key: &str) -> Result<Option<f64>> {
        match self.backend.get(key)? {
            Some(StoredValue::Number(n)) => Ok(Some(n)),
            _ => Ok(None),
        }
    }

    pub fn set_number(&self, key: &str, value: f64) -> Result<()> {
        self.backend.set(key, StoredValue::Number(value))
    }

    /// Reads a JSON value stored as a string.
    ///
    /// A value that fails to parse is reported as absent.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(text) = self.get_string(key)? else {
            return Ok(None);
        };
        if text.is_empty() {
            return Ok(None);
        }
        match serde_json::from_str(&text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("discarding unparseable JSON under '{}': {}", key, e);
                Ok(None)
            }
        }
    }

    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.backend.set(key, StoredValue::String(text))
    }

    pub fn delete(&self, key: &str) -> Result<()> {
        self.backend.delete(key)
    }

    pub fn contains(&self, key: &str) -> Result<bool> {
        self.backend.contains(key)
    }

    pub fn keys(&self) -> Result<Vec<String>> {
        self.backend.keys()
    }

    pub fn clear(&self) -> Result<()> {
        self.backend.clear()
    }
}

fn fallback_path(path: &Path) -> PathBuf {
    path.with_extension("json")
}

/// Creates the parent directory of `path` if needed.
fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
