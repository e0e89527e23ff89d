// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for iw-core operations.

use thiserror::Error;

/// All possible errors that can occur in iw-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid operation kind: '{0}'\n  hint: valid kinds are: create, update, delete")]
    InvalidOpKind(String),

    #[error("invalid resource type: '{0}'\n  hint: valid types are: project, image, rsvp")]
    InvalidResourceType(String),

    #[error("invalid storage engine: '{0}'\n  hint: valid engines are: sqlite, file, memory")]
    InvalidEngine(String),

    #[error("storage lock poisoned")]
    LockPoisoned,

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data in store: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for iw-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
