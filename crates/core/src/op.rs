// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pending mutations for the offline sync queue.
//!
//! Every mutating user action that must survive a connectivity loss is
//! captured as a [`SyncOperation`]. Operations are:
//!
//! - Serializable: persisted as a JSON array under the queue key
//! - Ordered: delivered in enqueue order, never reordered or coalesced
//! - Bounded: discarded once `attempt_count` reaches `attempt_limit`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Default attempt ceiling for queued operations.
pub const DEFAULT_ATTEMPT_LIMIT: u32 = 3;

/// The kind of mutation an operation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    Create,
    Update,
    Delete,
}

impl OpKind {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Create => "create",
            OpKind::Update => "update",
            OpKind::Delete => "delete",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OpKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "create" => Ok(OpKind::Create),
            "update" => Ok(OpKind::Update),
            "delete" => Ok(OpKind::Delete),
            _ => Err(Error::InvalidOpKind(s.to_string())),
        }
    }
}

/// The category of server-side entity an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// An invitation website.
    Project,
    /// An uploaded image.
    Image,
    /// A guest's RSVP submission.
    Rsvp,
}

impl ResourceType {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Project => "project",
            ResourceType::Image => "image",
            ResourceType::Rsvp => "rsvp",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "project" => Ok(ResourceType::Project),
            "image" => Ok(ResourceType::Image),
            "rsvp" => Ok(ResourceType::Rsvp),
            _ => Err(Error::InvalidResourceType(s.to_string())),
        }
    }
}

/// A single pending mutation awaiting delivery to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncOperation {
    /// Unique identifier, stable across restarts.
    pub id: String,
    pub kind: OpKind,
    pub resource: ResourceType,
    /// Resource-specific data handed to the dispatcher.
    pub payload: serde_json::Value,
    pub enqueued_at: DateTime<Utc>,
    /// Failed delivery attempts so far.
    pub attempt_count: u32,
    pub attempt_limit: u32,
}

impl SyncOperation {
    /// Creates a fresh operation with no recorded attempts.
    pub fn new(
        kind: OpKind,
        resource: ResourceType,
        payload: serde_json::Value,
        attempt_limit: u32,
    ) -> Self {
        SyncOperation {
            id: Uuid::now_v7().to_string(),
            kind,
            resource,
            payload,
            enqueued_at: Utc::now(),
            attempt_count: 0,
            attempt_limit,
        }
    }

    /// Records a failed delivery attempt.
    ///
    /// Returns `true` when the operation has now reached its attempt limit and
    /// must be discarded.
    pub fn record_failure(&mut self) -> bool {
        self.attempt_count = self.attempt_count.saturating_add(1);
        self.is_exhausted()
    }

    /// Returns true if no further delivery attempts are allowed.
    pub fn is_exhausted(&self) -> bool {
        self.attempt_count >= self.attempt_limit
    }

    /// Returns the `id` field of the payload, if present as a string.
    pub fn target_id(&self) -> Option<&str> {
        self.payload.get("id").and_then(|v| v.as_str())
    }
}

#[cfg(test)]
#[path = "op_tests.rs"]
mod tests;
