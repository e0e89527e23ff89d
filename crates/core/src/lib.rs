// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! iw-core: Shared building blocks for the invitationweb client.
//!
//! This crate provides the runtime-free pieces used by the request layer and
//! the offline sync queue:
//!
//! - [`Storage`] - durable key-value storage over a selectable [`Backend`]
//! - [`CredentialCache`] - the cached token pair and user snapshot
//! - [`SyncOperation`] - a pending mutation awaiting delivery
//! - [`Preferences`] - simple UI preference keys

pub mod credentials;
pub mod error;
pub mod op;
pub mod prefs;
pub mod store;

pub use credentials::{CredentialCache, UserProfile};
pub use error::{Error, Result};
pub use op::{OpKind, ResourceType, SyncOperation};
pub use prefs::Preferences;
pub use store::{Backend, Engine, Storage, StorageConfig, StoredValue};
