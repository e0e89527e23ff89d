// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! iw-client: request layer and offline sync for the invitationweb backend.
//!
//! - [`http`] - credential injection, retry with backoff, token refresh
//! - [`api`] - typed endpoint calls
//! - [`sync`] - persisted offline queue drained on reconnect
//! - [`session`] - sign-in state over the credential cache
//! - [`connectivity`] - reachability source driving the queue

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod connectivity;
pub mod endpoints;
pub mod env;
pub mod error;
pub mod http;
pub mod session;
pub mod sync;

pub use api::Api;
pub use config::Config;
pub use connectivity::{ConnectivityMonitor, ConnectivityObserver, NetworkState};
pub use error::{ApiError, ApiResult};
pub use http::{HttpClient, RetryPolicy};
pub use session::Session;
pub use sync::{ApiDispatcher, SyncService};
