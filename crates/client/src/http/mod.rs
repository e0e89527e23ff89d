// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP request layer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ HttpClient  │────►│  Transport  │────►│   Backend   │
//! │ auth, retry │◄────│   (trait)   │◄────│    API      │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ Credential  │  (bearer and refresh tokens)
//! │   Cache     │
//! └─────────────┘
//! ```

mod client;
mod retry;
mod transport;

pub use client::{decode, HttpClient, RequestOptions, DEFAULT_TIMEOUT};
pub use retry::{is_retryable_status, RetryPolicy};
pub use transport::{
    percent, Body, FilePart, HttpRequest, HttpResponse, Method, ProgressSink, ReqwestTransport,
    Transport, TransportError, TransportResult,
};

#[cfg(test)]
pub(crate) mod test_helpers;
