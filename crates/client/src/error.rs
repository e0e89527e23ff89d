// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by the request layer.

use serde_json::Value;
use thiserror::Error;

use crate::http::TransportError;

/// Outcome of a logical request that did not succeed.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received: connection failure or timeout.
    #[error("network error: {0}")]
    Network(String),

    #[error("server error {status}: {}", message_of(.body))]
    Server { status: u16, body: Value },

    #[error("request failed with status {status}: {}", message_of(.body))]
    Client { status: u16, body: Value },

    #[error("authentication expired\n  hint: sign in again")]
    AuthExpired,

    #[error("unexpected response body: {0}")]
    Decode(String),

    /// The request was rejected before it was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("credential store error: {0}")]
    Store(#[from] iw_core::Error),
}

/// A specialized Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Server { status, .. } | ApiError::Client { status, .. } => {
                crate::http::is_retryable_status(*status)
            }
            _ => false,
        }
    }

    /// HTTP status of the final response, if one arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } | ApiError::Client { status, .. } => Some(*status),
            ApiError::AuthExpired => Some(401),
            _ => None,
        }
    }

    /// The `error` field of the response body, if the server sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { body, .. } | ApiError::Client { body, .. } => {
                body.get("error").and_then(Value::as_str)
            }
            _ => None,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::InvalidRequest(reason) => ApiError::InvalidRequest(reason),
            other => ApiError::Network(other.to_string()),
        }
    }
}

fn message_of(body: &Value) -> String {
    match body {
        Value::Null => "no body".to_string(),
        Value::String(text) => text.clone(),
        other => other
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| other.to_string()),
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
