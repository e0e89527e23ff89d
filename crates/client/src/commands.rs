// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `iwsync` command implementations.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use iw_core::{OpKind, ResourceType, Storage};

use crate::api::Api;
use crate::cli::Command;
use crate::config::{Config, ConfigError};
use crate::connectivity::NetworkState;
use crate::error::ApiError;
use crate::http::{HttpClient, ReqwestTransport, Transport};
use crate::session::{Session, SessionError};
use crate::sync::{ApiDispatcher, SyncError, SyncService};

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] iw_core::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("invalid payload: {0}\n  hint: the payload must be a JSON object")]
    InvalidPayload(String),
}

/// Result type for commands.
pub type CommandResult<T> = Result<T, CommandError>;

/// Everything a command needs: storage, API client and sync service.
pub struct Context<T: Transport = ReqwestTransport> {
    storage: Storage,
    api: Arc<Api<T>>,
    service: SyncService<ApiDispatcher<T>>,
}

impl Context<ReqwestTransport> {
    /// Opens storage and builds the HTTP stack from `config`.
    pub fn open(config: &Config) -> CommandResult<Self> {
        let storage = Storage::open(&config.storage)?;
        tracing::debug!(engine = storage.engine_name(), "storage opened");
        let http = HttpClient::new(
            &config.api.base_url,
            config.api.timeout(),
            config.retry.clone(),
            iw_core::CredentialCache::new(storage.clone()),
        )?;
        Context::with_http(storage, http, config)
    }
}

impl<T: Transport> Context<T> {
    /// Builds a context over an existing HTTP client.
    pub fn with_http(storage: Storage, http: HttpClient<T>, config: &Config) -> CommandResult<Self> {
        let api = Arc::new(Api::new(http));
        let dispatcher = ApiDispatcher::new(Arc::clone(&api));
        let service = SyncService::new(storage.clone(), dispatcher, &config.sync)?;
        Ok(Context {
            storage,
            api,
            service,
        })
    }

    pub fn service(&self) -> &SyncService<ApiDispatcher<T>> {
        &self.service
    }

    /// Runs `command` and returns the text to print.
    pub async fn run(&self, command: Command) -> CommandResult<String> {
        match command {
            Command::Status => self.status(),
            Command::Enqueue {
                kind,
                resource,
                payload,
            } => self.enqueue(&kind, &resource, &payload).await,
            Command::Drain => self.drain().await,
            Command::Clear => {
                self.service.clear()?;
                Ok("queue cleared".to_string())
            }
            Command::Logout => {
                Session::new(Arc::clone(&self.api)).logout().await?;
                self.service.clear()?;
                Ok("signed out, queue cleared".to_string())
            }
        }
    }

    fn status(&self) -> CommandResult<String> {
        #[derive(Serialize)]
        struct StatusOutput<'a> {
            engine: &'a str,
            #[serde(flatten)]
            status: crate::sync::SyncStatus,
        }

        let output = StatusOutput {
            engine: self.storage.engine_name(),
            status: self.service.status(),
        };
        to_pretty(&output)
    }

    async fn enqueue(&self, kind: &str, resource: &str, payload: &str) -> CommandResult<String> {
        let kind: OpKind = kind.parse()?;
        let resource: ResourceType = resource.parse()?;
        let payload: Value =
            serde_json::from_str(payload).map_err(|e| CommandError::InvalidPayload(e.to_string()))?;
        if !payload.is_object() {
            return Err(CommandError::InvalidPayload(format!(
                "expected an object, got {}",
                payload
            )));
        }

        let op = self.service.enqueue(kind, resource, payload).await?;
        Ok(format!("queued {} {} {}", op.kind, op.resource, op.id))
    }

    async fn drain(&self) -> CommandResult<String> {
        let report = self
            .service
            .handle_connectivity(NetworkState::online())
            .await?
            .unwrap_or_default();
        to_pretty(&report)
    }
}

fn to_pretty<S: Serialize>(value: &S) -> CommandResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| CommandError::Store(e.into()))
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
