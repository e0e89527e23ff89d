// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Delivery of queued operations to the backend.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use iw_core::{OpKind, ResourceType, SyncOperation};

use crate::api::{Api, ImageUpload};
use crate::error::ApiError;
use crate::http::{ReqwestTransport, Transport};

/// Error type for a single delivery.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No endpoint handles this kind of operation.
    #[error("no handler for {kind} {resource} operations")]
    Unsupported {
        kind: OpKind,
        resource: ResourceType,
    },

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("cannot read upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for dispatch.
pub type DispatchResult = Result<(), DispatchError>;

/// Sends one operation to the server.
///
/// Implementations perform the whole request, retries included. An error
/// counts as one failed attempt for the operation.
pub trait Dispatcher: Send + Sync {
    fn dispatch<'a>(
        &'a self,
        op: &'a SyncOperation,
    ) -> Pin<Box<dyn Future<Output = DispatchResult> + Send + 'a>>;
}

/// Dispatcher that maps operations onto [`Api`] calls.
///
/// | resource | create | update | delete |
/// |----------|--------|--------|--------|
/// | project  | `POST /api/projects` | `PUT /api/projects` | `DELETE /api/projects/{id}` |
/// | image    | upload of `payload.path` | - | - |
pub struct ApiDispatcher<T: Transport = ReqwestTransport> {
    api: Arc<Api<T>>,
}

impl<T: Transport> ApiDispatcher<T> {
    pub fn new(api: Arc<Api<T>>) -> Self {
        ApiDispatcher { api }
    }

    async fn deliver(&self, op: &SyncOperation) -> DispatchResult {
        let projects = self.api.projects();
        match (op.resource, op.kind) {
            (ResourceType::Project, OpKind::Create) => {
                projects.create(op.payload.clone()).await?;
            }
            (ResourceType::Project, OpKind::Update) => {
                let id = required_id(op)?;
                projects.update(id, op.payload.clone()).await?;
            }
            (ResourceType::Project, OpKind::Delete) => {
                let id = required_id(op)?;
                projects.delete(id).await?;
            }
            (ResourceType::Image, OpKind::Create) => {
                let image = read_image(&op.payload).await?;
                self.api.images().upload(image, None).await?;
            }
            (resource, kind) => return Err(DispatchError::Unsupported { kind, resource }),
        }
        Ok(())
    }
}

impl<T: Transport> Dispatcher for ApiDispatcher<T> {
    fn dispatch<'a>(
        &'a self,
        op: &'a SyncOperation,
    ) -> Pin<Box<dyn Future<Output = DispatchResult> + Send + 'a>> {
        Box::pin(self.deliver(op))
    }
}

fn required_id(op: &SyncOperation) -> Result<&str, DispatchError> {
    op.target_id().ok_or_else(|| {
        DispatchError::InvalidPayload(format!("{} {} requires an 'id'", op.kind, op.resource))
    })
}

async fn read_image(payload: &Value) -> Result<ImageUpload, DispatchError> {
    let path = payload
        .get("path")
        .and_then(Value::as_str)
        .ok_or_else(|| DispatchError::InvalidPayload("image create requires a 'path'".into()))?;
    let path = Path::new(path);

    let data = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    Ok(ImageUpload {
        data,
        content_type: content_type_for(path).to_string(),
        file_name,
        folder: payload
            .get("folder")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// Guesses an image MIME type from the file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}
