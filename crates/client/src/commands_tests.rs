// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use serde_json::json;

use super::*;
use crate::endpoints;
use crate::http::test_helpers::{client_with, MockTransport};
use iw_core::CredentialCache;

fn context(storage: &Storage, transport: &MockTransport) -> Context<MockTransport> {
    let http = client_with(transport, CredentialCache::new(storage.clone()));
    Context::with_http(storage.clone(), http, &Config::default()).unwrap()
}

fn enqueue(kind: &str, resource: &str, payload: &str) -> Command {
    Command::Enqueue {
        kind: kind.into(),
        resource: resource.into(),
        payload: payload.into(),
    }
}

#[tokio::test]
async fn test_enqueue_only_persists() {
    let storage = Storage::in_memory();
    let transport = MockTransport::new();
    let ctx = context(&storage, &transport);

    let out = ctx
        .run(enqueue("update", "project", r#"{"id":"p1","title":"X"}"#))
        .await
        .unwrap();

    assert!(out.starts_with("queued update project "));
    assert_eq!(ctx.service().queue_length(), 1);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_enqueue_rejects_bad_input() {
    let storage = Storage::in_memory();
    let transport = MockTransport::new();
    let ctx = context(&storage, &transport);

    assert!(matches!(
        ctx.run(enqueue("upsert", "project", "{}")).await,
        Err(CommandError::Store(iw_core::Error::InvalidOpKind(_)))
    ));
    assert!(matches!(
        ctx.run(enqueue("create", "video", "{}")).await,
        Err(CommandError::Store(iw_core::Error::InvalidResourceType(_)))
    ));
    assert!(matches!(
        ctx.run(enqueue("create", "project", "{not json")).await,
        Err(CommandError::InvalidPayload(_))
    ));
    assert!(matches!(
        ctx.run(enqueue("create", "project", "[1]")).await,
        Err(CommandError::InvalidPayload(_))
    ));
    assert_eq!(ctx.service().queue_length(), 0);
}

#[tokio::test]
async fn test_status_lists_pending() {
    let storage = Storage::in_memory();
    let transport = MockTransport::new();
    let ctx = context(&storage, &transport);
    ctx.run(enqueue("delete", "project", r#"{"id":"p9"}"#))
        .await
        .unwrap();

    let out = ctx.run(Command::Status).await.unwrap();
    let status: Value = serde_json::from_str(&out).unwrap();

    assert_eq!(status["engine"], json!("memory"));
    assert_eq!(status["is_online"], json!(false));
    assert_eq!(status["queue_length"], json!(1));
    assert_eq!(status["pending_operations"][0]["payload"], json!({"id": "p9"}));
}

#[tokio::test]
async fn test_drain_delivers_queue() {
    let storage = Storage::in_memory();
    let transport = MockTransport::new();
    let ctx = context(&storage, &transport);
    ctx.run(enqueue("delete", "project", r#"{"id":"p9"}"#))
        .await
        .unwrap();

    let out = ctx.run(Command::Drain).await.unwrap();
    let report: Value = serde_json::from_str(&out).unwrap();

    assert_eq!(report["delivered"], json!(1));
    assert_eq!(transport.count("/api/projects/p9"), 1);
    assert_eq!(ctx.service().queue_length(), 0);
}

#[tokio::test]
async fn test_clear_and_logout() {
    let storage = Storage::in_memory();
    let credentials = CredentialCache::new(storage.clone());
    credentials.set_token_pair("access-1", "refresh-1").unwrap();
    let transport = MockTransport::new();
    let ctx = context(&storage, &transport);
    ctx.run(enqueue("delete", "project", r#"{"id":"p9"}"#))
        .await
        .unwrap();

    ctx.run(Command::Clear).await.unwrap();
    assert_eq!(ctx.service().queue_length(), 0);

    ctx.run(enqueue("delete", "project", r#"{"id":"p9"}"#))
        .await
        .unwrap();
    ctx.run(Command::Logout).await.unwrap();

    assert_eq!(transport.count(endpoints::AUTH_LOGOUT), 1);
    assert_eq!(ctx.service().queue_length(), 0);
    assert_eq!(credentials.access_token().unwrap(), None);
}
