// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::TempDir;

#[test]
fn set_get_and_overwrite() {
    let backend = SqliteBackend::open_in_memory().unwrap();

    backend.set("k", StoredValue::String("one".into())).unwrap();
    backend.set("k", StoredValue::Number(2.0)).unwrap();

    assert_eq!(backend.get("k").unwrap(), Some(StoredValue::Number(2.0)));
    assert_eq!(backend.keys().unwrap(), vec!["k".to_string()]);
}

#[test]
fn contains_and_delete() {
    let backend = SqliteBackend::open_in_memory().unwrap();
    backend.set("k", StoredValue::Bool(false)).unwrap();

    assert!(backend.contains("k").unwrap());
    backend.delete("k").unwrap();
    assert!(!backend.contains("k").unwrap());
    assert_eq!(backend.get("k").unwrap(), None);
}

#[test]
fn clear_removes_everything() {
    let backend = SqliteBackend::open_in_memory().unwrap();
    backend.set("a", StoredValue::Bool(true)).unwrap();
    backend.set("b", StoredValue::Bool(true)).unwrap();

    backend.clear().unwrap();
    assert!(backend.keys().unwrap().is_empty());
}

#[test]
fn values_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.db");

    {
        let backend = SqliteBackend::open(&path).unwrap();
        backend
            .set("auth.accessToken", StoredValue::String("tok".into()))
            .unwrap();
    }

    let backend = SqliteBackend::open(&path).unwrap();
    assert_eq!(
        backend.get("auth.accessToken").unwrap(),
        Some(StoredValue::String("tok".into()))
    );
}

#[test]
fn corrupted_kind_is_reported() {
    let backend = SqliteBackend::open_in_memory().unwrap();
    backend
        .conn()
        .unwrap()
        .execute(
            "INSERT INTO kv (key, kind, value) VALUES ('k', 'blob', 'x')",
            [],
        )
        .unwrap();

    assert!(matches!(backend.get("k"), Err(Error::CorruptedData(_))));
}
