// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Mock transport shared by request, API and sync tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use iw_core::{CredentialCache, Storage};

use super::transport::{
    Body, HttpRequest, HttpResponse, Transport, TransportError, TransportResult,
};
use super::{HttpClient, RetryPolicy};

/// A scripted reply for the next request.
#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16, Value),
    Fail(TransportError),
    /// Never completes; exercises the per-attempt timeout.
    Hang,
}

type Handler = Box<dyn Fn(&HttpRequest) -> Reply + Send + Sync>;

/// Mock transport for testing without a server.
///
/// Replies are taken from the scripted queue first, then from the fallback
/// handler, and default to `200 null`.
#[derive(Clone)]
pub struct MockTransport {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    handler: Arc<Mutex<Option<Handler>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        MockTransport {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            handler: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a reply for the next unanswered request.
    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn push_status(&self, status: u16, body: Value) {
        self.push(Reply::Status(status, body));
    }

    /// Answer requests with `handler` once the scripted queue is empty.
    pub fn respond_with(&self, handler: impl Fn(&HttpRequest) -> Reply + Send + Sync + 'static) {
        *self.handler.lock().unwrap() = Some(Box::new(handler));
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests made to `path`.
    pub fn count(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .count()
    }

    fn next_reply(&self, request: &HttpRequest) -> Reply {
        if let Some(reply) = self.replies.lock().unwrap().pop_front() {
            return reply;
        }
        match self.handler.lock().unwrap().as_ref() {
            Some(handler) => handler(request),
            None => Reply::Status(200, Value::Null),
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        MockTransport::new()
    }
}

impl Transport for MockTransport {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = TransportResult<HttpResponse>> + Send + '_>> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(request.clone());
            let reply = self.next_reply(&request);

            if let (Some(Body::Multipart { .. }), Some(sink)) = (&request.body, &request.progress) {
                sink(100);
            }

            match reply {
                Reply::Status(status, body) => Ok(HttpResponse::new(status, body)),
                Reply::Fail(e) => Err(e),
                Reply::Hang => std::future::pending().await,
            }
        })
    }
}

/// Credential cache over fresh in-memory storage.
pub fn memory_credentials() -> CredentialCache {
    CredentialCache::new(Storage::in_memory())
}

/// Credential cache holding the given token pair.
pub fn signed_in(access: &str, refresh: &str) -> CredentialCache {
    let credentials = memory_credentials();
    credentials.set_token_pair(access, refresh).unwrap();
    credentials
}

/// Client over `transport` with the default retry policy.
pub fn client_with(transport: &MockTransport, credentials: CredentialCache) -> HttpClient<MockTransport> {
    HttpClient::with_transport(transport.clone(), credentials).with_retry(RetryPolicy::default())
}
