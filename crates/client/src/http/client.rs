// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Request client with credential injection, retry and token refresh.
//!
//! A logical request passes through three stages:
//! - the cached bearer token, if any, is attached
//! - network failures, 429 and 500 are retried with exponential backoff
//! - a 401 triggers one token refresh and one replay of the request
//!
//! All attempts of a logical request, the replay included, share one attempt
//! budget of `1 + max_retries`.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use iw_core::CredentialCache;

use super::retry::{is_retryable_status, RetryPolicy};
use super::transport::{
    Body, HttpRequest, HttpResponse, Method, ProgressSink, ReqwestTransport, Transport,
    TransportError, TransportResult,
};
use crate::endpoints;
use crate::error::{ApiError, ApiResult};

/// Default deadline for a single attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const UNAUTHORIZED: u16 = 401;

/// Optional parts of a request.
#[derive(Default, Clone)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub progress: Option<ProgressSink>,
}

impl RequestOptions {
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    pub fn progress(mut self, sink: ProgressSink) -> Self {
        self.progress = Some(sink);
        self
    }
}

/// Token pair returned by the refresh endpoint.
#[derive(Debug, Deserialize)]
struct RefreshedTokens {
    #[serde(alias = "access_token", alias = "accessToken")]
    token: String,
    #[serde(default, alias = "refreshToken")]
    refresh_token: Option<String>,
}

/// Attempts made so far by one logical request.
struct Attempts {
    made: u32,
    limit: u32,
}

impl Attempts {
    fn exhausted(&self) -> bool {
        self.made >= self.limit
    }

    /// Guarantees the auth replay at least one attempt.
    fn reserve_replay(&mut self) {
        if self.exhausted() {
            self.made = self.limit.saturating_sub(1);
        }
    }
}

/// HTTP client for the invitationweb API.
pub struct HttpClient<T: Transport = ReqwestTransport> {
    transport: T,
    credentials: CredentialCache,
    retry: RetryPolicy,
    timeout: Duration,
}

impl HttpClient<ReqwestTransport> {
    /// Create a client for `base_url` backed by reqwest.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        retry: RetryPolicy,
        credentials: CredentialCache,
    ) -> ApiResult<Self> {
        let transport = ReqwestTransport::new(base_url, timeout)?;
        Ok(HttpClient::with_transport(transport, credentials)
            .with_retry(retry)
            .with_timeout(timeout))
    }
}

impl<T: Transport> HttpClient<T> {
    /// Create a client over a custom transport (for testing).
    pub fn with_transport(transport: T, credentials: CredentialCache) -> Self {
        HttpClient {
            transport,
            credentials,
            retry: RetryPolicy::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn credentials(&self) -> &CredentialCache {
        &self.credentials
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Send a request and return the response body.
    pub async fn send(&self, method: Method, path: &str, body: Option<Value>) -> ApiResult<Value> {
        self.send_with(method, path, body.map(Body::Json), RequestOptions::default())
            .await
    }

    /// Send a request with query parameters or an upload body.
    pub async fn send_with(
        &self,
        method: Method,
        path: &str,
        body: Option<Body>,
        options: RequestOptions,
    ) -> ApiResult<Value> {
        let mut request = HttpRequest::new(method, path).with_body(body);
        request.query = options.query;
        request.progress = options.progress;
        request.bearer = self.credentials.access_token()?;

        let mut attempts = Attempts {
            made: 0,
            limit: self.retry.max_attempts(),
        };

        let response = self.send_with_retry(&request, &mut attempts).await?;
        if response.status != UNAUTHORIZED {
            return classify(response);
        }

        tracing::debug!(%method, path, "unauthorized, refreshing access token");
        let token = self.refresh_access_token().await?;
        request.bearer = Some(token);
        attempts.reserve_replay();

        let replayed = self.send_with_retry(&request, &mut attempts).await?;
        if replayed.status == UNAUTHORIZED {
            tracing::warn!(%method, path, "request rejected after token refresh");
            return Err(ApiError::AuthExpired);
        }
        classify(replayed)
    }

    /// Runs attempts until one is final or the budget runs out.
    ///
    /// Returns the last response; only a transport failure on the last
    /// attempt becomes an error.
    async fn send_with_retry(
        &self,
        request: &HttpRequest,
        attempts: &mut Attempts,
    ) -> ApiResult<HttpResponse> {
        loop {
            attempts.made += 1;
            let outcome = self.attempt(request.clone()).await;

            let retryable = match &outcome {
                Ok(response) => is_retryable_status(response.status),
                Err(e) => e.is_retryable(),
            };
            if !retryable || attempts.exhausted() {
                return outcome.map_err(ApiError::from);
            }

            let delay = self.retry.delay(attempts.made);
            match &outcome {
                Ok(response) => tracing::warn!(
                    method = %request.method,
                    path = %request.path,
                    status = response.status,
                    attempt = attempts.made,
                    delay_ms = delay.as_millis() as u64,
                    "retrying request"
                ),
                Err(e) => tracing::warn!(
                    method = %request.method,
                    path = %request.path,
                    error = %e,
                    attempt = attempts.made,
                    delay_ms = delay.as_millis() as u64,
                    "retrying request"
                ),
            }
            tokio::time::sleep(delay).await;
        }
    }

    /// One attempt under the per-attempt deadline.
    async fn attempt(&self, request: HttpRequest) -> TransportResult<HttpResponse> {
        match tokio::time::timeout(self.timeout, self.transport.execute(request)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(TransportError::Timeout),
        }
    }

    /// Exchanges the cached refresh token for a new access token.
    ///
    /// The refresh call is made once, without retry. If it fails every cached
    /// credential is cleared.
    async fn refresh_access_token(&self) -> ApiResult<String> {
        let Some(refresh_token) = self.credentials.refresh_token()? else {
            tracing::debug!("no refresh token cached");
            return Err(ApiError::AuthExpired);
        };

        match self.exchange_refresh_token(&refresh_token).await {
            Ok(tokens) => {
                match &tokens.refresh_token {
                    Some(rotated) => self.credentials.set_token_pair(&tokens.token, rotated)?,
                    None => self.credentials.set_access_token(&tokens.token)?,
                }
                tracing::info!("access token refreshed");
                Ok(tokens.token)
            }
            Err(e) => {
                tracing::error!(error = %e, "token refresh failed, clearing credentials");
                self.credentials.clear_all()?;
                Err(ApiError::AuthExpired)
            }
        }
    }

    async fn exchange_refresh_token(&self, refresh_token: &str) -> ApiResult<RefreshedTokens> {
        let request = HttpRequest::new(Method::Post, endpoints::AUTH_REFRESH)
            .with_body(Some(Body::Json(json!({ "refresh_token": refresh_token }))));
        let response = self.attempt(request).await?;
        decode(classify(response)?)
    }
}

/// Maps a final response to the body or a typed error.
fn classify(response: HttpResponse) -> ApiResult<Value> {
    let HttpResponse { status, body } = response;
    match status {
        200..=299 => Ok(body),
        500..=u16::MAX => Err(ApiError::Server { status, body }),
        _ => Err(ApiError::Client { status, body }),
    }
}

/// Decodes a response body into `R`.
pub fn decode<R: serde::de::DeserializeOwned>(body: Value) -> ApiResult<R> {
    serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}
