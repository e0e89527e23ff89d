// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sign-in state built on the auth endpoints and the credential cache.

use std::sync::Arc;

use serde::Deserialize;

use iw_core::{CredentialCache, UserProfile};

use crate::api::Api;
use crate::error::ApiError;
use crate::http::{decode, ReqwestTransport, Transport};

/// Error type for session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("credential store error: {0}")]
    Store(#[from] iw_core::Error),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    refresh_token: String,
    user: UserProfile,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    user: UserProfile,
}

/// The signed-in user's session.
pub struct Session<T: Transport = ReqwestTransport> {
    api: Arc<Api<T>>,
}

impl<T: Transport> Session<T> {
    pub fn new(api: Arc<Api<T>>) -> Self {
        Session { api }
    }

    fn credentials(&self) -> &CredentialCache {
        self.api.http().credentials()
    }

    /// Exchanges an OAuth code for tokens and caches the user.
    pub async fn login(&self, code: &str) -> SessionResult<UserProfile> {
        let body = self.api.auth().callback(code).await?;
        let login: LoginResponse = decode(body)?;

        let credentials = self.credentials();
        credentials.set_token_pair(&login.token, &login.refresh_token)?;
        credentials.set_cached_user(&login.user)?;
        tracing::info!(user = %login.user.id, "signed in");
        Ok(login.user)
    }

    /// Checks the cached token with the server.
    ///
    /// Returns `None` when there is no token or the server rejects it; in the
    /// latter case all credentials are cleared.
    pub async fn verify(&self) -> SessionResult<Option<UserProfile>> {
        if self.credentials().access_token()?.is_none() {
            return Ok(None);
        }

        match self.fetch_user().await {
            Ok(user) => {
                self.credentials().set_cached_user(&user)?;
                Ok(Some(user))
            }
            Err(e) => {
                tracing::warn!(error = %e, "session verification failed, signing out");
                self.credentials().clear_all()?;
                Ok(None)
            }
        }
    }

    /// Re-fetches the user. Failures are logged and leave the cache as is.
    pub async fn refresh_user(&self) -> Option<UserProfile> {
        match self.credentials().access_token() {
            Ok(Some(_)) => {}
            _ => return None,
        }

        let refreshed = match self.fetch_user().await {
            Ok(user) => self.credentials().set_cached_user(&user).map(|()| user),
            Err(e) => {
                tracing::warn!(error = %e, "could not refresh user");
                return None;
            }
        };
        match refreshed {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "could not cache user");
                None
            }
        }
    }

    /// Signs out on the server and clears local credentials regardless.
    pub async fn logout(&self) -> SessionResult<()> {
        if let Err(e) = self.api.auth().logout().await {
            tracing::warn!(error = %e, "logout request failed");
        }
        self.credentials().clear_all()?;
        tracing::info!("signed out");
        Ok(())
    }

    /// The cached user, if a token and a user are both cached.
    pub fn restore(&self) -> SessionResult<Option<UserProfile>> {
        let credentials = self.credentials();
        if credentials.access_token()?.is_none() {
            return Ok(None);
        }
        Ok(credentials.cached_user()?)
    }

    /// Replaces the cached user after a local profile edit.
    pub fn set_user(&self, user: &UserProfile) -> SessionResult<()> {
        Ok(self.credentials().set_cached_user(user)?)
    }

    async fn fetch_user(&self) -> Result<UserProfile, ApiError> {
        let body = self.api.auth().verify().await?;
        let verified: VerifyResponse = decode(body)?;
        Ok(verified.user)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
