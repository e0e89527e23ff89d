// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Cached credentials: bearer token, refresh token and user snapshot.
//!
//! The access and refresh tokens are written and cleared together. The cached
//! user is for display only and may lag the server.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::Storage;

pub const ACCESS_TOKEN_KEY: &str = "auth.accessToken";
pub const REFRESH_TOKEN_KEY: &str = "auth.refreshToken";
pub const USER_PROFILE_KEY: &str = "auth.userProfile";

/// Snapshot of the signed-in user as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Remaining profile fields, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Owner of the `auth.*` storage keys.
#[derive(Debug, Clone)]
pub struct CredentialCache {
    storage: Storage,
}

impl CredentialCache {
    pub fn new(storage: Storage) -> Self {
        CredentialCache { storage }
    }

    pub fn access_token(&self) -> Result<Option<String>> {
        self.storage.get_string(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Result<Option<String>> {
        self.storage.get_string(REFRESH_TOKEN_KEY)
    }

    pub fn cached_user(&self) -> Result<Option<UserProfile>> {
        self.storage.get_json(USER_PROFILE_KEY)
    }

    /// Stores both tokens as a unit.
    ///
    /// If the second write fails the first is rolled back, so the cache never
    /// holds a refresh token from one login next to an access token from another.
    pub fn set_token_pair(&self, access: &str, refresh: &str) -> Result<()> {
        self.storage.set_string(REFRESH_TOKEN_KEY, refresh)?;
        if let Err(e) = self.storage.set_string(ACCESS_TOKEN_KEY, access) {
            if let Err(rollback) = self.storage.delete(REFRESH_TOKEN_KEY) {
                tracing::warn!(
                    error = %rollback,
                    "could not roll back refresh token after failed token write"
                );
            }
            return Err(e);
        }
        Ok(())
    }

    /// Replaces the access token after a refresh, keeping the refresh token.
    pub fn set_access_token(&self, access: &str) -> Result<()> {
        self.storage.set_string(ACCESS_TOKEN_KEY, access)
    }

    pub fn set_cached_user(&self, user: &UserProfile) -> Result<()> {
        self.storage.set_json(USER_PROFILE_KEY, user)
    }

    /// Removes all cached credentials. Succeeds when nothing was cached.
    pub fn clear_all(&self) -> Result<()> {
        self.storage.delete(ACCESS_TOKEN_KEY)?;
        self.storage.delete(REFRESH_TOKEN_KEY)?;
        self.storage.delete(USER_PROFILE_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;
