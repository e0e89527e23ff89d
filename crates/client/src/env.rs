// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.

use std::path::PathBuf;

/// Environment variable names.
pub mod vars {
    pub const IW_API_BASE_URL: &str = "IW_API_BASE_URL";
    pub const IW_STORAGE_PATH: &str = "IW_STORAGE_PATH";
    pub const IW_CONFIG: &str = "IW_CONFIG";
}

/// Returns the value of `IW_API_BASE_URL` if set and non-empty.
pub fn api_base_url() -> Option<String> {
    std::env::var(vars::IW_API_BASE_URL)
        .ok()
        .filter(|v| !v.is_empty())
}

/// Returns the value of `IW_STORAGE_PATH` if set and non-empty.
pub fn storage_path() -> Option<PathBuf> {
    std::env::var_os(vars::IW_STORAGE_PATH)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Returns the value of `IW_CONFIG` if set and non-empty.
pub fn config_path() -> Option<PathBuf> {
    std::env::var_os(vars::IW_CONFIG)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
