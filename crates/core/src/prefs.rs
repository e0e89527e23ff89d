// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! UI preference keys stored next to the core state.

use crate::error::Result;
use crate::store::Storage;

pub const LANGUAGE_KEY: &str = "prefs.language";
pub const THEME_KEY: &str = "prefs.theme";

#[derive(Debug, Clone)]
pub struct Preferences {
    storage: Storage,
}

impl Preferences {
    pub fn new(storage: Storage) -> Self {
        Preferences { storage }
    }

    pub fn language(&self) -> Result<Option<String>> {
        self.storage.get_string(LANGUAGE_KEY)
    }

    pub fn set_language(&self, language: &str) -> Result<()> {
        self.storage.set_string(LANGUAGE_KEY, language)
    }

    pub fn theme(&self) -> Result<Option<String>> {
        self.storage.get_string(THEME_KEY)
    }

    pub fn set_theme(&self, theme: &str) -> Result<()> {
        self.storage.set_string(THEME_KEY, theme)
    }
}

#[cfg(test)]
#[path = "prefs_tests.rs"]
mod tests;
