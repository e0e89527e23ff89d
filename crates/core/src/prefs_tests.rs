// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn unset_preferences_read_as_none() {
    let prefs = Preferences::new(Storage::in_memory());
    assert_eq!(prefs.language().unwrap(), None);
    assert_eq!(prefs.theme().unwrap(), None);
}

#[test]
fn preferences_round_trip() {
    let prefs = Preferences::new(Storage::in_memory());

    prefs.set_language("pt").unwrap();
    prefs.set_theme("light").unwrap();

    assert_eq!(prefs.language().unwrap().as_deref(), Some("pt"));
    assert_eq!(prefs.theme().unwrap().as_deref(), Some("light"));
}

#[test]
fn preferences_share_the_underlying_storage() {
    let storage = Storage::in_memory();
    Preferences::new(storage.clone()).set_theme("dark").unwrap();

    assert_eq!(storage.get_string(THEME_KEY).unwrap().as_deref(), Some("dark"));
}
