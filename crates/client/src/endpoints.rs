// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! API paths relative to the configured base URL.

pub const DEFAULT_BASE_URL: &str = "https://invitationweb.app";

pub const AUTH_CALLBACK: &str = "/api/auth/callback";
pub const AUTH_VERIFY: &str = "/api/auth/verify";
pub const AUTH_LOGOUT: &str = "/api/auth/logout";
pub const AUTH_REFRESH: &str = "/api/auth/refresh";

pub const PROJECTS: &str = "/api/projects";

pub const PAYMENT_CREATE_ORDER: &str = "/api/payment/create-order";
pub const PAYMENT_COMPLETE_ORDER: &str = "/api/payment/complete-order";
pub const PAYMENT_VERIFY_APPLE: &str = "/api/payment/verify-apple";
pub const PAYMENT_VERIFY_GOOGLE: &str = "/api/payment/verify-google";

pub const IMAGES_UPLOAD: &str = "/api/images/upload";
pub const IMAGES_LIST: &str = "/api/images";

pub const USER_PROFILE: &str = "/api/user/profile";
pub const USER_PREFERENCES: &str = "/api/user/preferences";
pub const USER_PUSH_TOKEN: &str = "/api/user/push-token";

pub fn project(id: &str) -> String {
    format!("{}/{}", PROJECTS, id)
}

pub fn project_publish(id: &str) -> String {
    format!("{}/{}/publish", PROJECTS, id)
}
