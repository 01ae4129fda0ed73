//! This crate contains all shared UI for the portal.

use dioxus::prelude::*;

pub mod components;
pub use components::{use_toast, ToastOptions, ToastProvider, Toasts};

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

mod auth;
pub use auth::{
    log_in, use_api, use_auth, use_config, use_error_reporter, Api, AuthProvider, AuthState,
    ErrorReporter, LogoutButton,
};

mod lists;
pub mod markdown;
pub mod platform;

pub mod views;

pub const PORTAL_CSS: Asset = asset!("/assets/portal.css");
