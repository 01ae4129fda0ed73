//! # Portal configuration in `portal.toml`
//!
//! The browser client reads one TOML document at start-up (embedded into the
//! binary by the `web` package, filename [`PortalConfig::filename`]). It tells
//! the client where the backend lives and how the interactive widgets behave.
//!
//! ## Structure
//!
//! ```toml
//! [api]
//! base_url = "https://api.example.com/api/v1"
//! timeout_secs = 30
//!
//! [search]
//! debounce_ms = 500     # settling delay before a search request fires
//! min_query_len = 2
//!
//! [pagination]
//! per_page = 10
//! ```
//!
//! Every section derives `Default`, so a missing or empty file is equivalent
//! to the default configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration stored in `portal.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// Backend connection settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is joined onto. No trailing slash needed.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout. Ignored in the browser, where fetch has no timeout knob.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Search-as-you-type settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u32,
    /// Queries shorter than this (after trimming) never hit the network.
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_base_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_debounce_ms() -> u32 {
    500
}

fn default_min_query_len() -> usize {
    2
}

fn default_per_page() -> u32 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
        }
    }
}

impl PortalConfig {
    /// Create a config pointing at the given backend.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
                ..ApiConfig::default()
            },
            ..Self::default()
        }
    }

    /// Builder method to set the search debounce delay.
    pub fn with_debounce_ms(mut self, ms: u32) -> Self {
        self.search.debounce_ms = ms;
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "portal.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
