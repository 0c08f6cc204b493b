//! Client configuration.
//!
//! Values are layered: built-in defaults, then `.brandbrain/settings.json`,
//! then environment variables. The resulting [`ClientConfig`] is passed to
//! the API client at construction; nothing is read from globals afterwards.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChatError, ChatResult};
use crate::types::Brand;

/// Base URL of the local proxy the web client talked to.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "BRANDBRAIN_BASE_URL";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "BRANDBRAIN_API_KEY";

/// Which brand to pick when the list loads and nothing is selected yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DefaultSelection {
    /// Case-sensitive fragment searched for in brand names
    pub name_contains: String,
    /// Exact brand id that also qualifies
    pub id: String,
}

impl Default for DefaultSelection {
    fn default() -> Self {
        Self {
            name_contains: "Westinghouse".to_string(),
            id: "westinghouse_in".to_string(),
        }
    }
}

impl DefaultSelection {
    pub fn matches(&self, brand: &Brand) -> bool {
        brand.id == self.id
            || (!self.name_contains.is_empty() && brand.name.contains(&self.name_contains))
    }
}

/// Configuration for the Brand Brain API client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    /// Base URL; endpoints are `{base_url}/brands` and `{base_url}/ask`
    pub base_url: String,
    /// Value of the `x-api-key` header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Brand appended to every listing when the server omits it.
    /// `null` in the settings file disables the injection.
    pub fallback_brand: Option<Brand>,
    pub default_selection: DefaultSelection,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            fallback_brand: Some(Brand::new("havells", "Havells")),
            default_selection: DefaultSelection::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_fallback_brand(mut self, brand: Option<Brand>) -> Self {
        self.fallback_brand = brand;
        self
    }

    /// Location of the settings file under a working directory.
    pub fn settings_path(root: &Path) -> PathBuf {
        root.join(".brandbrain").join("settings.json")
    }

    /// Parse a settings file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> ChatResult<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            ChatError::Config(format!("invalid settings file {}: {}", path.display(), e))
        })
    }

    /// Load settings from `root` (if the file exists) and apply the
    /// environment on top.
    pub fn load(root: &Path) -> ChatResult<Self> {
        let path = Self::settings_path(root);
        let config = if path.exists() {
            debug!("Loading settings from {}", path.display());
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        Ok(config.apply_env())
    }

    /// Override fields from `BRANDBRAIN_*` environment variables.
    pub fn apply_env(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Override fields using `lookup` as the variable source. Empty values are ignored.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.is_empty()) {
            self.base_url = url;
        }
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    /// Header value for `x-api-key`; empty when no key is configured.
    pub fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or("")
    }

    /// Full URL for an endpoint path such as `"brands"`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
