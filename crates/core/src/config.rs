//! Session configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where the session talks to and where it persists the signed-in user.
///
/// The defaults are the production values; overriding them is meant for tests
/// and for pointing a development build at a local user service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Base URL of the user service, without a trailing slash
    pub base_url: String,
    /// Local storage key holding the serialized user
    pub storage_key: String,
    /// Request timeout in seconds (native targets only)
    pub timeout_secs: Option<u64>,
}

impl SessionConfig {
    /// Production user service
    pub const DEFAULT_BASE_URL: &'static str = "http://artgallery-htya.onrender.com";

    /// Login endpoint, relative to the base URL
    pub const LOGIN_PATH: &'static str = "/user/login";

    /// Registration endpoint, relative to the base URL
    pub const REGISTER_PATH: &'static str = "/user/register";

    /// Local storage key for the persisted user record
    pub const USER_STORAGE_KEY: &'static str = "user";

    /// Point the session at another user service
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Persist the user under another key
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the request timeout
    pub const fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn login_url(&self) -> String {
        format!("{}{}", self.base_url, Self::LOGIN_PATH)
    }

    pub fn register_url(&self) -> String {
        format!("{}{}", self.base_url, Self::REGISTER_PATH)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            storage_key: Self::USER_STORAGE_KEY.to_string(),
            timeout_secs: None,
        }
    }
}
