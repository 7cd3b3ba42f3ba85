//! Construction-time configuration.
//!
//! `ClientOptions` is read once when a client is built and never mutated
//! afterwards. It can be assembled in code, deserialized from JSON (the token
//! key accepts both `accessToken` and `access_token`), or read from the
//! environment.

use serde::{Deserialize, Serialize};

/// Production TerrAvion API host.
pub const DEFAULT_HOST: &str = "https://api2.terravion.com";

pub const ENV_ACCESS_TOKEN: &str = "TERRAVION_ACCESS_TOKEN";
pub const ENV_HOST: &str = "TERRAVION_HOST";
pub const ENV_DEBUG: &str = "TERRAVION_DEBUG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientOptions {
    /// May be empty; requests are then sent without `access_token` unless a
    /// per-call token is given.
    #[serde(alias = "access_token")]
    pub access_token: String,
    /// Base URL. Empty means `DEFAULT_HOST`.
    pub host: String,
    /// Accepted for compatibility. Has no effect on request behavior.
    pub debug: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            host: DEFAULT_HOST.to_string(),
            debug: false,
        }
    }
}

impl ClientOptions {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ..Self::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Read `TERRAVION_ACCESS_TOKEN`, `TERRAVION_HOST` and `TERRAVION_DEBUG`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            access_token: lookup(ENV_ACCESS_TOKEN).unwrap_or(defaults.access_token),
            host: lookup(ENV_HOST)
                .filter(|h| !h.is_empty())
                .unwrap_or(defaults.host),
            debug: lookup(ENV_DEBUG).is_some_and(|v| parse_flag(&v)),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
