//! Configuration loading and management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::anyhow;
use chrono_tz::Tz;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the ActivityWatch server.
    pub server_url: String,
    /// IANA name of the zone whose midnight bounds the report.
    pub timezone: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: awr_client::DEFAULT_BASE_URL.to_string(),
            timezone: awr_core::DEFAULT_TIMEZONE.name().to_string(),
            timeout_secs: awr_client::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (AWR_*)
        figment = figment.merge(Env::prefixed("AWR_"));

        figment.extract()
    }

    /// Parses the configured timezone.
    pub fn tz(&self) -> anyhow::Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|err| anyhow!("invalid timezone '{}': {err}", self.timezone))
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Returns the platform-specific config directory for awr.
///
/// On Linux: `~/.config/awr`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("awr"))
}
