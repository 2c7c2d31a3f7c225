//! CLI configuration.
//!
//! Stored as TOML:
//! - Linux: `~/.config/aerofs/cli.toml`
//! - Windows: `%APPDATA%/aerofs/cli.toml`
//!
//! `AEROFS_HOST` and `AEROFS_TOKEN` override the file; command-line flags
//! override both.

use std::path::{Path, PathBuf};
use std::time::Duration;

use aerofs_api::{ClientConfig, DEFAULT_CHUNK_SIZE};
use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Appliance hostname, e.g. `share.example.com`.
    #[serde(default)]
    pub host: String,

    /// OAuth bearer token.
    #[serde(default)]
    pub token: String,

    /// Upload chunk size in bytes.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Per-request deadline in seconds (0 = none).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Path to the `appconfig.json` issued for this app.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_config: Option<PathBuf>,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: String::new(),
            token: String::new(),
            chunk_size: default_chunk_size(),
            timeout_secs: default_timeout_secs(),
            app_config: None,
        }
    }
}

impl Config {
    /// Loads `path`, or the default location when `None`. A missing file
    /// yields defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => config_path(),
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Writes the configuration to `path`, or the default location.
    pub fn save(&self, path: Option<&Path>) -> anyhow::Result<PathBuf> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => config_path(),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        // Holds a bearer token.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(path)
    }

    /// Applies `AEROFS_HOST` / `AEROFS_TOKEN` as looked up by `var`.
    pub fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(host) = var("AEROFS_HOST").filter(|v| !v.is_empty()) {
            self.host = host;
        }
        if let Some(token) = var("AEROFS_TOKEN").filter(|v| !v.is_empty()) {
            self.token = token;
        }
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn client_config(&self) -> anyhow::Result<ClientConfig> {
        anyhow::ensure!(!self.host.is_empty(), "no appliance host configured (set host or AEROFS_HOST)");
        anyhow::ensure!(!self.token.is_empty(), "no access token configured (set token or AEROFS_TOKEN)");

        let mut config = ClientConfig::new(&self.host, &self.token)?;
        if let Some(timeout) = self.timeout() {
            config = config.timeout(timeout);
        }
        Ok(config)
    }
}

/// Returns the platform-specific configuration file path.
pub fn config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("aerofs").join("cli.toml")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home).join(".config").join("aerofs").join("cli.toml")
    }
}
