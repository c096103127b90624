use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

pub const DEFAULT_API_HOST: &str = "visual-crossing-weather.p.rapidapi.com";
pub const DEFAULT_PLACE: &str = "Jaffna";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const ENV_API_KEY: &str = "WEATHERFLOW_API_KEY";
pub const ENV_API_HOST: &str = "WEATHERFLOW_API_HOST";
pub const ENV_BASE_URL: &str = "WEATHERFLOW_BASE_URL";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_place = "Colombo, Western Province, Sri Lanka"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// RapidAPI key for the Visual Crossing endpoint.
    pub api_key: Option<String>,

    /// Value sent as the `X-RapidAPI-Host` header.
    pub api_host: String,

    /// Override for the endpoint root; defaults to `https://{api_host}`.
    pub base_url: Option<String>,

    /// Place fetched when nothing else has been selected.
    pub default_place: String,

    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_host: DEFAULT_API_HOST.to_string(),
            base_url: None,
            default_place: DEFAULT_PLACE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherflow", "weatherflow")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply `WEATHERFLOW_*` environment variables on top of the file values.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(host) = non_empty(ENV_API_HOST) {
            self.api_host = host;
        }
        if let Some(url) = non_empty(ENV_BASE_URL) {
            self.base_url = Some(url);
        }
        self
    }

    /// Returns the API key or an actionable error.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `weatherflow configure` or set {ENV_API_KEY}."
            )
        })
    }

    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.api_host),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Set the API key, keeping everything else.
    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }
}
