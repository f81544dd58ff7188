//! Configuration for the markview server.
//!
//! Layered in this order, later layers winning:
//! - Default values
//! - TOML configuration file (`.markview/settings.toml`, found by walking
//!   up from the current directory, or an explicit `--config` path)
//! - Environment variable overrides
//! - CLI argument overrides (applied by the `serve` command)
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `MARKVIEW_` and use double
//! underscores to separate nested levels:
//! - `MARKVIEW_SERVER__BIND=127.0.0.1:9000` sets `server.bind`
//! - `MARKVIEW_SEARCH__PROGRAM=rg` sets `search.program`
//! - `MARKVIEW_WATCH__ENABLED=false` sets `watch.enabled`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Directory holding the settings file.
pub const CONFIG_DIR: &str = ".markview";

/// Settings file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "settings.toml";

const ENV_PREFIX: &str = "MARKVIEW_";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Directory to serve (defaults to the current directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Content server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Live-reload endpoint settings
    #[serde(default)]
    pub reload: ReloadConfig,

    /// File watching settings
    #[serde(default)]
    pub watch: WatchConfig,

    /// External search tool settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Log levels
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Address of the content server
    #[serde(default = "default_server_bind")]
    pub bind: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReloadConfig {
    /// Serve the live-reload endpoint
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Address of the live-reload endpoint
    #[serde(default = "default_reload_bind")]
    pub bind: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WatchConfig {
    /// Watch the served tree and push reloads
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SearchConfig {
    /// Search binary, looked up on PATH
    #[serde(default = "default_search_program")]
    pub program: String,

    /// Arguments inserted before the case flag and the query
    #[serde(default)]
    pub extra_args: Vec<String>,

    /// Wall-clock limit for one search
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,

    /// Maximum number of output lines read from the tool
    #[serde(default = "default_search_max_lines")]
    pub max_lines: usize,

    /// Longest output line kept; the rest of the line is discarded
    #[serde(default = "default_search_max_line_bytes")]
    pub max_line_bytes: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default level for every module
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-module overrides, e.g. `watcher = "debug"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

// Default value functions
fn default_true() -> bool {
    true
}
fn default_server_bind() -> String {
    "127.0.0.1:8000".to_string()
}
fn default_reload_bind() -> String {
    "127.0.0.1:35729".to_string()
}
fn default_search_program() -> String {
    "ag".to_string()
}
fn default_search_timeout() -> u64 {
    30
}
fn default_search_max_lines() -> usize {
    10_000
}
fn default_search_max_line_bytes() -> usize {
    64 * 1024
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: None,
            server: ServerConfig::default(),
            reload: ReloadConfig::default(),
            watch: WatchConfig::default(),
            search: SearchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_server_bind(),
        }
    }
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind: default_reload_bind(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            program: default_search_program(),
            extra_args: Vec::new(),
            timeout_secs: default_search_timeout(),
            max_lines: default_search_max_lines(),
            max_line_bytes: default_search_max_line_bytes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl ReloadConfig {
    /// Port part of the reload bind address, used by pages to find the endpoint.
    pub fn port(&self) -> Option<u16> {
        self.bind.rsplit_once(':')?.1.parse().ok()
    }
}

impl Settings {
    /// Load configuration from all sources, discovering the settings file.
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));
        Self::load_from(config_path)
    }

    /// Load configuration from a specific file plus environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            // Double underscore separates nested levels; single underscores stay
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
            .map_err(Box::new)
    }

    /// Find `.markview/settings.toml` from the current directory up to the filesystem root.
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .map(|ancestor| ancestor.join(CONFIG_DIR))
            .find(|dir| dir.is_dir())
            .map(|dir| dir.join(CONFIG_FILE))
    }

    /// Directory to serve: the configured root or the current directory.
    pub fn resolved_root(&self) -> std::io::Result<PathBuf> {
        let root = match &self.root {
            Some(root) => root.clone(),
            None => std::env::current_dir()?,
        };
        root.canonicalize()
    }

    /// Save current configuration to file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file in `dir/.markview/`.
    pub fn init_config_file(dir: &Path, force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = dir.join(CONFIG_DIR).join(CONFIG_FILE);

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        Settings::default().save(&config_path)?;
        Ok(config_path)
    }
}
