//! Configuration loader
//!
//! Loads application configuration from a file and overlays environment
//! variables on top.
//!
//! ## Loading Strategy
//! 1. Use the explicit path when one is given
//! 2. Otherwise probe the standard locations; no file means defaults
//! 3. Apply environment overrides
//! 4. Validate endpoints and the default retry policy
//!
//! ## Environment Variables
//! - `CLOUDCMD_MANAGEMENT_ENDPOINT`: management API base URL
//! - `CLOUDCMD_AUTHORITY_HOST`: token authority base URL
//! - `CLOUDCMD_LOG_LEVEL`: default log filter when `RUST_LOG` is unset
//! - `CLOUDCMD_LOG_FORMAT`: `text` or `json`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./cloudcmd.toml`, `./cloudcmd.json`, `./config.toml`, `./config.json`
//!    (current working directory)
//! 2. The same names next to the executable

use std::path::{Path, PathBuf};

use cloudcmd_domain::constants::{
    ENV_AUTHORITY_HOST, ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_MANAGEMENT_ENDPOINT,
};
use cloudcmd_domain::{CloudCmdError, Config, LogFormat, Result};
use url::Url;

const CONFIG_FILE_NAMES: [&str; 4] = ["cloudcmd.toml", "cloudcmd.json", "config.toml", "config.json"];

/// Load configuration from the standard locations and the process
/// environment
///
/// # Errors
/// Returns `CloudCmdError::Config` if a config file is malformed, an
/// override is invalid, or validation fails.
pub fn load() -> Result<Config> {
    load_with(None, &|name| std::env::var(name).ok())
}

/// Load with an explicit file and environment lookup
pub fn load_with(path: Option<PathBuf>, lookup: &dyn Fn(&str) -> Option<String>) -> Result<Config> {
    let config = match path.or_else(probe_config_paths) {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found; using defaults");
            Config::default()
        }
    };

    let config = apply_env_overrides(config, lookup)?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `CloudCmdError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CloudCmdError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CloudCmdError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CloudCmdError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CloudCmdError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CloudCmdError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(CloudCmdError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file in the working directory, then next to the
/// executable
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut directories = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        directories.push(cwd);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            directories.push(exe_dir.to_path_buf());
        }
    }

    directories
        .iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Overlay `CLOUDCMD_*` variables; blank values are ignored
pub fn apply_env_overrides(
    mut config: Config,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<Config> {
    let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(endpoint) = read(ENV_MANAGEMENT_ENDPOINT) {
        config.management.endpoint = endpoint;
    }
    if let Some(authority) = read(ENV_AUTHORITY_HOST) {
        config.auth.authority_host = authority;
    }
    if let Some(level) = read(ENV_LOG_LEVEL) {
        config.logging.level = level;
    }
    if let Some(format) = read(ENV_LOG_FORMAT) {
        config.logging.format = format
            .parse::<LogFormat>()
            .map_err(|e| CloudCmdError::Config(format!("{ENV_LOG_FORMAT}: {e}")))?;
    }

    Ok(config)
}

/// Endpoints must be absolute URLs and the default retry policy must hold
pub fn validate(config: &Config) -> Result<()> {
    for (name, value) in [
        ("management.endpoint", &config.management.endpoint),
        ("auth.authority_host", &config.auth.authority_host),
    ] {
        Url::parse(value)
            .map_err(|e| CloudCmdError::Config(format!("{name} '{value}' is not a valid URL: {e}")))?;
    }

    if let Some(retry) = &config.retry {
        retry.validate().map_err(|e| CloudCmdError::Config(format!("retry: {e}")))?;
    }

    Ok(())
}
