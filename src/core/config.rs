//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.interactive-dialog/config.toml`. If missing on first
//! run, a commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::directory::{ChannelRecord, Directory, UserRecord};
use crate::core::selection::TeammateNameDisplay;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DialogConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub channels: Vec<ChannelRecord>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub teammate_name_display: Option<TeammateNameDisplay>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub auth_token: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub name_display: TeammateNameDisplay,
    pub auth_token: Option<String>,
    pub request_timeout: Duration,
    /// Overrides the dialog's own url when set.
    pub url_override: Option<String>,
    pub directory: Directory,
}

/// Values supplied on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub name_display: Option<TeammateNameDisplay>,
    pub url: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.interactive-dialog/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".interactive-dialog").join("config.toml"))
}

/// Load config from `~/.interactive-dialog/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `DialogConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<DialogConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(DialogConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(DialogConfig::default());
    }

    load_config_from(&path)
}

/// Load config from an explicit path.
pub fn load_config_from(path: &Path) -> Result<DialogConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: DialogConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!(
        "Config: {} users, {} channels, name display {:?}",
        config.users.len(),
        config.channels.len(),
        config.general.teammate_name_display
    );
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Interactive Dialog Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# teammate_name_display = "username"   # "username", "nickname_full_name", "full_name"

# [server]
# auth_token = "..."                   # Or set DIALOG_AUTH_TOKEN env var
# request_timeout_secs = 30

# [[users]]
# id = "u1"
# username = "jdoe"
# first_name = "Jane"
# last_name = "Doe"
# nickname = "JJ"

# [[channels]]
# id = "c1"
# name = "town-square"
# display_name = "Town Square"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &DialogConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// `resolve` with an injectable environment lookup.
pub fn resolve_with_env(
    config: &DialogConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Name display: CLI → env → config → default
    let name_display = cli
        .name_display
        .or_else(|| {
            env("DIALOG_TEAMMATE_NAME_DISPLAY").and_then(|s| {
                let parsed = TeammateNameDisplay::parse(&s);
                if parsed.is_none() {
                    warn!("Ignoring unknown DIALOG_TEAMMATE_NAME_DISPLAY '{}'", s);
                }
                parsed
            })
        })
        .or(config.general.teammate_name_display)
        .unwrap_or_default();

    // Auth token: env → config
    let auth_token = env("DIALOG_AUTH_TOKEN").or_else(|| config.server.auth_token.clone());

    // Timeout: env → config → default
    let timeout_secs = env("DIALOG_REQUEST_TIMEOUT_SECS")
        .and_then(|s| s.trim().parse::<u64>().ok())
        .or(config.server.request_timeout_secs)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

    ResolvedConfig {
        name_display,
        auth_token,
        request_timeout: Duration::from_secs(timeout_secs),
        url_override: cli.url.clone(),
        directory: Directory::new(config.users.clone(), config.channels.clone()),
    }
}
