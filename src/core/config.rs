//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.wisp/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{Level, LevelFilter, log};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::mode::Mode;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WispConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_url: Option<String>,
    pub default_mode: Option<Mode>,
    pub connect_on_start: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub file: Option<String>,
    pub level: Option<String>,
}

/// Values given on the command line. `None`/`false` = not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub url: Option<String>,
    pub mode: Option<Mode>,
    pub connect: bool,
    pub log_file: Option<String>,
    pub log_level: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_FILE: &str = "wisp.log";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Pre-filled URL box contents (may be empty)
    pub url: String,
    pub mode: Mode,
    pub connect_on_start: bool,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            mode: Mode::default(),
            connect_on_start: false,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
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

/// Returns the path to `~/.wisp/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".wisp").join("config.toml"))
}

/// Result of loading the config file.
///
/// Loading runs before the file logger exists, so anything worth tracing is
/// kept in `notes` and emitted with [`LoadedConfig::log_notes`] afterwards.
#[derive(Debug, Default)]
pub struct LoadedConfig {
    pub config: WispConfig,
    pub notes: Vec<(Level, String)>,
}

impl LoadedConfig {
    fn note(&mut self, level: Level, message: String) {
        self.notes.push((level, message));
    }

    pub fn log_notes(&self) {
        for (level, message) in &self.notes {
            log!(*level, "{}", message);
        }
    }
}

/// Load config from `~/.wisp/config.toml`.
pub fn load_config() -> Result<LoadedConfig, ConfigError> {
    load_config_from(config_path())
}

/// Load config from `path`.
///
/// If the file doesn't exist, generates a commented-out default and
/// loads as `WispConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config_from(path: Option<PathBuf>) -> Result<LoadedConfig, ConfigError> {
    let mut loaded = LoadedConfig::default();
    let Some(path) = path else {
        loaded.note(
            Level::Warn,
            String::from("Could not determine home directory, using default config"),
        );
        return Ok(loaded);
    };

    if !path.exists() {
        loaded.note(
            Level::Info,
            format!("No config file found, generating default at {}", path.display()),
        );
        if let Err(e) = generate_default_config(&path) {
            loaded.note(Level::Warn, format!("Failed to write default config: {e}"));
        }
        return Ok(loaded);
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    loaded.config = parse_config(&contents)?;
    loaded.note(Level::Info, format!("Loaded config from {}", path.display()));
    loaded.note(Level::Debug, format!("Config: {:?}", loaded.config));
    Ok(loaded)
}

pub fn parse_config(contents: &str) -> Result<WispConfig, ConfigError> {
    toml::from_str(contents).map_err(ConfigError::Parse)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) -> std::io::Result<()> {
    let default_content = r#"# Wisp Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_url = "ws://localhost:8080/ws"   # Or set WISP_URL
# default_mode = "passthrough"             # "passthrough", "ai-chat" or "ai-control"
# connect_on_start = false

# [logging]
# file = "wisp.log"                        # Or set WISP_LOG_FILE
# level = "debug"                          # "off", "error", "warn", "info", "debug", "trace"
"#;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, default_content)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &WispConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], with environment lookups routed through `env`.
pub fn resolve_with_env(
    config: &WispConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    // URL: CLI → env → config → empty
    let url = cli
        .url
        .clone()
        .or_else(|| env("WISP_URL"))
        .or_else(|| config.general.default_url.clone())
        .unwrap_or(defaults.url);

    // Mode: CLI → env → config → default. Unknown env values are ignored.
    let mode = cli
        .mode
        .or_else(|| env("WISP_MODE").and_then(|m| parse_mode(&m)))
        .or(config.general.default_mode)
        .unwrap_or(defaults.mode);

    let connect_on_start = cli.connect || config.general.connect_on_start.unwrap_or(false);

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| env("WISP_LOG_FILE"))
        .or_else(|| config.logging.file.clone())
        .map(PathBuf::from)
        .unwrap_or(defaults.log_file);

    // Level: CLI → env → config → default. Each unparseable source falls through.
    let log_level = cli
        .log_level
        .as_deref()
        .and_then(parse_level)
        .or_else(|| env("WISP_LOG_LEVEL").as_deref().and_then(parse_level))
        .or_else(|| config.logging.level.as_deref().and_then(parse_level))
        .unwrap_or(defaults.log_level);

    ResolvedConfig {
        url,
        mode,
        connect_on_start,
        log_file,
        log_level,
    }
}

fn parse_level(value: &str) -> Option<LevelFilter> {
    value.trim().parse().ok()
}

fn parse_mode(value: &str) -> Option<Mode> {
    serde_json::from_value(serde_json::Value::String(value.trim().to_lowercase())).ok()
}
