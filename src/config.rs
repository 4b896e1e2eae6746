//! # Configuration
//!
//! Centralizes display/history settings with a clear override hierarchy:
//! defaults → config file → env vars.
//!
//! Config lives at `~/.weft/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! The resolved values feed `LayoutSettings` (consumed by layout passes)
//! and the per-channel history capacity; the core itself never reads the
//! file.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::layout::{
    is_valid_timestamp_format, LayoutSettings, ModerationAction, DEFAULT_TIMESTAMP_FORMAT,
};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WeftConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub moderation: Vec<ModerationEntry>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DisplayConfig {
    pub timestamp_format: Option<String>,
    pub emote_quality: Option<u8>,
    pub scale: Option<f32>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HistoryConfig {
    pub message_limit: Option<usize>,
}

/// One text moderation button. Image-based actions are registered
/// programmatically by the embedder, since a config file cannot carry a
/// decoded bitmap.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModerationEntry {
    pub action: String,
    pub line1: String,
    pub line2: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_MESSAGE_LIMIT: usize = 1000;
pub const DEFAULT_EMOTE_QUALITY: u8 = 1;
pub const DEFAULT_SCALE: f32 = 1.0;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub settings: LayoutSettings,
    pub scale: f32,
    pub message_limit: usize,
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

/// Returns the path to `~/.weft/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".weft").join("config.toml"))
}

/// Load config from `~/.weft/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `WeftConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<WeftConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(WeftConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(WeftConfig::default());
    }

    load_config_from(&path)
}

/// Load and parse a config file at an explicit path.
pub fn load_config_from(path: &Path) -> Result<WeftConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: WeftConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# weft configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars.

# [display]
# timestamp_format = "%H:%M"         # strftime format for message timestamps
# emote_quality = 1                  # preferred emote resolution tier, 1-3
# scale = 1.0                        # global scale multiplier

# [history]
# message_limit = 1000               # messages kept per channel

# [[moderation]]
# action = "ban"
# line1 = "ban"

# [[moderation]]
# action = "timeout 600"
# line1 = "10"
# line2 = "min"
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_TEMPLATE) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env.
///
/// Invalid values never abort resolution; they are logged and replaced
/// by their defaults so a bad config file degrades instead of failing.
pub fn resolve(config: &WeftConfig) -> ResolvedConfig {
    // Timestamp format: env → config → default, validated.
    let timestamp_format = std::env::var("WEFT_TIMESTAMP_FORMAT")
        .ok()
        .or_else(|| config.display.timestamp_format.clone())
        .unwrap_or_else(|| DEFAULT_TIMESTAMP_FORMAT.to_string());
    let timestamp_format = if is_valid_timestamp_format(&timestamp_format) {
        timestamp_format
    } else {
        warn!(
            "Invalid timestamp format {:?}, using {:?}",
            timestamp_format, DEFAULT_TIMESTAMP_FORMAT
        );
        DEFAULT_TIMESTAMP_FORMAT.to_string()
    };

    // Emote quality: env → config → default, clamped to 1..=3.
    let emote_quality = std::env::var("WEFT_EMOTE_QUALITY")
        .ok()
        .and_then(|v| v.parse::<u8>().ok())
        .or(config.display.emote_quality)
        .unwrap_or(DEFAULT_EMOTE_QUALITY);
    let emote_quality = if (1..=3).contains(&emote_quality) {
        emote_quality
    } else {
        warn!(
            "Emote quality {} out of range, using {}",
            emote_quality, DEFAULT_EMOTE_QUALITY
        );
        DEFAULT_EMOTE_QUALITY
    };

    // Scale: config → default, must be positive.
    let scale = config.display.scale.unwrap_or(DEFAULT_SCALE);
    let scale = if scale > 0.0 {
        scale
    } else {
        warn!("Scale {} is not positive, using {}", scale, DEFAULT_SCALE);
        DEFAULT_SCALE
    };

    // Message limit: config → default, must be nonzero.
    let message_limit = config.history.message_limit.unwrap_or(DEFAULT_MESSAGE_LIMIT);
    let message_limit = if message_limit > 0 {
        message_limit
    } else {
        warn!("Message limit 0 is invalid, using {}", DEFAULT_MESSAGE_LIMIT);
        DEFAULT_MESSAGE_LIMIT
    };

    let moderation_actions = config
        .moderation
        .iter()
        .map(|entry| ModerationAction::Label {
            line1: entry.line1.clone(),
            line2: entry.line2.clone().unwrap_or_default(),
            action: entry.action.clone(),
        })
        .collect();

    ResolvedConfig {
        settings: LayoutSettings {
            emote_quality,
            timestamp_format,
            moderation_actions,
        },
        scale,
        message_limit,
    }
}
