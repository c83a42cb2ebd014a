//! Tool configuration module.
//!
//! Handles loading, validating, and merging `watermark.toml`. Stock defaults
//! are overridden by a user file placed in the working image folder (or
//! passed with `--config`).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [text]
//! scale = 4                 # 8x8 bitmap glyphs scaled 4x → 32px text
//! color = [0, 0, 0, 255]    # RGBA, drawn opaquely
//!
//! [image]
//! opacity = 0.5             # Image watermark opacity (0.0-1.0)
//!
//! [prompt]
//! default_input = "MojaFota.jpg"
//! default_watermark = "logo.png"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want:
//!
//! ```toml
//! [text]
//! color = [255, 255, 255, 255]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Opacity, TextStyle, WatermarkSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the image folder.
pub const CONFIG_FILE_NAME: &str = "watermark.toml";

/// Largest accepted glyph scale; 8 * 64 = 512px glyphs.
const MAX_TEXT_SCALE: u32 = 64;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `watermark.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Text watermark rendering.
    pub text: TextConfig,
    /// Image watermark compositing.
    pub image: ImageConfig,
    /// Defaults offered by the interactive prompts.
    pub prompt: PromptConfig,
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.text.scale == 0 || self.text.scale > MAX_TEXT_SCALE {
            return Err(ConfigError::Validation(format!(
                "text.scale must be 1-{MAX_TEXT_SCALE}"
            )));
        }
        if !(0.0..=1.0).contains(&self.image.opacity) {
            return Err(ConfigError::Validation(
                "image.opacity must be 0.0-1.0".into(),
            ));
        }
        if self.prompt.default_input.trim().is_empty() {
            return Err(ConfigError::Validation(
                "prompt.default_input must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// The compositor settings this config describes.
    pub fn watermark_settings(&self) -> WatermarkSettings {
        WatermarkSettings {
            text: TextStyle {
                scale: self.text.scale,
                color: self.text.color,
            },
            opacity: Opacity::new(self.image.opacity),
        }
    }
}

/// Text watermark settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    /// Integer upscale of the 8x8 bitmap font.
    pub scale: u32,
    /// Glyph color as `[r, g, b, a]`.
    pub color: [u8; 4],
}

impl Default for TextConfig {
    fn default() -> Self {
        let style = TextStyle::default();
        Self {
            scale: style.scale,
            color: style.color,
        }
    }
}

/// Image watermark settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageConfig {
    /// Multiplier on the watermark's own alpha.
    pub opacity: f32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            opacity: Opacity::default().value(),
        }
    }
}

/// Prompt defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PromptConfig {
    /// Suggested file to mark.
    pub default_input: String,
    /// Suggested watermark image.
    pub default_watermark: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            default_input: "MojaFota.jpg".to_string(),
            default_watermark: "logo.png".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(Config::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(config_path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `watermark.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<Config, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILE_NAME))
}

/// Load config from an explicit file path. A missing file yields defaults.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `watermark.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Watermark Manager Configuration
# ==============================
# Place this file as `watermark.toml` in your image folder (default: img/).
# All options are optional - remove or comment out any you don't need.
# Values shown below are the defaults.

# ---------------------------------------------------------------------------
# Text watermarks
# ---------------------------------------------------------------------------
[text]
# Glyphs come from an 8x8 bitmap font, scaled up by this integer factor.
# 4 gives 32px tall text. Must be 1-64.
scale = 4

# Glyph color as [red, green, blue, alpha]. Glyph pixels are written as-is,
# without blending.
color = [0, 0, 0, 255]

# ---------------------------------------------------------------------------
# Image watermarks
# ---------------------------------------------------------------------------
[image]
# Multiplier applied to the watermark image's own alpha before it is blended
# over the photo. 0.0 = invisible, 1.0 = full strength.
opacity = 0.5

# ---------------------------------------------------------------------------
# Interactive prompts
# ---------------------------------------------------------------------------
[prompt]
# Offered when asking which file to mark.
default_input = "MojaFota.jpg"

# Offered when asking for the watermark image.
default_watermark = "logo.png"
"##
}
