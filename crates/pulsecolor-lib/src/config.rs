//! Application configuration: TOML-based, platform-aware paths.
//!
//! [`Config`] is the settings store the CLI drives the controller from. It
//! implements [`SettingsProvider`], so unset or unparseable entries simply
//! yield the controller's defaults.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::parse_color;
use crate::mode::ColorMode;
use crate::settings::{KEY_COLOR_TYPE, KEY_COLOR_USER, KEY_LAVALAMP_SPEED, SettingsProvider};

/// Header comment prepended to saved config files.
const CONFIG_HEADER: &str =
    "# PulseColor configuration: changes made outside the app may be overwritten.\n\n";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Color mode: 0 = accent, 1 = user color, 2 = lava lamp, 3 = auto (media).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_type: Option<i32>,

    /// User-chosen color (hex or name). Unset = theme accent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_user: Option<String>,

    /// Lava lamp cycle period in milliseconds. Unset = 10000.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lavalamp_speed: Option<i32>,

    /// Theme accent color (hex or name). Default: "#009688".
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
}

fn default_accent_color() -> String {
    "#009688".into()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            color_type: None,
            color_user: None,
            lavalamp_speed: None,
            accent_color: default_accent_color(),
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// `color_type` is not one of the known modes.
    UnknownColorType(i32),
    /// A color field could not be parsed (`field` is `"color_user"` or `"accent_color"`).
    InvalidColor { field: &'static str, reason: String },
    /// `lavalamp_speed` is zero or negative.
    InvalidSpeed(i32),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownColorType(v) => {
                write!(f, "Unknown color_type {v} (expected 0-3), using accent")
            }
            ValidationError::InvalidColor { field, reason } => {
                write!(f, "Invalid {field}: {reason}")
            }
            ValidationError::InvalidSpeed(v) => {
                write!(f, "Invalid lavalamp_speed {v} (must be positive), using default")
            }
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pulsecolor"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Load config from an arbitrary path, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Save config to an arbitrary path atomically (write to temp file, then rename).
    pub fn save_to(&self, path: &Path) -> crate::error::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let serialized = toml::to_string_pretty(self)
            .map_err(|e| crate::PulseColorError::Config(e.to_string()))?;
        let contents = format!("{CONFIG_HEADER}{serialized}");
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &contents)?;
        if std::fs::rename(&tmp, path).is_err() {
            // Rename can fail across filesystems; fall back to direct write + cleanup
            let result = std::fs::write(path, &contents);
            let _ = std::fs::remove_file(&tmp);
            result?;
        }
        Ok(())
    }

    /// Parsed theme accent, `None` if `accent_color` is invalid.
    pub fn accent(&self) -> Option<u32> {
        parse_color(&self.accent_color).ok()
    }

    /// Parsed theme accent, falling back to the default accent.
    pub fn accent_or_default(&self) -> u32 {
        self.accent().unwrap_or_else(|| {
            log::warn!(
                "invalid accent_color {:?}, using {}",
                self.accent_color,
                default_accent_color()
            );
            // The default literal always parses.
            parse_color(&default_accent_color()).unwrap_or(0xFF00_9688)
        })
    }

    /// Validate the entire config, collecting all errors.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Some(t) = self.color_type
            && ColorMode::try_from_setting(t).is_none()
        {
            errors.push(ValidationError::UnknownColorType(t));
        }

        if let Some(ref c) = self.color_user
            && let Err(e) = parse_color(c)
        {
            errors.push(ValidationError::InvalidColor {
                field: "color_user",
                reason: e.to_string(),
            });
        }

        if let Err(e) = parse_color(&self.accent_color) {
            errors.push(ValidationError::InvalidColor {
                field: "accent_color",
                reason: e.to_string(),
            });
        }

        if let Some(s) = self.lavalamp_speed
            && s <= 0
        {
            errors.push(ValidationError::InvalidSpeed(s));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl SettingsProvider for Config {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        match key {
            KEY_COLOR_TYPE => self.color_type.unwrap_or(default),
            KEY_COLOR_USER => self
                .color_user
                .as_deref()
                .and_then(|c| parse_color(c).ok())
                .map_or(default, |c| c as i32),
            KEY_LAVALAMP_SPEED => self.lavalamp_speed.unwrap_or(default),
            _ => default,
        }
    }
}
