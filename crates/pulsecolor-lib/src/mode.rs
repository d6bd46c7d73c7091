//! Color mode: which of the four candidate colors drives the renderer.

use std::fmt;

/// Active color source for the pulse renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Theme accent color.
    #[default]
    Accent,
    /// Color picked by the user in settings.
    UserChosen,
    /// Hue-cycling "lava lamp" animation.
    LavaLamp,
    /// Color derived from now-playing media art.
    AutoFromMedia,
}

impl ColorMode {
    /// Persisted value for [`ColorMode::Accent`].
    pub const ACCENT: i32 = 0;
    /// Persisted value for [`ColorMode::UserChosen`].
    pub const USER: i32 = 1;
    /// Persisted value for [`ColorMode::LavaLamp`].
    pub const LAVA_LAMP: i32 = 2;
    /// Persisted value for [`ColorMode::AutoFromMedia`].
    pub const AUTO: i32 = 3;

    /// Decode a persisted setting. Unknown values fall back to `Accent`.
    pub fn from_setting(value: i32) -> Self {
        Self::try_from_setting(value).unwrap_or_default()
    }

    /// Decode a persisted setting, `None` for unknown values.
    pub fn try_from_setting(value: i32) -> Option<Self> {
        match value {
            Self::ACCENT => Some(ColorMode::Accent),
            Self::USER => Some(ColorMode::UserChosen),
            Self::LAVA_LAMP => Some(ColorMode::LavaLamp),
            Self::AUTO => Some(ColorMode::AutoFromMedia),
            _ => None,
        }
    }

    /// Value stored in settings for this mode.
    pub fn to_setting(self) -> i32 {
        match self {
            ColorMode::Accent => Self::ACCENT,
            ColorMode::UserChosen => Self::USER,
            ColorMode::LavaLamp => Self::LAVA_LAMP,
            ColorMode::AutoFromMedia => Self::AUTO,
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::Accent => write!(f, "accent"),
            ColorMode::UserChosen => write!(f, "user"),
            ColorMode::LavaLamp => write!(f, "lava lamp"),
            ColorMode::AutoFromMedia => write!(f, "auto (media)"),
        }
    }
}
