//! Persisted settings access: keys, defaults, and the provider abstraction.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use crate::mode::ColorMode;

/// Setting key for the color mode (see [`ColorMode::to_setting`]).
pub const KEY_COLOR_TYPE: &str = "pulse_color_type";
/// Setting key for the user-chosen color.
pub const KEY_COLOR_USER: &str = "pulse_color_user";
/// Setting key for the lava lamp cycle period, in milliseconds.
pub const KEY_LAVALAMP_SPEED: &str = "pulse_lavalamp_speed";

/// Default lava lamp cycle period, in milliseconds.
pub const LAVA_LAMP_SPEED_DEFAULT: i32 = 10_000;

/// Read-only access to integer-valued settings.
pub trait SettingsProvider {
    /// Value stored under `key`, or `default` when absent.
    fn get_int(&self, key: &str, default: i32) -> i32;
}

/// The three settings the controller tracks, resolved against defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseSettings {
    pub mode: ColorMode,
    pub user_color: u32,
    pub animation_period: Duration,
}

impl PulseSettings {
    /// Read all three settings. `accent_color` is the fallback user color.
    pub fn read(provider: &impl SettingsProvider, accent_color: u32) -> Self {
        let mode = ColorMode::from_setting(provider.get_int(KEY_COLOR_TYPE, ColorMode::ACCENT));
        let user_color = provider.get_int(KEY_COLOR_USER, accent_color as i32) as u32;
        let speed = provider.get_int(KEY_LAVALAMP_SPEED, LAVA_LAMP_SPEED_DEFAULT);
        let speed = if speed > 0 {
            speed
        } else {
            log::warn!("ignoring non-positive {KEY_LAVALAMP_SPEED} ({speed})");
            LAVA_LAMP_SPEED_DEFAULT
        };
        Self {
            mode,
            user_color,
            animation_period: Duration::from_millis(speed as u64),
        }
    }
}

/// In-memory settings store.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RefCell<HashMap<String, i32>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_int(&self, key: &str, value: i32) {
        self.values.borrow_mut().insert(key.to_string(), value);
    }

    /// Store a color setting (colors are persisted as their signed bit pattern).
    pub fn put_color(&self, key: &str, color: u32) {
        self.put_int(key, color as i32);
    }

    pub fn remove(&self, key: &str) {
        self.values.borrow_mut().remove(key);
    }
}

impl SettingsProvider for MemorySettings {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.values.borrow().get(key).copied().unwrap_or(default)
    }
}

impl<T: SettingsProvider + ?Sized> SettingsProvider for &T {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        (**self).get_int(key, default)
    }
}

impl<T: SettingsProvider + ?Sized> SettingsProvider for std::rc::Rc<T> {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        (**self).get_int(key, default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_yields_defaults() {
        let s = MemorySettings::new();
        let read = PulseSettings::read(&s, 0xFF12_3456);
        assert_eq!(read.mode, ColorMode::Accent);
        assert_eq!(read.user_color, 0xFF12_3456);
        assert_eq!(read.animation_period, Duration::from_millis(10_000));
    }

    #[test]
    fn stored_values_are_used() {
        let s = MemorySettings::new();
        s.put_int(KEY_COLOR_TYPE, ColorMode::LAVA_LAMP);
        s.put_color(KEY_COLOR_USER, 0xFFFF_0000);
        s.put_int(KEY_LAVALAMP_SPEED, 2500);
        let read = PulseSettings::read(&s, 0);
        assert_eq!(read.mode, ColorMode::LavaLamp);
        assert_eq!(read.user_color, 0xFFFF_0000);
        assert_eq!(read.animation_period, Duration::from_millis(2500));
    }

    #[test]
    fn out_of_range_values_fall_back() {
        let s = MemorySettings::new();
        s.put_int(KEY_COLOR_TYPE, 9);
        s.put_int(KEY_LAVALAMP_SPEED, 0);
        let read = PulseSettings::read(&s, 0);
        assert_eq!(read.mode, ColorMode::Accent);
        assert_eq!(read.animation_period, Duration::from_millis(10_000));
    }

    #[test]
    fn remove_restores_default() {
        let s = MemorySettings::new();
        s.put_int(KEY_COLOR_TYPE, 1);
        s.remove(KEY_COLOR_TYPE);
        assert_eq!(s.get_int(KEY_COLOR_TYPE, 7), 7);
    }
}
