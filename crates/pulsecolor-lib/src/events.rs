//! Input events and the listener capabilities the controller implements.
//!
//! Callers may either invoke the listener methods directly from their
//! notification sources, or queue [`ColorEvent`]s over a channel and feed
//! them to [`ColorController::handle_event`](crate::ColorController::handle_event)
//! from the processing thread.

/// Something that changed and may affect the emitted color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorEvent {
    /// One of the tracked settings changed; all of them are re-read.
    SettingsChanged,
    /// The theme changed; the accent color is looked up again.
    ThemeChanged,
    /// The color animator produced a frame.
    AnimationTick(u32),
    /// Now-playing media published a color.
    MediaColor { colorized: bool, color: u32 },
}

/// Receives frames from a color animator.
pub trait AnimationListener {
    fn on_color_changed(&mut self, color: u32);
}

/// Receives theme-change notifications.
pub trait ThemeChangeListener {
    fn on_theme_changed(&mut self);
}

/// Receives settings-change notifications.
pub trait SettingsObserver {
    fn on_settings_changed(&mut self);
}
