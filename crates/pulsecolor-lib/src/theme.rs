//! Theme accent lookup.

use std::cell::Cell;

/// Supplies the accent color of the current theme.
pub trait ThemeResolver {
    fn accent_color(&self) -> u32;
}

/// Theme with a fixed, externally settable accent.
#[derive(Debug)]
pub struct StaticTheme {
    accent: Cell<u32>,
}

impl StaticTheme {
    pub fn new(accent: u32) -> Self {
        Self {
            accent: Cell::new(accent),
        }
    }

    /// Change the accent. Callers deliver the theme-change notification themselves.
    pub fn set_accent(&self, accent: u32) {
        self.accent.set(accent);
    }
}

impl ThemeResolver for StaticTheme {
    fn accent_color(&self) -> u32 {
        self.accent.get()
    }
}

impl<T: ThemeResolver + ?Sized> ThemeResolver for std::rc::Rc<T> {
    fn accent_color(&self) -> u32 {
        (**self).accent_color()
    }
}
