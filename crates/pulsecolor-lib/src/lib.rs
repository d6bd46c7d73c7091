//! PulseColor: color resolution and dispatch for the navigation bar pulse visualizer.

pub mod animator;
pub mod color;
pub mod config;
pub mod contrast;
pub mod controller;
pub mod error;
pub mod events;
pub mod mock;
pub mod mode;
pub mod renderer;
pub mod settings;
pub mod theme;

pub use controller::{ColorController, ColorState};
pub use error::PulseColorError;
pub use mode::ColorMode;
