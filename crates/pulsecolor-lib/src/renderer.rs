//! Renderer consumer interface.

/// Receives resolved colors.
///
/// Methods take `&self`: the controller only holds a weak reference, so
/// implementations keep their own state behind interior mutability.
pub trait Renderer {
    /// A new color to draw with. Duplicates are expected and must be harmless.
    fn on_update_color(&self, color: u32);

    /// Whether the renderer can currently accept an animated color stream.
    fn is_valid_stream(&self) -> bool;
}
