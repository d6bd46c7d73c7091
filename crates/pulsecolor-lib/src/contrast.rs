//! Contrast adjustment: keeps media-derived colors readable on any navbar.
//!
//! Luminance and ratio follow WCAG 2.0. Adjustment walks the HSL lightness of
//! the foreground toward white or black (whichever contrasts more with the
//! background) until the requested ratio is met.

use crate::color::{self, BLACK, WHITE};

/// Minimum contrast ratio for media-derived colors.
pub const MEDIA_MIN_CONTRAST: f64 = 2.0;

/// Binary search steps over HSL lightness.
const SEARCH_STEPS: u32 = 15;

/// Adjusts a foreground color until it contrasts enough with a background.
pub trait ContrastAdjuster {
    /// Return `color`, or a lighter/darker variant of it, whose contrast
    /// ratio against `background` is at least `min_ratio`.
    fn adjust_for_contrast(&self, color: u32, background: u32, min_ratio: f64) -> u32;
}

/// Default [`ContrastAdjuster`] using WCAG relative luminance.
#[derive(Debug, Clone, Copy, Default)]
pub struct WcagContrast;

impl ContrastAdjuster for WcagContrast {
    fn adjust_for_contrast(&self, color: u32, background: u32, min_ratio: f64) -> u32 {
        find_contrast_color(color, background, min_ratio)
    }
}

/// Derive a media color that reads against both a black and a white navbar.
///
/// The white pass operates on the output of the black pass.
pub fn media_color(adjuster: &impl ContrastAdjuster, color: u32) -> u32 {
    let against_dark = adjuster.adjust_for_contrast(color, BLACK, MEDIA_MIN_CONTRAST);
    adjuster.adjust_for_contrast(against_dark, WHITE, MEDIA_MIN_CONTRAST)
}

/// WCAG relative luminance of a color (alpha ignored).
pub fn relative_luminance(color: u32) -> f64 {
    fn linear(channel: u8) -> f64 {
        let c = f64::from(channel) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    let (r, g, b) = color::rgb(color);
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// WCAG contrast ratio between two colors, in `1.0..=21.0`.
pub fn contrast_ratio(a: u32, b: u32) -> f64 {
    let l1 = relative_luminance(a);
    let l2 = relative_luminance(b);
    let (hi, lo) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    (hi + 0.05) / (lo + 0.05)
}

/// Find the color closest to `color` in lightness that meets `min_ratio`
/// against `background`. Alpha is preserved.
pub fn find_contrast_color(color: u32, background: u32, min_ratio: f64) -> u32 {
    if contrast_ratio(color, background) >= min_ratio {
        return color;
    }
    let a = color::alpha(color);
    let (h, s, l) = to_hsl(color);
    let lighten = contrast_ratio(WHITE, background) >= contrast_ratio(BLACK, background);

    // `best` always holds a candidate already known to satisfy the ratio
    // (or the extreme itself when nothing does).
    let (mut low, mut high, mut best) = if lighten {
        (l, 1.0, color::argb(a, 0xFF, 0xFF, 0xFF))
    } else {
        (0.0, l, color::argb(a, 0, 0, 0))
    };
    for _ in 0..SEARCH_STEPS {
        let mid = (low + high) / 2.0;
        let candidate = with_alpha(from_hsl(h, s, mid), a);
        let ok = contrast_ratio(candidate, background) >= min_ratio;
        if ok {
            best = candidate;
        }
        // Satisfied: move back toward the original lightness. Otherwise push on.
        if ok == lighten {
            high = mid;
        } else {
            low = mid;
        }
    }
    best
}

fn with_alpha(color: u32, a: u8) -> u32 {
    (color & 0x00FF_FFFF) | (u32::from(a) << 24)
}

/// Color → (hue degrees, saturation, lightness).
fn to_hsl(color: u32) -> (f64, f64, f64) {
    let (r, g, b) = color::rgb(color);
    let (r, g, b) = (
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
    );
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if max == min {
        return (0.0, 0.0, l);
    }
    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        ((g - b) / d).rem_euclid(6.0)
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h * 60.0, s, l)
}

/// (hue degrees, saturation, lightness) → opaque color.
fn from_hsl(h: f64, s: f64, l: f64) -> u32 {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_u8 = |f: f64| ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    color::argb(0xFF, to_u8(r), to_u8(g), to_u8(b))
}
