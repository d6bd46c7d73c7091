//! Color parsing, formatting and channel helpers.
//!
//! Colors are packed `0xAARRGGBB` values. The controller never looks inside
//! them; only parsing, contrast adjustment and the hue animator do.

/// Opaque black.
pub const BLACK: u32 = 0xFF00_0000;

/// Opaque white.
pub const WHITE: u32 = 0xFFFF_FFFF;

/// Parse a color string into `0xAARRGGBB`.
///
/// Accepts:
/// - Hex: `"#FF0000"`, `"FF0000"`, `"#80FF0000"` (with alpha)
/// - Named: `"red"`, `"green"`, `"blue"`, `"white"`, `"black"`, `"orange"`, `"yellow"`, `"purple"`, `"cyan"`
///
/// Six-digit forms are opaque.
pub fn parse_color(s: &str) -> crate::error::Result<u32> {
    let s = s.trim();

    match s.to_lowercase().as_str() {
        "red" => return Ok(0xFFFF_0000),
        "green" => return Ok(0xFF00_FF00),
        "blue" => return Ok(0xFF00_00FF),
        "white" => return Ok(WHITE),
        "black" => return Ok(BLACK),
        "orange" => return Ok(0xFFFF_8000),
        "yellow" => return Ok(0xFFFF_FF00),
        "purple" => return Ok(0xFF80_00FF),
        "cyan" => return Ok(0xFF00_FFFF),
        _ => {}
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 && hex.len() != 8 {
        return Err(crate::PulseColorError::Color(format!(
            "Invalid color: {s} (use #RRGGBB, #AARRGGBB or a color name)"
        )));
    }
    let val = u32::from_str_radix(hex, 16)
        .map_err(|_| crate::PulseColorError::Color(format!("Invalid hex color: {s}")))?;
    if hex.len() == 6 {
        Ok(0xFF00_0000 | val)
    } else {
        Ok(val)
    }
}

/// Format a color as `#RRGGBB` (alpha is dropped).
pub fn format_color(val: u32) -> String {
    let (r, g, b) = rgb(val);
    format!("#{r:02X}{g:02X}{b:02X}")
}

/// Split a color into its red, green and blue channels.
pub fn rgb(color: u32) -> (u8, u8, u8) {
    (
        ((color >> 16) & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        (color & 0xFF) as u8,
    )
}

/// Alpha channel of a color.
pub fn alpha(color: u32) -> u8 {
    (color >> 24) as u8
}

/// Pack channels into `0xAARRGGBB`.
pub fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (u32::from(a) << 24) | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Convert HSV (`hue` in degrees, `saturation`/`value` in 0..=1) to an opaque color.
pub fn hsv_to_color(hue: f32, saturation: f32, value: f32) -> u32 {
    let h = hue.rem_euclid(360.0) / 60.0;
    let s = saturation.clamp(0.0, 1.0);
    let v = value.clamp(0.0, 1.0);
    let c = v * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_u8 = |f: f32| ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    argb(0xFF, to_u8(r), to_u8(g), to_u8(b))
}
