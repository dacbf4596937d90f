//! CSS color parsing and terminal color quantization
//!
//! Colors are stored as the raw strings the user picked and only parsed here,
//! at render time.

use std::str::FromStr;

use palette::Srgb;

/// Opaque black, used when a color string cannot be parsed
pub const FALLBACK: Rgba = Rgba::new(0, 0, 0, 255);

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    fn opaque(rgb: Srgb<u8>) -> Self {
        Self::new(rgb.red, rgb.green, rgb.blue, 255)
    }

    /// `#rrggbb`, alpha dropped
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parse a CSS color value.
///
/// Accepts hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`), `rgb()`/`rgba()`
/// with integer channels and the CSS named colors.
pub fn parse_css_color(value: &str) -> Option<Rgba> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = value.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_function(args);
    }

    if lower == "transparent" {
        return Some(Rgba::new(0, 0, 0, 0));
    }

    palette::named::from_str(&lower).map(Rgba::opaque)
}

/// Parse a color, falling back to opaque black like a canvas does
pub fn parse_or_fallback(value: &str) -> Rgba {
    parse_css_color(value).unwrap_or(FALLBACK)
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    let (rgb_part, alpha_part) = match hex.len() {
        3 | 6 => (hex, None),
        4 => (hex.get(..3)?, Some(hex.get(3..)?)),
        8 => (hex.get(..6)?, Some(hex.get(6..)?)),
        _ => return None,
    };

    let rgb = Srgb::<u8>::from_str(rgb_part).ok()?;
    let alpha = match alpha_part {
        None => 255,
        Some(a) if a.len() == 1 => u8::from_str_radix(&a.repeat(2), 16).ok()?,
        Some(a) => u8::from_str_radix(a, 16).ok()?,
    };

    Some(Rgba::new(rgb.red, rgb.green, rgb.blue, alpha))
}

fn parse_rgb_function(args: &str) -> Option<Rgba> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let channel = |s: &str| s.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    let a = match parts.get(3) {
        Some(a) => (a.parse::<f32>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8,
        None => 255,
    };

    Some(Rgba::new(r, g, b, a))
}

/// Quantize RGB to the ANSI 256-color palette
pub fn quantize_to_ansi256(color: Rgba) -> u8 {
    let (r, g, b) = (color.r, color.g, color.b);

    // Near-gray colors map onto the 24-step grayscale ramp (232-255)
    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let spread = [r, g, b]
        .iter()
        .map(|&c| (c as i16 - avg as i16).abs())
        .max()
        .unwrap_or(0);

    if spread < 10 {
        return 232 + (avg as f32 / 255.0 * 23.0).round() as u8;
    }

    // 6x6x6 color cube (16-231)
    let step = |c: u8| (c as f32 / 255.0 * 5.0).round() as u8;
    16 + 36 * step(r) + 6 * step(g) + step(b)
}
