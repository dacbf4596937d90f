//! Terminal color support detection
//!
//! Decides how the preview shows the signature color.

use std::env;

use ratatui::style::Color;

use crate::color_space::{parse_css_color, quantize_to_ansi256};

/// Level of color support in the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSupport {
    /// No color support
    NoColor,
    /// 16 basic colors; too coarse to show an ink color
    Color16,
    /// 256 color palette
    Color256,
    /// Full 24-bit RGB (TrueColor)
    #[default]
    TrueColor,
}

impl ColorSupport {
    /// Terminal color for a CSS color string, if it can be shown
    pub fn ink(&self, css: &str) -> Option<Color> {
        let rgba = parse_css_color(css)?;
        match self {
            ColorSupport::TrueColor => Some(Color::Rgb(rgba.r, rgba.g, rgba.b)),
            ColorSupport::Color256 => Some(Color::Indexed(quantize_to_ansi256(rgba))),
            ColorSupport::Color16 | ColorSupport::NoColor => None,
        }
    }
}

/// Detect the level of color support
pub fn detect_color_support() -> ColorSupport {
    // NO_COLOR is the standard opt-out
    if env::var("NO_COLOR").is_ok() {
        return ColorSupport::NoColor;
    }

    if let Ok(colorterm) = env::var("COLORTERM") {
        let colorterm = colorterm.to_lowercase();
        if colorterm.contains("truecolor") || colorterm.contains("24bit") {
            return ColorSupport::TrueColor;
        }
    }

    if env::var("WT_SESSION").is_ok() {
        return ColorSupport::TrueColor;
    }

    match env::var("TERM").map(|t| t.to_lowercase()) {
        Ok(term) if term.contains("256") || term.contains("screen") || term.contains("tmux") => {
            ColorSupport::Color256
        }
        Ok(term) if term.contains("linux") || term == "xterm" || term.contains("console") => {
            ColorSupport::Color16
        }
        _ => ColorSupport::Color256,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truecolor_ink() {
        assert_eq!(
            ColorSupport::TrueColor.ink("#ff0000"),
            Some(Color::Rgb(255, 0, 0))
        );
    }

    #[test]
    fn test_256_ink_is_indexed() {
        assert!(matches!(
            ColorSupport::Color256.ink("navy"),
            Some(Color::Indexed(_))
        ));
    }

    #[test]
    fn test_unparsable_or_unsupported_ink() {
        assert_eq!(ColorSupport::TrueColor.ink("bogus"), None);
        assert_eq!(ColorSupport::NoColor.ink("#ff0000"), None);
    }
}
