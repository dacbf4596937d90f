//! Font and color selection
//!
//! `StyleState` holds whatever the user picked. Nothing is validated here;
//! font and color strings are interpreted when something is rendered.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Font used before the user picks one
pub const DEFAULT_FONT: &str = "Brush Script MT, cursive";

/// Color used before the user picks one
pub const DEFAULT_COLOR: &str = "#000000";

/// Decorative fonts offered by the font selector
pub const FONT_PRESETS: &[&str] = &[
    "Brush Script MT, cursive",
    "Dancing Script, cursive",
    "Great Vibes, cursive",
    "Pacifico, cursive",
    "Satisfy, cursive",
    "Lucida Handwriting, cursive",
    "Segoe Script, cursive",
    "Georgia, serif",
];

/// Ink colors offered by the color selector
pub const COLOR_PRESETS: &[&str] = &[
    "#000000", "#1e3a8a", "#2563eb", "#dc2626", "#059669", "#7c3aed",
];

/// Currently selected font family and color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleState {
    font: String,
    color: String,
}

impl Default for StyleState {
    fn default() -> Self {
        Self::new(DEFAULT_FONT, DEFAULT_COLOR)
    }
}

impl StyleState {
    pub fn new(font: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            font: font.into(),
            color: color.into(),
        }
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    /// Replace the font; takes effect at the next generation
    pub fn set_font(&mut self, font: impl Into<String>) {
        self.font = font.into();
    }

    /// Replace the color; takes effect at the next generation
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    pub fn next_font_preset(&mut self) {
        self.font = cycle(FONT_PRESETS, &self.font, 1).to_string();
    }

    pub fn prev_font_preset(&mut self) {
        self.font = cycle(FONT_PRESETS, &self.font, FONT_PRESETS.len() - 1).to_string();
    }

    pub fn next_color_preset(&mut self) {
        self.color = cycle(COLOR_PRESETS, &self.color, 1).to_string();
    }

    pub fn prev_color_preset(&mut self) {
        self.color = cycle(COLOR_PRESETS, &self.color, COLOR_PRESETS.len() - 1).to_string();
    }
}

/// Step through a preset list. A custom value not in the list starts at the head.
fn cycle<'a>(presets: &[&'a str], current: &str, step: usize) -> &'a str {
    match presets.iter().position(|p| p.eq_ignore_ascii_case(current)) {
        Some(idx) => presets[(idx + step) % presets.len()],
        None => presets[0],
    }
}

/// Whitespace as a browser form field sees it: the ECMAScript `WhiteSpace`
/// and `LineTerminator` sets. Unlike `char::is_whitespace` this includes the
/// byte order mark and excludes U+0085.
pub fn is_form_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{000B}'
            | '\u{000C}'
            | '\r'
            | ' '
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// The last (name, font, color) produced by a successful generation.
///
/// Exports read this snapshot, never the live inputs, so editing the name
/// field afterwards changes nothing until the next generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSignature {
    pub name: String,
    pub font: String,
    pub color: String,
}

impl GeneratedSignature {
    /// Trim the raw name input and snapshot the current style
    pub fn from_input(raw_name: &str, style: &StyleState) -> Result<Self, ValidationError> {
        let name = raw_name.trim_matches(is_form_whitespace);
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(Self {
            name: name.to_string(),
            font: style.font().to_string(),
            color: style.color().to_string(),
        })
    }
}

/// One entry of a CSS font-family list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontFamily {
    Named(String),
    Serif,
    SansSerif,
    Cursive,
    Fantasy,
    Monospace,
}

/// Split a CSS font-family list such as `"Brush Script MT", cursive`.
pub fn parse_font_family(list: &str) -> Vec<FontFamily> {
    list.split(',')
        .map(|entry| entry.trim().trim_matches(|c: char| c == '"' || c == '\''))
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.to_ascii_lowercase().as_str() {
            "serif" => FontFamily::Serif,
            "sans-serif" => FontFamily::SansSerif,
            "cursive" => FontFamily::Cursive,
            "fantasy" => FontFamily::Fantasy,
            "monospace" => FontFamily::Monospace,
            _ => FontFamily::Named(entry.to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_replace_without_validation() {
        let mut style = StyleState::default();
        style.set_font("Nonexistent Font");
        style.set_color("not a color");
        assert_eq!(style.font(), "Nonexistent Font");
        assert_eq!(style.color(), "not a color");
    }

    #[test]
    fn test_defaults() {
        let style = StyleState::default();
        assert_eq!(style.font(), "Brush Script MT, cursive");
        assert_eq!(style.color(), "#000000");
    }

    #[test]
    fn test_preset_cycling_wraps() {
        let mut style = StyleState::default();
        style.prev_font_preset();
        assert_eq!(style.font(), *FONT_PRESETS.last().unwrap());
        style.next_font_preset();
        assert_eq!(style.font(), FONT_PRESETS[0]);

        style.set_color("#ABCDEF");
        style.next_color_preset();
        assert_eq!(style.color(), COLOR_PRESETS[0]);
    }

    #[test]
    fn test_generated_signature_trims_and_snapshots() {
        let mut style = StyleState::new("Pacifico, cursive", "#ff0000");
        let sig = GeneratedSignature::from_input("  Jane Doe \n", &style).unwrap();
        assert_eq!(sig.name, "Jane Doe");

        style.set_color("#00ff00");
        assert_eq!(sig.color, "#ff0000");
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let style = StyleState::default();
        assert_eq!(
            GeneratedSignature::from_input(" \t ", &style),
            Err(ValidationError::EmptyName)
        );
    }

    #[test]
    fn test_trim_uses_form_whitespace() {
        let style = StyleState::default();
        assert_eq!(
            GeneratedSignature::from_input("\u{FEFF}", &style),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            GeneratedSignature::from_input("\u{3000}Jane\u{00A0}", &style)
                .unwrap()
                .name,
            "Jane"
        );
        // NEL is not form whitespace, so it survives trimming
        assert_eq!(
            GeneratedSignature::from_input("Jane\u{0085}", &style)
                .unwrap()
                .name,
            "Jane\u{0085}"
        );
    }

    #[test]
    fn test_parse_font_family() {
        assert_eq!(
            parse_font_family("\"Brush Script MT\", cursive"),
            vec![FontFamily::Named("Brush Script MT".into()), FontFamily::Cursive]
        );
        assert_eq!(
            parse_font_family("Georgia,SERIF,,"),
            vec![FontFamily::Named("Georgia".into()), FontFamily::Serif]
        );
        assert!(parse_font_family("  ").is_empty());
    }
}
