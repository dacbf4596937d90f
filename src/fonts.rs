//! Font lookup
//!
//! Resolves a CSS font-family list against the system font database. A family
//! that isn't installed silently falls back, the way a browser canvas does:
//! requested families first, then sans-serif, then any face that loads.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use ab_glyph::{FontArc, FontVec};
use fontdb::{Database, Family, Query, ID};
use log::{debug, warn};

use crate::error::ExportError;
use crate::style::{parse_font_family, FontFamily};

/// Font database plus a cache of faces already loaded for a family list
pub struct FontBook {
    db: Database,
    loaded: Mutex<HashMap<String, FontArc>>,
}

impl FontBook {
    /// Shared book over the installed system fonts, scanned once per process
    pub fn system() -> Arc<FontBook> {
        static SYSTEM: OnceLock<Arc<FontBook>> = OnceLock::new();
        SYSTEM
            .get_or_init(|| {
                let mut db = Database::new();
                db.load_system_fonts();
                debug!("Loaded {} system font faces", db.len());
                Arc::new(FontBook::from_database(db))
            })
            .clone()
    }

    pub fn from_database(db: Database) -> Self {
        Self {
            db,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// A book with no faces; every lookup fails
    pub fn empty() -> Self {
        Self::from_database(Database::new())
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Load the best available face for a CSS font-family list
    pub fn resolve(&self, family_list: &str) -> Result<FontArc, ExportError> {
        if let Some(font) = self.cached(family_list) {
            return Ok(font);
        }

        let parsed = parse_font_family(family_list);
        let mut families: Vec<Family<'_>> = parsed.iter().map(to_fontdb_family).collect();
        families.push(Family::SansSerif);

        let query = Query {
            families: &families,
            ..Query::default()
        };

        let candidates = self
            .db
            .query(&query)
            .into_iter()
            .chain(self.db.faces().map(|face| face.id));

        let mut last_error = None;
        for id in candidates {
            match self.load_face(id) {
                Ok(font) => {
                    debug!(
                        "Font '{}' resolved to '{}'",
                        family_list,
                        self.face_name(id).unwrap_or("?")
                    );
                    if let Ok(mut loaded) = self.loaded.lock() {
                        loaded.insert(family_list.to_string(), font.clone());
                    }
                    return Ok(font);
                }
                Err(e) => {
                    warn!("Skipping unreadable font face: {}", e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ExportError::NoFontAvailable(family_list.to_string())))
    }

    fn cached(&self, family_list: &str) -> Option<FontArc> {
        self.loaded.lock().ok()?.get(family_list).cloned()
    }

    fn load_face(&self, id: ID) -> Result<FontArc, ExportError> {
        self.db
            .with_face_data(id, |data, index| {
                FontVec::try_from_vec_and_index(data.to_vec(), index)
            })
            .ok_or_else(|| ExportError::FontLoad("face data unavailable".to_string()))?
            .map(FontArc::new)
            .map_err(|e| ExportError::FontLoad(e.to_string()))
    }

    fn face_name(&self, id: ID) -> Option<&str> {
        self.db
            .face(id)
            .and_then(|face| face.families.first())
            .map(|(name, _)| name.as_str())
    }
}

fn to_fontdb_family(family: &FontFamily) -> Family<'_> {
    match family {
        FontFamily::Named(name) => Family::Name(name),
        FontFamily::Serif => Family::Serif,
        FontFamily::SansSerif => Family::SansSerif,
        FontFamily::Cursive => Family::Cursive,
        FontFamily::Fantasy => Family::Fantasy,
        FontFamily::Monospace => Family::Monospace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_book_reports_no_font() {
        let book = FontBook::empty();
        assert!(book.is_empty());
        match book.resolve("Brush Script MT, cursive") {
            Err(ExportError::NoFontAvailable(name)) => {
                assert_eq!(name, "Brush Script MT, cursive")
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_unknown_family_falls_back() {
        let book = FontBook::system();
        if book.is_empty() {
            // No fonts installed on this machine
            return;
        }
        assert!(book.resolve("Definitely Not Installed 42, cursive").is_ok());
    }
}
