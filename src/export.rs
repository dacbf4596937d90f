//! PNG export of the generated signature

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, RgbaImage};
use log::info;

use crate::color_space::parse_or_fallback;
use crate::error::ExportError;
use crate::fonts::FontBook;
use crate::raster::{rasterize, RasterConfig};
use crate::style::{is_form_whitespace, GeneratedSignature};

/// Download filename for a name.
///
/// Whitespace runs become one underscore. Path separators, characters
/// reserved on common filesystems and control characters are each replaced
/// with an underscore, so the result is always a single path component.
pub fn signature_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 14);
    let mut in_whitespace = false;
    for c in name.chars() {
        if is_form_whitespace(c) {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if is_unsafe_filename_char(c) {
            out.push('_');
        } else {
            out.push(c);
        }
    }
    out.push_str("_signature.png");
    out
}

fn is_unsafe_filename_char(c: char) -> bool {
    c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
}

/// Renders generated signatures to PNG files in a download directory
#[derive(Clone)]
pub struct ImageExporter {
    fonts: Arc<FontBook>,
    directory: PathBuf,
    raster: RasterConfig,
}

impl ImageExporter {
    pub fn new(fonts: Arc<FontBook>, directory: impl Into<PathBuf>) -> Self {
        Self {
            fonts,
            directory: directory.into(),
            raster: RasterConfig::default(),
        }
    }

    /// Export the signature, or do nothing if none has been generated.
    ///
    /// Returns the path written.
    pub fn export(
        &self,
        signature: Option<&GeneratedSignature>,
    ) -> Result<Option<PathBuf>, ExportError> {
        let Some(signature) = signature else {
            return Ok(None);
        };

        let path = self.download_path(signature)?;
        let png = self.render_png(signature)?;
        std::fs::write(&path, png).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

        info!("Exported signature image to {:?}", path);
        Ok(Some(path))
    }

    /// Target file for a signature; always directly inside the download directory
    pub fn download_path(&self, signature: &GeneratedSignature) -> Result<PathBuf, ExportError> {
        let path = self.directory.join(signature_filename(&signature.name));
        if path.parent() != Some(self.directory.as_path()) {
            return Err(ExportError::OutsideDirectory(path));
        }
        Ok(path)
    }

    /// Draw the signature onto the export surface
    pub fn render_image(&self, signature: &GeneratedSignature) -> Result<RgbaImage, ExportError> {
        let font = self.fonts.resolve(&signature.font)?;
        let color = parse_or_fallback(&signature.color);
        Ok(rasterize(&signature.name, &font, color, &self.raster))
    }

    /// Rasterize and encode without touching the filesystem
    pub fn render_png(&self, signature: &GeneratedSignature) -> Result<Vec<u8>, ExportError> {
        let image = self.render_image(signature)?;

        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signature(name: &str) -> GeneratedSignature {
        GeneratedSignature {
            name: name.to_string(),
            font: "Brush Script MT, cursive".to_string(),
            color: "#ff0000".to_string(),
        }
    }

    #[test]
    fn test_filename_collapses_whitespace_runs() {
        assert_eq!(signature_filename("Jane Doe"), "Jane_Doe_signature.png");
        assert_eq!(signature_filename("A  \t B"), "A_B_signature.png");
        assert_eq!(signature_filename("Solo"), "Solo_signature.png");
    }

    #[test]
    fn test_filename_replaces_path_characters() {
        assert_eq!(signature_filename("AC/DC"), "AC_DC_signature.png");
        assert_eq!(
            signature_filename("../Escaped Name"),
            ".._Escaped_Name_signature.png"
        );
        assert_eq!(signature_filename("/etc/passwd"), "_etc_passwd_signature.png");
        assert_eq!(signature_filename("C:\\Users\\x"), "C__Users_x_signature.png");
        assert_eq!(signature_filename("Tab\u{7}Bell"), "Tab_Bell_signature.png");
    }

    #[test]
    fn test_filename_uses_form_whitespace() {
        assert_eq!(signature_filename("Jane\u{FEFF}Doe"), "Jane_Doe_signature.png");
        assert_eq!(signature_filename("Jane\u{3000}\u{00A0}Doe"), "Jane_Doe_signature.png");
    }

    #[test]
    fn test_download_path_stays_in_directory() {
        let dir = std::env::temp_dir().join("inkname-downloads");
        let exporter = ImageExporter::new(Arc::new(FontBook::empty()), &dir);

        for name in ["../Escaped Name", "AC/DC", "/etc/passwd", "..", "a/../../b"] {
            let path = exporter.download_path(&signature(name)).unwrap();
            assert_eq!(path.parent(), Some(dir.as_path()), "name {:?}", name);
        }
    }

    #[test]
    fn test_export_without_signature_is_noop() {
        let dir = std::env::temp_dir().join("inkname-export-noop");
        let exporter = ImageExporter::new(Arc::new(FontBook::empty()), &dir);
        assert!(matches!(exporter.export(None), Ok(None)));
        assert!(!dir.join("_signature.png").exists());
    }

    #[test]
    fn test_missing_fonts_surface_as_error() {
        let exporter = ImageExporter::new(Arc::new(FontBook::empty()), std::env::temp_dir());
        let result = exporter.export(Some(&signature("Jane Doe")));
        assert!(matches!(result, Err(ExportError::NoFontAvailable(_))));
    }

    #[test]
    fn test_unwritable_directory_is_io_error() {
        let fonts = FontBook::system();
        if fonts.is_empty() {
            return;
        }
        let exporter = ImageExporter::new(fonts, "/nonexistent/inkname/dir");
        match exporter.export(Some(&signature("Jane Doe"))) {
            Err(ExportError::Io { path, .. }) => {
                assert!(path.ends_with("Jane_Doe_signature.png"))
            }
            other => panic!("expected Io error, got {:?}", other),
        }
    }
}
