//! Styled text copy
//!
//! The signature goes to the clipboard as an HTML fragment when the clipboard
//! accepts rich content. Otherwise a hidden element is attached to the
//! document, selected, and the selection is copied. That element and the
//! selection are owned by a guard and released on every exit path.

use log::{debug, warn};

use crate::document::{Document, ElementId, InlineStyle};
use crate::error::ClipboardError;
use crate::style::GeneratedSignature;

/// Font size of the copied text
pub const COPY_FONT_PX: u32 = 24;

/// Something that can receive copied content
pub trait ClipboardBackend {
    /// Whether `write_styled` is available
    fn supports_styled(&self) -> bool;

    /// Write rich content with a plain-text alternative
    fn write_styled(&mut self, html: &str, alt_text: &str) -> Result<(), ClipboardError>;

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The OS clipboard via arboard, opened on first use
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new()?);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| ClipboardError::Unavailable("clipboard not initialized".to_string()))
    }
}

impl ClipboardBackend for SystemClipboard {
    fn supports_styled(&self) -> bool {
        true
    }

    fn write_styled(&mut self, html: &str, alt_text: &str) -> Result<(), ClipboardError> {
        self.handle()?.set_html(html, Some(alt_text))?;
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.handle()?.set_text(text)?;
        Ok(())
    }
}

/// How the signature reached the clipboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMethod {
    Styled,
    Selection,
}

/// A hidden element attached to the document and selected.
///
/// Dropping the guard clears the selection and detaches the element.
pub struct ScratchSelection<'a> {
    doc: &'a mut Document,
    id: ElementId,
}

impl<'a> ScratchSelection<'a> {
    pub fn attach(doc: &'a mut Document, signature: &GeneratedSignature) -> Self {
        let id = doc.append(&signature.name, scratch_style(signature));
        doc.clear_selection();
        doc.select(id);
        Self { doc, id }
    }

    /// Run the copy command against the active selection
    pub fn copy_to(&self, clipboard: &mut dyn ClipboardBackend) -> Result<(), ClipboardError> {
        let selected = self.doc.selection().ok_or(ClipboardError::EmptySelection)?;
        clipboard.write_text(&selected.text)
    }
}

impl Drop for ScratchSelection<'_> {
    fn drop(&mut self) {
        self.doc.clear_selection();
        self.doc.remove(self.id);
    }
}

fn scratch_style(signature: &GeneratedSignature) -> InlineStyle {
    InlineStyle {
        font_family: signature.font.clone(),
        color: signature.color.clone(),
        font_size_px: Some(COPY_FONT_PX),
        offscreen: true,
    }
}

/// Copy the generated signature, or do nothing if there is none.
pub fn copy_signature(
    doc: &mut Document,
    clipboard: &mut dyn ClipboardBackend,
    signature: Option<&GeneratedSignature>,
) -> Result<Option<CopyMethod>, ClipboardError> {
    let Some(signature) = signature else {
        return Ok(None);
    };

    if clipboard.supports_styled() {
        let html = styled_fragment(signature);
        match clipboard.write_styled(&html, &signature.name) {
            Ok(()) => {
                debug!("Copied styled signature");
                return Ok(Some(CopyMethod::Styled));
            }
            Err(e) => warn!("Styled copy failed, falling back to selection: {}", e),
        }
    }

    let scratch = ScratchSelection::attach(doc, signature);
    scratch.copy_to(clipboard)?;
    Ok(Some(CopyMethod::Selection))
}

/// HTML fragment for a signature at copy size
pub fn styled_fragment(signature: &GeneratedSignature) -> String {
    let mut scratch = Document::new();
    let id = scratch.append(&signature.name, scratch_style(signature));
    scratch
        .element(id)
        .map(|e| e.to_html())
        .unwrap_or_default()
}
