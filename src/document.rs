//! In-memory UI document
//!
//! The surface the widget draws into: a preview container holding at most one
//! element, a body that temporary elements can be attached to, a single
//! active text selection and the enabled state of the export actions.

/// Handle to an element in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(u64);

/// Inline style of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineStyle {
    pub font_family: String,
    pub color: String,
    pub font_size_px: Option<u32>,
    /// Positioned off-screen; attached but never drawn
    pub offscreen: bool,
}

/// A styled text element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub id: ElementId,
    pub text: String,
    pub style: InlineStyle,
}

impl Element {
    /// HTML fragment carrying the inline style, as a browser copies it
    pub fn to_html(&self) -> String {
        let mut css = format!(
            "font-family: {}; color: {}",
            escape_html(&self.style.font_family),
            escape_html(&self.style.color)
        );
        if let Some(px) = self.style.font_size_px {
            css.push_str(&format!("; font-size: {}px", px));
        }
        format!(
            "<span style=\"{}\">{}</span>",
            css,
            escape_html(&self.text)
        )
    }
}

/// User actions that can be enabled or disabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Download,
    Copy,
}

#[derive(Debug, Default)]
pub struct Document {
    next_id: u64,
    preview: Option<Element>,
    body: Vec<Element>,
    selection: Option<ElementId>,
    download_enabled: bool,
    copy_enabled: bool,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> ElementId {
        self.next_id += 1;
        ElementId(self.next_id)
    }

    /// Replace the preview container's content
    pub fn set_preview(&mut self, text: &str, style: InlineStyle) -> ElementId {
        let id = self.allocate_id();
        self.preview = Some(Element {
            id,
            text: text.to_string(),
            style,
        });
        id
    }

    pub fn preview(&self) -> Option<&Element> {
        self.preview.as_ref()
    }

    /// Attach an element to the body
    pub fn append(&mut self, text: &str, style: InlineStyle) -> ElementId {
        let id = self.allocate_id();
        self.body.push(Element {
            id,
            text: text.to_string(),
            style,
        });
        id
    }

    /// Detach an element from the body. Removing a missing element is a no-op.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        if self.selection == Some(id) {
            self.selection = None;
        }
        let idx = self.body.iter().position(|e| e.id == id)?;
        Some(self.body.remove(idx))
    }

    pub fn body(&self) -> &[Element] {
        &self.body
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.body
            .iter()
            .chain(self.preview.iter())
            .find(|e| e.id == id)
    }

    /// Make `id` the only selected node, replacing any prior selection
    pub fn select(&mut self, id: ElementId) -> bool {
        if self.element(id).is_none() {
            return false;
        }
        self.selection = Some(id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<&Element> {
        self.selection.and_then(|id| self.element(id))
    }

    pub fn has_selection(&self) -> bool {
        self.selection.is_some()
    }

    pub fn set_enabled(&mut self, action: Action, enabled: bool) {
        match action {
            Action::Download => self.download_enabled = enabled,
            Action::Copy => self.copy_enabled = enabled,
        }
    }

    pub fn is_enabled(&self, action: Action) -> bool {
        match action {
            Action::Download => self.download_enabled,
            Action::Copy => self.copy_enabled,
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
