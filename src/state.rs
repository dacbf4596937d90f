//! Application state management
//!
//! Single owner of everything the widget knows: the style selection, the name
//! field, the last generated signature and the document it is rendered into.
//! Handlers take `&mut self`; no state lives at module scope.

use std::sync::Arc;

use crossbeam_channel::Sender;
use log::{error, info, warn};

use crate::clipboard::{copy_signature, ClipboardBackend, CopyMethod};
use crate::config::Config;
use crate::document::{Action, Document, InlineStyle};
use crate::error::ValidationError;
use crate::persistence::{IdentityProvider, SignatureRecord, SignatureSink, UserId};
use crate::style::{GeneratedSignature, StyleState};
use crate::terminal_capabilities::ColorSupport;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Width in terminal columns of the glyph preview
pub const GLYPH_PREVIEW_COLUMNS: u32 = 60;

pub const COPY_SUCCESS: &str = "Signature copied to clipboard!";
pub const COPY_FAILURE: &str = "Failed to copy signature";

/// Editable fields of the control panel, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Font,
    Color,
}

impl Field {
    pub fn all() -> &'static [Field] {
        &[Field::Name, Field::Font, Field::Color]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Font => "Font",
            Field::Color => "Color",
        }
    }
}

/// A message the user has to acknowledge before doing anything else
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
}

/// External collaborators the state talks to
pub struct Services {
    pub sink: Arc<dyn SignatureSink>,
    pub identity: Arc<dyn IdentityProvider>,
    pub clipboard: Box<dyn ClipboardBackend>,
    pub worker_tx: Sender<WorkerMessage>,
}

/// Main application state
pub struct AppState {
    // Inputs
    pub style: StyleState,
    pub name_input: String,
    pub selected: usize,
    pub editing: Option<Field>,
    pub edit_buffer: String,

    // Output of the last successful generation
    pub generated: Option<GeneratedSignature>,
    pub document: Document,
    pub glyph_preview: Option<Vec<String>>,
    preview_generation: u64,

    // Feedback
    pub notice: Option<Notice>,
    pub status_message: String,
    pub status_is_error: bool,
    pub is_exporting: bool,

    pub show_help: bool,
    pub should_quit: bool,
    pub color_support: ColorSupport,
    pub config: Config,

    sink: Arc<dyn SignatureSink>,
    identity: Arc<dyn IdentityProvider>,
    clipboard: Box<dyn ClipboardBackend>,
    worker_tx: Sender<WorkerMessage>,
}

impl AppState {
    pub fn new(config: Config, color_support: ColorSupport, services: Services) -> Self {
        let style = StyleState::new(
            config.style.default_font.clone(),
            config.style.default_color.clone(),
        );

        Self {
            style,
            name_input: String::new(),
            selected: 0,
            editing: None,
            edit_buffer: String::new(),

            generated: None,
            document: Document::new(),
            glyph_preview: None,
            preview_generation: 0,

            notice: None,
            status_message: "Ready - Press [?] for help".to_string(),
            status_is_error: false,
            is_exporting: false,

            show_help: false,
            should_quit: false,
            color_support,
            config,

            sink: services.sink,
            identity: services.identity,
            clipboard: services.clipboard,
            worker_tx: services.worker_tx,
        }
    }

    /// Set status message
    pub fn set_status(&mut self, message: &str, is_error: bool) {
        self.status_message = message.to_string();
        self.status_is_error = is_error;
    }

    pub fn show_notice(&mut self, message: &str, is_error: bool) {
        self.notice = Some(Notice {
            message: message.to_string(),
            is_error,
        });
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn signed_in_user(&self) -> Option<UserId> {
        self.identity.current_user_id()
    }

    pub fn selected_field(&self) -> Field {
        Field::all()[self.selected % Field::all().len()]
    }

    /// Generate the signature from the current inputs.
    ///
    /// An empty name shows a notice and leaves everything else untouched.
    pub fn generate(&mut self) -> Result<(), ValidationError> {
        let signature = match GeneratedSignature::from_input(&self.name_input, &self.style) {
            Ok(signature) => signature,
            Err(e) => {
                self.show_notice(&e.to_string(), true);
                return Err(e);
            }
        };

        self.document.set_preview(
            &signature.name,
            InlineStyle {
                font_family: signature.font.clone(),
                color: signature.color.clone(),
                font_size_px: None,
                offscreen: false,
            },
        );
        self.document.set_enabled(Action::Download, true);
        self.document.set_enabled(Action::Copy, true);

        self.generated = Some(signature);
        self.save_style();
        self.request_glyph_preview();
        self.set_status("Signature generated", false);
        Ok(())
    }

    /// Hand the style to the persistence sink without waiting on it
    fn save_style(&self) {
        match self.identity.current_user_id() {
            Some(user_id) => self.sink.submit(SignatureRecord::new(user_id, &self.style)),
            None => warn!("No signed-in user; signature style not saved"),
        }
    }

    fn request_glyph_preview(&mut self) {
        self.glyph_preview = None;
        if !self.config.ui.show_glyph_preview {
            return;
        }
        let Some(signature) = self.generated.clone() else {
            return;
        };

        self.preview_generation += 1;
        let _ = self.worker_tx.send(WorkerMessage::GlyphPreview {
            signature,
            columns: GLYPH_PREVIEW_COLUMNS,
            generation: self.preview_generation,
        });
    }

    /// Queue a PNG export of the generated signature. No-op before generation.
    pub fn download(&mut self) {
        if !self.document.is_enabled(Action::Download) {
            return;
        }
        let Some(signature) = self.generated.clone() else {
            return;
        };
        if self.is_exporting {
            return;
        }

        self.is_exporting = true;
        self.set_status("Exporting...", false);
        if self.worker_tx.send(WorkerMessage::Export { signature }).is_err() {
            self.is_exporting = false;
            self.set_status("Export worker unavailable", true);
        }
    }

    /// Copy the generated signature. No-op before generation.
    pub fn copy(&mut self) -> Option<CopyMethod> {
        if !self.document.is_enabled(Action::Copy) {
            return None;
        }

        match copy_signature(
            &mut self.document,
            self.clipboard.as_mut(),
            self.generated.as_ref(),
        ) {
            Ok(Some(method)) => {
                info!("Signature copied via {:?}", method);
                self.show_notice(COPY_SUCCESS, false);
                Some(method)
            }
            Ok(None) => None,
            Err(e) => {
                error!("Copy failed: {}", e);
                self.show_notice(COPY_FAILURE, true);
                None
            }
        }
    }

    /// Handle response from worker thread
    pub fn handle_worker_response(&mut self, response: WorkerResponse) {
        match response {
            WorkerResponse::ExportComplete { path, render_time } => {
                self.is_exporting = false;
                let filename = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                self.set_status(&format!("Saved {} ({}ms)", filename, render_time), false);
            }
            WorkerResponse::ExportFailed(err) => {
                self.is_exporting = false;
                self.set_status(&format!("Export failed: {}", err), true);
                self.show_notice(&format!("Failed to export signature: {}", err), true);
            }
            WorkerResponse::GlyphPreviewComplete { rows, generation } => {
                if generation == self.preview_generation {
                    self.glyph_preview = Some(rows);
                }
            }
            WorkerResponse::GlyphPreviewFailed { error, generation } => {
                if generation == self.preview_generation {
                    self.glyph_preview = Some(Vec::new());
                    self.set_status(&format!("Glyph preview unavailable: {}", error), true);
                }
            }
        }
    }

    pub fn next_field(&mut self) {
        self.selected = (self.selected + 1) % Field::all().len();
    }

    pub fn prev_field(&mut self) {
        let count = Field::all().len();
        self.selected = (self.selected + count - 1) % count;
    }

    /// Step the selected field's preset forward or back
    pub fn cycle_preset(&mut self, forward: bool) {
        match (self.selected_field(), forward) {
            (Field::Font, true) => self.style.next_font_preset(),
            (Field::Font, false) => self.style.prev_font_preset(),
            (Field::Color, true) => self.style.next_color_preset(),
            (Field::Color, false) => self.style.prev_color_preset(),
            (Field::Name, _) => {}
        }
    }

    /// Start editing the selected field
    pub fn start_edit(&mut self) {
        let field = self.selected_field();
        self.edit_buffer = match field {
            Field::Name => self.name_input.clone(),
            Field::Font => self.style.font().to_string(),
            Field::Color => self.style.color().to_string(),
        };
        self.editing = Some(field);
        self.set_status(
            &format!("Editing {}: type and press Enter (Esc to cancel)", field.label()),
            false,
        );
    }

    pub fn commit_edit(&mut self) {
        let Some(field) = self.editing.take() else {
            return;
        };
        let value = std::mem::take(&mut self.edit_buffer);
        match field {
            Field::Name => self.name_input = value,
            Field::Font => self.style.set_font(value),
            Field::Color => self.style.set_color(value),
        }
        self.set_status(&format!("{} updated", field.label()), false);
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.edit_buffer.clear();
        self.set_status("Edit cancelled", false);
    }
}
