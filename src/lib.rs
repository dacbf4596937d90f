//! inkname - Terminal Signature Studio
//!
//! Turns a typed name into a styled signature: previewed in the terminal,
//! exported as a PNG, copied as styled text, with the chosen style saved to a
//! backend in the background.

pub mod clipboard;
pub mod color_space;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod fonts;
pub mod input;
pub mod logging;
pub mod persistence;
pub mod raster;
pub mod state;
pub mod style;
pub mod terminal_capabilities;
pub mod ui;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use style::{GeneratedSignature, StyleState};
