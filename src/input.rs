//! Input handling
//!
//! Maps keyboard events to state transitions with context-sensitive bindings.

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::state::AppState;

/// Handle an input event
pub fn handle_event(event: Event, state: &mut AppState) -> Result<()> {
    match event {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            handle_key_event(key_event, state)
        }
        // Pasting into the field being edited
        Event::Paste(text) if state.editing.is_some() => {
            state.edit_buffer.push_str(text.trim_end_matches(['\r', '\n']));
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Handle a key event
fn handle_key_event(key: KeyEvent, state: &mut AppState) -> Result<()> {
    // A notice blocks everything until acknowledged
    if state.notice.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            state.dismiss_notice();
        }
        return Ok(());
    }

    if state.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Enter) {
            state.show_help = false;
        }
        return Ok(());
    }

    if state.editing.is_some() {
        handle_edit_input(key, state);
        return Ok(());
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return Ok(());
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => state.should_quit = true,
        KeyCode::Char('?') => state.show_help = true,

        // Field navigation
        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => state.prev_field(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => state.next_field(),
        KeyCode::Left | KeyCode::Char('h') => state.cycle_preset(false),
        KeyCode::Right | KeyCode::Char('l') => state.cycle_preset(true),
        KeyCode::Enter | KeyCode::Char('e') => state.start_edit(),

        // Actions
        KeyCode::Char('g') | KeyCode::Char('G') => {
            // Validation failures are shown as a notice by `generate`
            let _ = state.generate();
        }
        KeyCode::Char('d') | KeyCode::Char('D') => state.download(),
        KeyCode::Char('c') | KeyCode::Char('C') => {
            state.copy();
        }

        _ => {}
    }
    Ok(())
}

/// Handle typing into the field being edited
fn handle_edit_input(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Esc => state.cancel_edit(),
        KeyCode::Enter => state.commit_edit(),
        KeyCode::Backspace => {
            state.edit_buffer.pop();
        }
        KeyCode::Char(c) => state.edit_buffer.push(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipboardBackend;
    use crate::config::Config;
    use crate::error::ClipboardError;
    use crate::persistence::{DisabledSink, SessionIdentity};
    use crate::state::{Field, Services};
    use crate::terminal_capabilities::ColorSupport;
    use crossterm::event::KeyEventState;
    use std::sync::Arc;

    struct NullClipboard;

    impl ClipboardBackend for NullClipboard {
        fn supports_styled(&self) -> bool {
            true
        }
        fn write_styled(&mut self, _: &str, _: &str) -> Result<(), ClipboardError> {
            Ok(())
        }
        fn write_text(&mut self, _: &str) -> Result<(), ClipboardError> {
            Ok(())
        }
    }

    fn app() -> AppState {
        let (tx, _rx) = crossbeam_channel::unbounded();
        AppState::new(
            Config::default(),
            ColorSupport::TrueColor,
            Services {
                sink: Arc::new(DisabledSink),
                identity: Arc::new(SessionIdentity::anonymous()),
                clipboard: Box::new(NullClipboard),
                worker_tx: tx,
            },
        )
    }

    fn press(state: &mut AppState, code: KeyCode) {
        let event = Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        });
        handle_event(event, state).unwrap();
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            press(state, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_type_name_and_generate() {
        let mut state = app();
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.editing, Some(Field::Name));
        type_text(&mut state, "Jane Doe");
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.name_input, "Jane Doe");

        press(&mut state, KeyCode::Char('g'));
        assert_eq!(
            state.generated.as_ref().map(|s| s.name.as_str()),
            Some("Jane Doe")
        );
    }

    #[test]
    fn test_notice_blocks_other_keys() {
        let mut state = app();
        press(&mut state, KeyCode::Char('g'));
        assert!(state.notice.is_some());

        press(&mut state, KeyCode::Char('q'));
        assert!(!state.should_quit);

        press(&mut state, KeyCode::Enter);
        assert!(state.notice.is_none());
        press(&mut state, KeyCode::Char('q'));
        assert!(state.should_quit);
    }

    #[test]
    fn test_copy_acknowledged() {
        let mut state = app();
        state.name_input = "Jane".to_string();
        press(&mut state, KeyCode::Char('g'));
        press(&mut state, KeyCode::Char('c'));
        assert_eq!(
            state.notice.as_ref().map(|n| n.message.as_str()),
            Some("Signature copied to clipboard!")
        );
    }

    #[test]
    fn test_arrows_cycle_font_presets() {
        let mut state = app();
        press(&mut state, KeyCode::Down);
        let before = state.style.font().to_string();
        press(&mut state, KeyCode::Right);
        assert_ne!(state.style.font(), before);
        press(&mut state, KeyCode::Left);
        assert_eq!(state.style.font(), before);
    }
}
