use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use log::warn;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    // Core actions (turned into core::Action by the event loop)
    ForceQuit,   // Ctrl+C
    Escape,      // clears the selection
    CycleMode,   // Tab
    Submit,      // Enter

    // TUI-local events (handled directly in TUI)
    InputChar(char),
    Paste(String),
    Backspace,
    CursorUp,
    CursorDown,
    Resize,
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            warn!("Event poll failed: {}", e);
            return None;
        }
    }
    match event::read() {
        Ok(event) => translate(event),
        Err(e) => {
            warn!("Event read failed: {}", e);
            None
        }
    }
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(std::time::Duration::ZERO)
}

fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key_event) => {
            // Kitty-protocol terminals also report releases
            if key_event.kind == KeyEventKind::Release {
                return None;
            }
            log::debug!("Key event: {:?} with modifiers {:?}", key_event.code, key_event.modifiers);
            match (key_event.modifiers, key_event.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
                (_, KeyCode::Char(c)) => Some(TuiEvent::InputChar(c)),
                (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
                (_, KeyCode::Enter) => Some(TuiEvent::Submit),
                (_, KeyCode::Esc) => Some(TuiEvent::Escape),
                (_, KeyCode::Tab) => Some(TuiEvent::CycleMode),
                (_, KeyCode::Up) => Some(TuiEvent::CursorUp),
                (_, KeyCode::Down) => Some(TuiEvent::CursorDown),
                _ => None,
            }
        }
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn key(modifiers: KeyModifiers, code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_key_translation() {
        assert_eq!(translate(key(KeyModifiers::CONTROL, KeyCode::Char('c'))), Some(TuiEvent::ForceQuit));
        assert_eq!(translate(key(KeyModifiers::NONE, KeyCode::Char('c'))), Some(TuiEvent::InputChar('c')));
        assert_eq!(translate(key(KeyModifiers::NONE, KeyCode::Tab)), Some(TuiEvent::CycleMode));
        assert_eq!(translate(key(KeyModifiers::NONE, KeyCode::Esc)), Some(TuiEvent::Escape));
        assert_eq!(translate(key(KeyModifiers::NONE, KeyCode::F(1))), None);
    }

    #[test]
    fn test_resize_and_paste() {
        assert_eq!(translate(Event::Resize(80, 24)), Some(TuiEvent::Resize));
        assert_eq!(translate(Event::Paste("way/1".to_string())), Some(TuiEvent::Paste("way/1".to_string())));
    }
}
