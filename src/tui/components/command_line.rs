//! # CommandLine Component
//!
//! Single-line input at the bottom of the screen. On Enter the buffer
//! is parsed into a `Command`:
//!
//! | Input                     | Command                         |
//! |---------------------------|---------------------------------|
//! | `way/123`, `node/1`, ...  | select that entity              |
//! | `horse`, `wheelchair`, ...| switch travel mode              |
//! | `clear`                   | clear the selection             |
//! | `#selected=way/1&...`     | load a URL fragment             |

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::access::TravelMode;
use crate::osm::EntityRef;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Select(EntityRef),
    Mode(TravelMode),
    Clear,
    Fragment(String),
    Invalid(String),
}

/// Parses a submitted line; `None` for a blank line.
pub fn parse_command(text: &str) -> Option<Command> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let command = if text == "clear" {
        Command::Clear
    } else if text.starts_with('#') {
        Command::Fragment(text.to_string())
    } else if text.contains('/') {
        match text.parse() {
            Ok(entity) => Command::Select(entity),
            Err(e) => Command::Invalid(e.to_string()),
        }
    } else {
        match text.parse() {
            Ok(mode) => Command::Mode(mode),
            Err(e) => Command::Invalid(e.to_string()),
        }
    };
    Some(command)
}

/// High-level events emitted by the CommandLine
#[derive(Debug, Clone, PartialEq)]
pub enum CommandEvent {
    Submit(Command),
    /// Enter on an empty line; the parent may use it (e.g. to follow the
    /// membership cursor).
    SubmitEmpty,
    ContentChanged,
}

#[derive(Debug, Default)]
pub struct CommandLine {
    pub buffer: String,
}

impl CommandLine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for CommandLine {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Command (way/123 · mode name · clear · Tab: next mode · Esc: deselect)");
        let input = Paragraph::new(self.buffer.as_str())
            .block(block)
            .style(Style::default().fg(Color::Green));
        frame.render_widget(input, area);

        let cursor_x = area.x + 1 + self.buffer.chars().count() as u16;
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

impl EventHandler for CommandLine {
    type Event = CommandEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.push(*c);
                Some(CommandEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Single line: a pasted newline would never be visible
                self.buffer.push_str(text.lines().next().unwrap_or_default());
                Some(CommandEvent::ContentChanged)
            }
            TuiEvent::Backspace => self.buffer.pop().map(|_| CommandEvent::ContentChanged),
            TuiEvent::Submit => {
                let text = std::mem::take(&mut self.buffer);
                Some(match parse_command(&text) {
                    Some(command) => CommandEvent::Submit(command),
                    None => CommandEvent::SubmitEmpty,
                })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("way/123"), Some(Command::Select(EntityRef::way(123))));
        assert_eq!(parse_command(" horse "), Some(Command::Mode(TravelMode::Horse)));
        assert_eq!(parse_command("clear"), Some(Command::Clear));
        assert_eq!(
            parse_command("#selected=node/1"),
            Some(Command::Fragment("#selected=node/1".to_string()))
        );
        assert_eq!(parse_command("   "), None);
        assert!(matches!(parse_command("area/5"), Some(Command::Invalid(_))));
        assert!(matches!(parse_command("hovercraft"), Some(Command::Invalid(_))));
    }

    #[test]
    fn test_typing_and_submit() {
        let mut line = CommandLine::new();
        for c in "way/7x".chars() {
            line.handle_event(&TuiEvent::InputChar(c));
        }
        assert_eq!(line.handle_event(&TuiEvent::Backspace), Some(CommandEvent::ContentChanged));
        assert_eq!(
            line.handle_event(&TuiEvent::Submit),
            Some(CommandEvent::Submit(Command::Select(EntityRef::way(7))))
        );
        assert!(line.buffer.is_empty());
        assert_eq!(line.handle_event(&TuiEvent::Submit), Some(CommandEvent::SubmitEmpty));
        assert_eq!(line.handle_event(&TuiEvent::Backspace), None);
    }

    #[test]
    fn test_paste_keeps_first_line() {
        let mut line = CommandLine::new();
        line.handle_event(&TuiEvent::Paste("relation/9\nignored".to_string()));
        assert_eq!(line.buffer, "relation/9");
    }
}
