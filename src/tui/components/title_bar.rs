//! # TitleBar Component
//!
//! Top status bar: active travel mode, status message and the current
//! URL fragment.
//!
//! Stateless: all three fields are props copied from the session each
//! frame.
//!
//! ```text
//! trailview (mode: horse) | Selected way/123 | #selected=way/123&style=horse
//! ```

use crate::access::TravelMode;
use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

pub struct TitleBar {
    pub mode: TravelMode,
    pub status_message: String,
    /// Serialized fragment; empty when nothing is persisted.
    pub fragment: String,
}

impl TitleBar {
    pub fn new(mode: TravelMode, status_message: String, fragment: String) -> Self {
        Self {
            mode,
            status_message,
            fragment,
        }
    }

    fn text(&self) -> String {
        let mut text = format!("trailview (mode: {})", self.mode);
        for part in [&self.status_message, &self.fragment] {
            if !part.is_empty() {
                text.push_str(" | ");
                text.push_str(part);
            }
        }
        text
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Span::raw(self.text()), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_title_bar_with_status_and_fragment() {
        let mut title_bar = TitleBar::new(
            TravelMode::Horse,
            "Selected way/123".to_string(),
            "#selected=way/123&style=horse".to_string(),
        );
        let text = rendered(&mut title_bar);
        assert!(text.contains("trailview (mode: horse)"));
        assert!(text.contains("Selected way/123"));
        assert!(text.contains("#selected=way/123"));
    }

    #[test]
    fn test_title_bar_default_no_status() {
        let mut title_bar = TitleBar::new(TravelMode::Foot, String::new(), String::new());
        let text = rendered(&mut title_bar);
        assert!(text.contains("trailview (mode: foot)"));
        assert!(!text.contains('|'));
    }
}
