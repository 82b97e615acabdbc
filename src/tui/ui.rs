use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::Session;
use crate::map::{LayerId, MapEngine};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{LayerPanel, SidebarPanel, TitleBar};

/// ```text
/// ┌ title bar ─────────────────────────────────────────────┐
/// │ layers (45%)              │ sidebar (55%)              │
/// └ command line ──────────────────────────────────────────┘
/// ```
pub fn draw_ui<E: MapEngine>(frame: &mut Frame, session: &Session<E>, tui: &mut TuiState) {
    use Constraint::{Length, Min, Percentage};
    let [title_area, main_area, command_area] =
        Layout::vertical([Length(1), Min(0), Length(3)]).areas(frame.area());
    let [layers_area, sidebar_area] =
        Layout::horizontal([Percentage(45), Percentage(55)]).areas(main_area);

    let mut title_bar = TitleBar::new(
        session.mode,
        session.status_message.clone(),
        session.fragment.to_string(),
    );
    title_bar.render(frame, title_area);

    let layers = LayerId::ALL
        .into_iter()
        .map(|layer| (layer, session.filters().current(layer).cloned()))
        .collect();
    LayerPanel::new(layers, session.filters().is_ready()).render(frame, layers_area);

    let mut sidebar = SidebarPanel::new(session.sidebar.clone(), tui.membership_cursor);
    sidebar.render(frame, sidebar_area);
    tui.membership_cursor = sidebar.membership_cursor;

    tui.command_line.render(frame, command_area);
}
