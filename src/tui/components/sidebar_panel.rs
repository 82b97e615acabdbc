//! # SidebarPanel Component
//!
//! Renders the session's `Sidebar`: tags, relation memberships, meta
//! and links for the selected entity. Each table shows its own fill
//! state, so the tag table can be ready while memberships still load.
//!
//! The membership table supports a row cursor (`membership_cursor`);
//! the event loop moves it with Up/Down and selects the relation under
//! it on Enter.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Row, Table, TableState, Wrap};

use crate::core::sidebar::{LinkGroup, Sidebar, Slot};
use crate::tui::component::Component;

const META_HEIGHT: u16 = 8;

pub struct SidebarPanel {
    pub sidebar: Sidebar,
    pub membership_cursor: Option<usize>,
}

impl SidebarPanel {
    pub fn new(sidebar: Sidebar, membership_cursor: Option<usize>) -> Self {
        Self {
            sidebar,
            membership_cursor,
        }
    }
}

fn header(cells: Vec<&'static str>) -> Row<'static> {
    Row::new(cells).style(Style::default().add_modifier(Modifier::BOLD))
}

/// Placeholder row for a slot that holds no data.
fn placeholder<T>(slot: &Slot<T>) -> Option<Row<'static>> {
    let (text, style) = match slot {
        Slot::Ready(_) => return None,
        Slot::Idle => ("", Style::default()),
        Slot::Loading => ("loading…", Style::default().fg(Color::DarkGray)),
        Slot::Absent => ("not found", Style::default().fg(Color::Yellow)),
        Slot::Failed(msg) => {
            return Some(Row::new(vec![format!("error: {msg}")]).style(Style::default().fg(Color::Red)));
        }
    };
    Some(Row::new(vec![text.to_string()]).style(style))
}

/// Height of a bordered box holding `rows` lines plus `chrome` lines of
/// borders and header, saturating at the terminal's limit.
fn boxed_height(rows: usize, chrome: u16) -> u16 {
    u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(chrome)
}

fn bordered(title: &str) -> Block<'_> {
    Block::bordered().border_type(BorderType::Rounded).title(title)
}

impl SidebarPanel {
    fn render_tags(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = match &self.sidebar.tags {
            Slot::Ready(tags) => tags
                .iter()
                .map(|(k, v)| Row::new(vec![k.clone(), v.clone()]))
                .collect(),
            other => placeholder(other).into_iter().collect(),
        };
        let table = Table::new(rows, [Constraint::Percentage(40), Constraint::Percentage(60)])
            .header(header(vec!["Key", "Value"]))
            .block(bordered("Tags"));
        frame.render_widget(table, area);
    }

    fn render_memberships(&mut self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = match &self.sidebar.memberships {
            Slot::Ready(rows) if rows.is_empty() => vec![Row::new(vec!["none"])
                .style(Style::default().add_modifier(Modifier::ITALIC))],
            Slot::Ready(rows) => rows
                .iter()
                .map(|r| Row::new(vec![r.label.clone(), r.kind.clone(), r.role.clone()]))
                .collect(),
            other => placeholder(other).into_iter().collect(),
        };
        let row_count = self
            .sidebar
            .memberships
            .ready()
            .map(|rows| rows.len())
            .unwrap_or(0);
        self.membership_cursor = self.membership_cursor.filter(|i| *i < row_count);

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(45),
                Constraint::Percentage(35),
                Constraint::Percentage(20),
            ],
        )
        .header(header(vec!["Relation", "Type", "Role"]))
        .block(bordered("Relations"))
        .row_highlight_style(Style::default().bg(Color::DarkGray));
        let mut state = TableState::default().with_selected(self.membership_cursor);
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_meta(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = match &self.sidebar.meta {
            Slot::Ready(meta) => vec![
                Row::new(vec!["ID".to_string(), meta.entity.to_string()]),
                Row::new(vec!["Version".to_string(), meta.version.to_string()]),
                Row::new(vec!["Changeset".to_string(), meta.changeset.to_string()]),
                Row::new(vec![
                    "Comment".to_string(),
                    meta.comment.clone().unwrap_or_else(|| "…".to_string()),
                ]),
                Row::new(vec!["Uploaded".to_string(), meta.uploaded.clone().unwrap_or_default()]),
                Row::new(vec!["User".to_string(), meta.user.clone()]),
            ],
            other => placeholder(other).into_iter().collect(),
        };
        let table = Table::new(rows, [Constraint::Length(10), Constraint::Min(10)]).block(bordered("Meta"));
        frame.render_widget(table, area);
    }

    fn render_links(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .sidebar
            .links
            .iter()
            .map(|link| {
                let group = match link.group {
                    LinkGroup::View => "view",
                    LinkGroup::Edit => "edit",
                };
                Line::from(vec![
                    Span::styled(format!("{group:<5}"), Style::default().fg(Color::DarkGray)),
                    Span::styled(format!("{:<15}", link.label), Style::default().fg(Color::Cyan)),
                    Span::raw(link.url.clone()),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines).block(bordered("Links")), area);
    }
}

impl Component for SidebarPanel {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let Some(target) = self.sidebar.target else {
            let hint = Paragraph::new("Type way/123, node/1 or relation/5 below to select an entity.")
                .block(bordered("Sidebar"))
                .wrap(Wrap { trim: true });
            frame.render_widget(hint, area);
            return;
        };

        let outer = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(target.to_string());
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let membership_rows = self
            .sidebar
            .memberships
            .ready()
            .map(|rows| rows.len().max(1))
            .unwrap_or(1);
        let links_height = boxed_height(self.sidebar.links.len(), 2);
        let [tags_area, relations_area, meta_area, links_area] = Layout::vertical([
            Constraint::Min(4),
            Constraint::Length(boxed_height(membership_rows, 3)),
            Constraint::Length(META_HEIGHT),
            Constraint::Length(links_height),
        ])
        .areas(inner);

        self.render_tags(frame, tags_area);
        self.render_memberships(frame, relations_area);
        self.render_meta(frame, meta_area);
        self.render_links(frame, links_area);
    }
}
