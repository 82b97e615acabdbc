//! # LayerPanel Component
//!
//! Lists every filtered map layer with the filter it currently holds,
//! as compact JSON. Layers whose filters are still held back (engine not
//! ready) are marked as pending.

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Row, Table};
use serde_json::Value;

use crate::map::LayerId;
use crate::tui::component::Component;

pub struct LayerPanel {
    /// Current filter per layer, in stacking order.
    pub layers: Vec<(LayerId, Option<Value>)>,
    pub ready: bool,
}

impl LayerPanel {
    pub fn new(layers: Vec<(LayerId, Option<Value>)>, ready: bool) -> Self {
        Self { layers, ready }
    }
}

fn layer_style(layer: LayerId) -> Style {
    match layer {
        LayerId::Paths | LayerId::InformalPaths => Style::default().fg(Color::Green),
        LayerId::DisallowedPaths | LayerId::DisallowedInformalPaths => {
            Style::default().fg(Color::LightGreen).add_modifier(Modifier::DIM)
        }
        LayerId::UnspecifiedPaths | LayerId::UnspecifiedInformalPaths => {
            Style::default().fg(Color::Magenta)
        }
        LayerId::SelectedPaths | LayerId::SelectedPois => Style::default().fg(Color::Yellow),
        LayerId::HoveredPaths | LayerId::HoveredPois => Style::default().fg(Color::Cyan),
    }
}

impl Component for LayerPanel {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let rows = self.layers.iter().map(|(layer, filter)| {
            let filter_text = filter
                .as_ref()
                .map(Value::to_string)
                .unwrap_or_else(|| "-".to_string());
            Row::new(vec![layer.name().to_string(), filter_text]).style(layer_style(*layer))
        });

        let title = if self.ready {
            "Layers"
        } else {
            "Layers (pending)"
        };
        let table = Table::new(rows, [Constraint::Length(27), Constraint::Min(10)])
            .header(Row::new(vec!["Layer", "Filter"]).style(Style::default().add_modifier(Modifier::BOLD)))
            .block(Block::bordered().border_type(BorderType::Rounded).title(title));
        frame.render_widget(table, area);
    }
}
