//! # TUI Components
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as struct fields:
//! - `TitleBar`: travel mode, status message and fragment
//! - `LayerPanel`: current filter of every map layer
//! - `SidebarPanel`: tables for the selected entity (keeps only a row
//!   cursor of its own)
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `CommandLine`: text input that emits parsed `Command`s
//!
//! Components receive external data as props, never by reaching into
//! the session. The event loop copies what each one needs per frame:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(session.mode, session.status_message.clone(), fragment);
//! title_bar.render(frame, title_area);
//! ```

pub mod command_line;
pub mod layer_panel;
pub mod sidebar_panel;
mod title_bar;

pub use command_line::{Command, CommandEvent, CommandLine};
pub use layer_panel::LayerPanel;
pub use sidebar_panel::SidebarPanel;
pub use title_bar::TitleBar;
