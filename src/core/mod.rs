//! # Core Session Logic
//!
//! The selection state machine and everything around it. It knows
//! nothing about any specific front-end technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Session (state)      │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  Filters out, Effects   │
//!                    │  out. No I/O.           │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  resolve   │      │ MapEngine  │
//!     │  Adapter   │      │ (tokio +   │      │ (filters)  │
//!     │ (ratatui)  │      │  OSM API)  │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `Session`, all state of one viewer session
//! - [`action`]: `Action`, `Effect` and `update()`
//! - [`selection`]: selected/hovered entity and member highlighting
//! - [`sidebar`]: the tables shown for the selected entity
//! - [`fragment`]: the persisted `#key=value` URL fragment
//! - [`resolve`]: the fetches behind `Effect::Resolve`
//! - [`config`]: settings file, env and CLI resolution

pub mod action;
pub mod config;
pub mod fragment;
pub mod resolve;
pub mod selection;
pub mod sidebar;
pub mod state;

pub use action::{Action, Effect, update};
pub use state::Session;
