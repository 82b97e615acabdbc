//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the session,
//! and translates keyboard input into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//! The map itself is not drawn: the in-memory `LayerBoard` stands in for
//! the rendering engine, and the layer panel shows the filters it holds.
//!
//! ## Event Loop
//!
//! ```text
//! keyboard ──► TuiEvent ──► Action ──► update() ──► [Effect]
//!                                        ▲             │
//!                                        │  Resolve    ▼
//!                      mpsc::Receiver ◄──┴── tokio task (resolve_selection)
//! ```
//!
//! Draws only when something changed: an input event, a resize or an
//! action from a background task.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;

use crate::access::TravelMode;
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::fragment::{Fragment, STYLE_KEY};
use crate::core::resolve::resolve_selection;
use crate::core::state::Session;
use crate::map::board::LayerBoard;
use crate::osm::{EntityStore, OsmApiClient};
use crate::tui::component::EventHandler;
use crate::tui::components::{Command, CommandEvent, CommandLine};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of the session)
pub struct TuiState {
    pub command_line: CommandLine,
    /// Highlighted row of the membership table.
    pub membership_cursor: Option<usize>,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            command_line: CommandLine::new(),
            membership_cursor: None,
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
        )?;
        info!("Terminal modes enabled (bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste);
    }
}

/// Builds the entity store over the OSM API named by the config.
pub fn build_store(config: &ResolvedConfig) -> EntityStore {
    let client = OsmApiClient::with_options(
        Some(config.osm_api_base_url.clone()),
        &config.user_agent,
        config.request_timeout_secs,
    );
    EntityStore::new(Arc::new(client))
}

/// Maps a terminal event to the action it stands for, updating TUI-local
/// state on the way. `None` means the event was handled locally.
fn action_for_event(
    event: &TuiEvent,
    session: &Session<LayerBoard>,
    tui: &mut TuiState,
) -> Option<Action> {
    match event {
        TuiEvent::ForceQuit => Some(Action::Quit),
        TuiEvent::Resize => None,
        TuiEvent::Escape => Some(Action::Select {
            target: None,
            focus: None,
        }),
        TuiEvent::CycleMode => Some(Action::CycleMode),
        TuiEvent::CursorUp => {
            tui.membership_cursor = match tui.membership_cursor {
                Some(i) => Some(i.saturating_sub(1)),
                None => membership_count(session).checked_sub(1),
            };
            None
        }
        TuiEvent::CursorDown => {
            let count = membership_count(session);
            tui.membership_cursor = match tui.membership_cursor {
                Some(i) if i + 1 < count => Some(i + 1),
                Some(i) => Some(i),
                None if count > 0 => Some(0),
                None => None,
            };
            None
        }
        _ => match tui.command_line.handle_event(event)? {
            CommandEvent::ContentChanged => None,
            CommandEvent::SubmitEmpty => {
                let relation = session
                    .sidebar
                    .memberships
                    .ready()
                    .and_then(|rows| rows.get(tui.membership_cursor?))
                    .map(|row| row.relation)?;
                tui.membership_cursor = None;
                Some(Action::Select {
                    target: Some(relation),
                    focus: None,
                })
            }
            CommandEvent::Submit(command) => match command {
                Command::Select(target) => Some(Action::Select {
                    target: Some(target),
                    focus: None,
                }),
                Command::Mode(mode) => Some(Action::SetMode(Some(mode))),
                Command::Clear => Some(Action::Select {
                    target: None,
                    focus: None,
                }),
                Command::Fragment(text) => Some(Action::FragmentChanged(text)),
                Command::Invalid(reason) => {
                    warn!("Rejected command: {}", reason);
                    None
                }
            },
        },
    }
}

fn membership_count(session: &Session<LayerBoard>) -> usize {
    session
        .sidebar
        .memberships
        .ready()
        .map(|rows| rows.len())
        .unwrap_or(0)
}

/// Carries out effects. Returns `true` when the loop should stop.
fn run_effects(effects: Vec<Effect>, session: &Session<LayerBoard>, tx: &mpsc::Sender<Action>) -> bool {
    let mut quit = false;
    for effect in effects {
        match effect {
            Effect::Resolve { generation, target } => {
                info!("Spawning resolution of {} (generation {})", target, generation);
                tokio::spawn(resolve_selection(
                    session.store.clone(),
                    generation,
                    target,
                    tx.clone(),
                ));
            }
            Effect::WriteFragment(text) => {
                info!("Fragment: {}", if text.is_empty() { "(empty)" } else { text.as_str() });
            }
            Effect::Quit => quit = true,
        }
    }
    quit
}

/// The configured fragment, carrying the configured mode unless the
/// fragment names one itself.
fn initial_fragment(config: &ResolvedConfig) -> String {
    let mut fragment = Fragment::parse(&config.fragment);
    if fragment.get(STYLE_KEY).is_none() && config.mode != TravelMode::default() {
        fragment.set(STYLE_KEY, Some(config.mode.name().to_string()));
    }
    fragment.to_string()
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let store = build_store(&config);
    let mut session = Session::new(store, LayerBoard::new(), config.mode);
    let mut tui = TuiState::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    // The board registers its layers immediately; the initial fragment
    // is applied as if the page had just loaded.
    let mut startup = update(&mut session, Action::LayersReady);
    startup.extend(update(
        &mut session,
        Action::FragmentChanged(initial_fragment(&config)),
    ));
    run_effects(startup, &session, &tx);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();
    let mut needs_redraw = true; // Force first frame

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &session, &mut tui))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(std::time::Duration::from_millis(250));
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Some(action) = action_for_event(&event, &session, &mut tui) {
                let effects = update(&mut session, action);
                should_quit |= run_effects(effects, &session, &tx);
            }
        }

        // Handle background task actions (fetch results)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effects = update(&mut session, action);
            should_quit |= run_effects(effects, &session, &tx);
        }

        if should_quit {
            break;
        }
    }

    info!(
        "Shutting down with {} cached entities",
        session.store.cached_entity_count()
    );
    ratatui::restore();
    Ok(())
}
