//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates keyboard events into `core::Action` values, and carries out
//! the `Effect`s the core hands back.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Threads
//!
//! The event loop is synchronous. Each connection runs on the tokio runtime
//! as two tasks: one drives the [`Transport`], the other forwards its
//! events into the loop's `std::sync::mpsc` channel as
//! `Action::Transport`. The loop drains that channel between key events,
//! so every state change still goes through `update()` on one thread.
//!
//! ## Redraw Strategy
//!
//! Nothing animates, so the loop sleeps up to 250ms waiting for input and
//! only redraws after a key event, a resize, or a transport action.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::transport::{self, Outbound, Transport, TransportEvent, WebSocketTransport};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Queued outbound frames per connection before `Send` starts failing.
const OUTBOUND_CAPACITY: usize = 64;
/// Buffered transport events per connection.
const EVENT_CAPACITY: usize = 64;
const IDLE_POLL: Duration = Duration::from_millis(250);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub url_box: InputBox,
    pub message_box: InputBox,
}

impl TuiState {
    pub fn new(app: &App) -> Self {
        let mut tui = Self {
            message_list: MessageListState::new(),
            url_box: InputBox::with_text("Server URL", "ws://host:port/path", &app.url),
            message_box: InputBox::new("Message", app.placeholder()),
        };
        tui.sync(app);
        tui
    }

    /// Copy props from the core state into the input boxes.
    ///
    /// Enablement follows the connection state, and so does focus: the URL
    /// box takes keys while disconnected, the message box while connected.
    pub fn sync(&mut self, app: &App) {
        let controls = app.controls();
        self.url_box.enabled = controls.url_field;
        self.url_box.focused = controls.url_field;
        self.message_box.enabled = controls.message_field;
        self.message_box.focused = controls.message_field;
        self.message_box.placeholder = app.placeholder();
    }

    fn focused_input(&mut self) -> Option<&mut InputBox> {
        if self.url_box.focused {
            Some(&mut self.url_box)
        } else if self.message_box.focused {
            Some(&mut self.message_box)
        } else {
            None
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: redraws reset the blink timer
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide // Hide cursor on exit
        );
    }
}

/// The loop's handle on one live (or pending) connection.
struct ConnectionHandle {
    outbound: tokio::sync::mpsc::Sender<Outbound>,
    tasks: Vec<tokio::task::AbortHandle>,
}

impl ConnectionHandle {
    fn send(&self, text: String) -> bool {
        match self.outbound.try_send(Outbound::Text(text)) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to queue outbound frame: {}", e);
                false
            }
        }
    }

    /// Ask the transport to close gracefully. If it cannot be reached the
    /// tasks are torn down instead.
    fn close(&self) {
        if self.outbound.try_send(Outbound::Close).is_err() {
            warn!("Transport unreachable for close; aborting connection tasks");
            for task in &self.tasks {
                task.abort();
            }
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let transport: Arc<dyn Transport> = Arc::new(WebSocketTransport::new());
    info!("Using transport: {}", transport.name());

    let mut app = App::from_config(&config);
    let mut tui = TuiState::new(&app);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()?;

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut connection: Option<ConnectionHandle> = None;

    if config.connect_on_start && !app.url.trim().is_empty() {
        info!("Connecting on start to {}", app.url);
        let url = app.url.clone();
        let effect = update(&mut app, Action::Connect(url));
        apply_effect(effect, &mut tui, &mut connection, &transport, &tx);
    }

    let mut needs_redraw = true; // Force first frame
    let mut should_quit = false;

    while !should_quit {
        if needs_redraw {
            tui.sync(&app);
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        // Process first event + drain ALL pending events before next draw
        let mut next = poll_event_timeout(IDLE_POLL)?;
        while let Some(event) = next {
            needs_redraw = true;
            if let Some(action) = route_event(&app, &mut tui, event) {
                let effect = update(&mut app, action);
                should_quit |= apply_effect(effect, &mut tui, &mut connection, &transport, &tx);
                tui.sync(&app);
            }
            next = poll_event_immediate()?;
        }

        // Handle background task actions (transport events)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let closed = matches!(action, Action::Transport(TransportEvent::Closed));
            let effect = update(&mut app, action);
            should_quit |= apply_effect(effect, &mut tui, &mut connection, &transport, &tx);
            if closed && !app.has_connection() {
                connection = None;
            }
        }
    }

    if let Some(handle) = connection.take() {
        handle.close();
    }

    ratatui::restore();
    Ok(())
}

/// Turn a terminal event into a core action, handling TUI-local events in place.
fn route_event(app: &App, tui: &mut TuiState, event: TuiEvent) -> Option<Action> {
    // Any key dismisses a visible alert, and does nothing else
    if app.alert.is_some() {
        return (!matches!(event, TuiEvent::Resize)).then_some(Action::DismissAlert);
    }

    match event {
        TuiEvent::Quit => Some(Action::Quit),
        TuiEvent::Resize => None,
        TuiEvent::Disconnect => Some(Action::Disconnect),
        TuiEvent::SelectMode(mode) => Some(Action::SwitchMode(mode)),
        TuiEvent::CycleMode => Some(Action::CycleMode),
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.message_list.handle_event(&event);
            None
        }
        _ => {
            let url_focused = tui.url_box.focused;
            let input = tui.focused_input()?;
            match input.handle_event(&event)? {
                InputEvent::Submit(text) if url_focused => Some(Action::Connect(text)),
                InputEvent::Submit(text) => Some(Action::Submit(text)),
                InputEvent::ContentChanged => None,
            }
        }
    }
}

/// Carry out an effect. Returns true when the loop should exit.
fn apply_effect(
    effect: Effect,
    tui: &mut TuiState,
    connection: &mut Option<ConnectionHandle>,
    transport: &Arc<dyn Transport>,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match effect {
        Effect::None => {}
        Effect::Quit => return true,
        Effect::OpenConnection(url) => {
            if let Some(stale) = connection.take() {
                stale.close();
            }
            *connection = Some(spawn_connection(transport.clone(), url, tx.clone()));
        }
        Effect::CloseConnection => match connection {
            Some(handle) => handle.close(),
            None => warn!("Close requested with no connection handle"),
        },
        Effect::Send(wire) => match connection {
            Some(handle) => {
                let outcome = if handle.send(wire.clone()) {
                    tui.message_box.clear();
                    Action::Sent(wire)
                } else {
                    Action::Transport(TransportEvent::Error(
                        "outbound queue unavailable".to_string(),
                    ))
                };
                if tx.send(outcome).is_err() {
                    warn!("Failed to report send outcome: receiver dropped");
                }
            }
            None => warn!("Send requested with no connection handle"),
        },
    }
    false
}

/// Start a connection on the tokio runtime.
///
/// One task drives the transport; a second forwards its events into the
/// event loop as actions. The returned handle queues outbound frames.
fn spawn_connection(
    transport: Arc<dyn Transport>,
    url: String,
    tx: mpsc::Sender<Action>,
) -> ConnectionHandle {
    info!("Spawning {} connection to {}", transport.name(), url);

    let (outbound_tx, outbound_rx) = tokio::sync::mpsc::channel::<Outbound>(OUTBOUND_CAPACITY);
    let (event_tx, mut event_rx) = tokio::sync::mpsc::channel::<TransportEvent>(EVENT_CAPACITY);

    let drive_handle = tokio::spawn(async move {
        transport::drive(transport.as_ref(), &url, outbound_rx, event_tx).await;
    });

    let forward_handle = tokio::spawn(async move {
        let mut forwarded = 0usize;
        while let Some(event) = event_rx.recv().await {
            forwarded += 1;
            if tx.send(Action::Transport(event)).is_err() {
                warn!("Failed to forward transport event: receiver dropped");
                return;
            }
        }
        debug!("Transport event channel closed after {} events", forwarded);
    });

    ConnectionHandle {
        outbound: outbound_tx,
        tasks: vec![drive_handle.abort_handle(), forward_handle.abort_handle()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mode::Mode;
    use crate::core::state::ConnectionState;
    use crate::test_support::{ScriptedTransport, test_app};

    fn type_text(app: &App, tui: &mut TuiState, text: &str) {
        for c in text.chars() {
            assert!(route_event(app, tui, TuiEvent::InputChar(c)).is_none());
        }
    }

    fn connected() -> (App, TuiState) {
        let mut app = test_app();
        let url = app.url.clone();
        update(&mut app, Action::Connect(url));
        update(&mut app, Action::Transport(TransportEvent::Opened));
        let tui = TuiState::new(&app);
        (app, tui)
    }

    #[test]
    fn test_enter_in_url_box_connects() {
        let mut app = test_app();
        let mut tui = TuiState::new(&app);
        assert!(tui.url_box.focused);

        let action = route_event(&app, &mut tui, TuiEvent::Submit);
        assert_eq!(action, Some(Action::Connect("ws://localhost:8080/ws".to_string())));
    }

    #[test]
    fn test_enter_in_message_box_submits() {
        let (mut app, mut tui) = connected();
        assert!(tui.message_box.focused);
        assert!(!tui.url_box.enabled);

        type_text(&app, &mut tui, "hi");
        let action = route_event(&app, &mut tui, TuiEvent::Submit);
        assert_eq!(action, Some(Action::Submit("hi".to_string())));
    }

    #[test]
    fn test_alert_swallows_next_key() {
        let mut app = test_app();
        let mut tui = TuiState::new(&app);
        update(&mut app, Action::Connect("   ".to_string()));
        assert!(app.alert.is_some());

        let action = route_event(&app, &mut tui, TuiEvent::InputChar('x'));
        assert_eq!(action, Some(Action::DismissAlert));
        assert_eq!(tui.url_box.buffer, "ws://localhost:8080/ws");

        assert_eq!(route_event(&app, &mut tui, TuiEvent::Resize), None);
    }

    #[test]
    fn test_function_keys_switch_mode_without_touching_input() {
        let (mut app, mut tui) = connected();
        type_text(&app, &mut tui, "draft");

        let action = route_event(&app, &mut tui, TuiEvent::SelectMode(Mode::AiChat));
        assert_eq!(action, Some(Action::SwitchMode(Mode::AiChat)));
        update(&mut app, Action::SwitchMode(Mode::AiChat));
        tui.sync(&app);

        assert_eq!(tui.message_box.buffer, "draft");
        assert_eq!(tui.message_box.placeholder, "Ask the AI...");
        assert_eq!(app.connection, ConnectionState::Connected);
    }

    #[test]
    fn test_scroll_events_stay_local() {
        let (mut app, mut tui) = connected();
        assert_eq!(route_event(&app, &mut tui, TuiEvent::ScrollUp), None);
        assert!(!tui.message_list.stick_to_bottom);
    }

    #[tokio::test]
    async fn test_send_effect_queues_frame_and_clears_box() {
        let (_app, mut tui) = connected();
        tui.message_box.buffer = "hello".to_string();

        let (outbound_tx, mut outbound_rx) = tokio::sync::mpsc::channel(4);
        let mut connection = Some(ConnectionHandle {
            outbound: outbound_tx,
            tasks: Vec::new(),
        });
        let transport: Arc<dyn Transport> = Arc::new(ScriptedTransport::new(Vec::new()));
        let (tx, rx) = mpsc::channel();

        let quit = apply_effect(
            Effect::Send("/ai hello".to_string()),
            &mut tui,
            &mut connection,
            &transport,
            &tx,
        );

        assert!(!quit);
        assert!(tui.message_box.buffer.is_empty());
        assert_eq!(
            outbound_rx.recv().await,
            Some(Outbound::Text("/ai hello".to_string()))
        );
        assert_eq!(rx.try_recv(), Ok(Action::Sent("/ai hello".to_string())));
    }

    #[tokio::test]
    async fn test_failed_queue_keeps_text_and_logs_no_sent_line() {
        let (mut app, mut tui) = connected();
        tui.message_box.buffer = "hello".to_string();

        let (outbound_tx, outbound_rx) = tokio::sync::mpsc::channel(4);
        drop(outbound_rx);
        let mut connection = Some(ConnectionHandle {
            outbound: outbound_tx,
            tasks: Vec::new(),
        });
        let transport: Arc<dyn Transport> = Arc::new(ScriptedTransport::new(Vec::new()));
        let (tx, rx) = mpsc::channel();

        let effect = update(&mut app, Action::Submit("hello".to_string()));
        apply_effect(effect, &mut tui, &mut connection, &transport, &tx);
        while let Ok(action) = rx.try_recv() {
            update(&mut app, action);
        }

        assert_eq!(tui.message_box.buffer, "hello");
        let texts: Vec<&str> = app.log.entries().iter().filter_map(|e| e.text()).collect();
        assert!(!texts.iter().any(|t| t.starts_with("sent:")));
        assert_eq!(
            texts.last(),
            Some(&"WebSocket error: outbound queue unavailable")
        );
    }

    #[tokio::test]
    async fn test_spawned_connection_feeds_actions_back() {
        let transport: Arc<dyn Transport> = Arc::new(ScriptedTransport::new(vec![
            TransportEvent::Opened,
            TransportEvent::Message("hello".to_string()),
        ]));
        let (tx, rx) = mpsc::channel();

        let _handle = spawn_connection(transport, "ws://scripted".to_string(), tx);

        let mut app = test_app();
        let url = app.url.clone();
        update(&mut app, Action::Connect(url));
        let mut seen = Vec::new();
        while seen.len() < 3 {
            tokio::task::yield_now().await;
            while let Ok(action) = rx.try_recv() {
                seen.push(action.clone());
                update(&mut app, action);
            }
        }

        assert_eq!(
            seen,
            vec![
                Action::Transport(TransportEvent::Opened),
                Action::Transport(TransportEvent::Message("hello".to_string())),
                Action::Transport(TransportEvent::Closed),
            ]
        );
        assert_eq!(app.connection, ConnectionState::Disconnected);
        assert!(!app.has_connection());
    }
}
