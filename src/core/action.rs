//! # Actions
//!
//! Everything that can happen in Wisp becomes an `Action`.
//! User presses Enter in the URL box? That's `Action::Connect(url)`.
//! The socket delivers a frame? That's `Action::Transport(Message(text))`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing the I/O the caller must
//! perform. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Transport events are replayable: feed `Action::Transport(..)` values in
//! and assert on `app.log`, no socket needed.

use log::{debug, error, info, warn};

use crate::core::control::ControlCard;
use crate::core::error::PanelError;
use crate::core::message_log::{LineKind, LogEntry};
use crate::core::mode::Mode;
use crate::core::protocol::{self, Inbound};
use crate::core::state::{App, ConnectionState};
use crate::transport::TransportEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Connect to the URL currently in the URL box.
    Connect(String),
    Disconnect,
    /// Send the message box contents.
    Submit(String),
    /// The encoded frame was queued on the live connection.
    Sent(String),
    SwitchMode(Mode),
    CycleMode,
    Transport(TransportEvent),
    DismissAlert,
    Quit,
}

/// I/O the caller performs after `update`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    OpenConnection(String),
    CloseConnection,
    /// Put this literal text on the wire. Once queued, the caller clears the
    /// message box and reports back with `Action::Sent`.
    Send(String),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Connect(url) => connect(app, url),
        Action::Disconnect => disconnect(app),
        Action::Submit(text) => submit(app, text),
        Action::Sent(wire) => {
            info!("WebSocket message sent: {}", wire);
            app.log
                .push(LogEntry::line(LineKind::Sent, format!("sent: {wire}")));
            Effect::None
        }
        Action::SwitchMode(mode) => {
            app.switch_mode(mode);
            app.status_message = format!("Mode: {}", mode.label());
            Effect::None
        }
        Action::CycleMode => {
            let mode = app.mode.next();
            update(app, Action::SwitchMode(mode))
        }
        Action::Transport(event) => {
            handle_transport_event(app, event);
            Effect::None
        }
        Action::DismissAlert => {
            app.alert = None;
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

/// Route an error to the alert popup or the status line, and always to the trace.
fn report(app: &mut App, err: PanelError) {
    if err.is_alert() {
        info!("Alert: {}", err);
        app.alert = Some(err.to_string());
    } else {
        warn!("{}", err);
        app.status_message = err.to_string();
    }
}

fn connect(app: &mut App, url: String) -> Effect {
    debug!("Connect requested");
    let url = url.trim().to_string();
    if url.is_empty() {
        report(app, PanelError::EmptyUrl);
        return Effect::None;
    }
    if app.has_connection() {
        report(app, PanelError::AlreadyConnected);
        return Effect::None;
    }

    info!("Connecting to WebSocket: {}", url);
    app.url = url.clone();
    app.connecting = true;
    app.status_message = format!("Connecting to {url}...");
    Effect::OpenConnection(url)
}

fn disconnect(app: &mut App) -> Effect {
    debug!("Disconnect requested");
    if !app.has_connection() {
        return Effect::None;
    }
    app.status_message = String::from("Disconnecting...");
    Effect::CloseConnection
}

fn submit(app: &mut App, text: String) -> Effect {
    debug!("Send requested");
    if text.is_empty() {
        report(app, PanelError::EmptyMessage);
        return Effect::None;
    }
    if !app.is_connected() {
        report(app, PanelError::NotConnected);
        return Effect::None;
    }

    let wire = protocol::encode(&text, app.mode);
    debug!("Queueing frame: {}", wire);
    Effect::Send(wire)
}

fn handle_transport_event(app: &mut App, event: TransportEvent) {
    match event {
        TransportEvent::Opened => {
            info!("WebSocket connection opened");
            app.connection = ConnectionState::Connected;
            app.connecting = false;
            app.status_message = format!("Connected to {}", app.url);
            app.log.push(LogEntry::line(
                LineKind::Status,
                "connected to WebSocket server",
            ));
        }
        TransportEvent::Closed => {
            info!("WebSocket connection closed");
            app.connection = ConnectionState::Disconnected;
            app.connecting = false;
            app.status_message = String::from("Disconnected");
            app.log.push(LogEntry::line(
                LineKind::Status,
                "disconnected from WebSocket server",
            ));
        }
        TransportEvent::Error(reason) => {
            let err = PanelError::Transport(reason);
            error!("{}", err);
            app.log.push(LogEntry::line(LineKind::Error, err.to_string()));
        }
        TransportEvent::Message(message) => {
            info!("WebSocket message received: {}", message);
            route_inbound(app, &message);
        }
    }
}

fn route_inbound(app: &mut App, message: &str) {
    match protocol::route(message) {
        Inbound::Plain(text) => {
            app.log
                .push(LogEntry::line(LineKind::Received, format!("received: {text}")));
        }
        Inbound::Control(payload) => {
            let card = ControlCard::from_payload(&payload);
            debug!("Control card with {} device block(s)", card.blocks.len());
            app.log.push(LogEntry::card(card));
        }
        Inbound::Malformed { raw, reason } => {
            error!("{}", PanelError::ControlPayloadParse(reason));
            app.log.push(LogEntry::line(
                LineKind::Fallback,
                format!("AI control message (JSON parse failed): {raw}"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::control::{FAN_KEY, REASON_FIELD, SPEED_FIELD, SWITCH_FIELD};
    use crate::core::message_log::EntryBody;
    use crate::test_support::test_app;

    fn connected_app() -> App {
        let mut app = test_app();
        let url = app.url.clone();
        assert_eq!(
            update(&mut app, Action::Connect(url.clone())),
            Effect::OpenConnection(url)
        );
        update(&mut app, Action::Transport(TransportEvent::Opened));
        app
    }

    fn received(app: &mut App, text: &str) {
        update(
            app,
            Action::Transport(TransportEvent::Message(text.to_string())),
        );
    }

    // ==========================================================================
    // Connection lifecycle
    // ==========================================================================

    #[test]
    fn test_connect_with_empty_url_alerts() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Connect("   ".into()));
        assert_eq!(effect, Effect::None);
        assert_eq!(app.alert.as_deref(), Some("Please enter a WebSocket URL."));
        assert!(!app.connecting);
        assert_eq!(app.connection, ConnectionState::Disconnected);
        assert!(app.log.is_empty());
    }

    #[test]
    fn test_open_event_connects_and_logs() {
        let app = connected_app();
        assert_eq!(app.connection, ConnectionState::Connected);
        assert!(!app.connecting);
        assert_eq!(app.log.len(), 1);
        assert_eq!(
            app.log.last().and_then(LogEntry::text),
            Some("connected to WebSocket server")
        );
        let controls = app.controls();
        assert!(!controls.url_field && !controls.connect);
        assert!(controls.message_field && controls.send);
    }

    #[test]
    fn test_close_event_disconnects_and_logs() {
        let mut app = connected_app();
        update(&mut app, Action::Transport(TransportEvent::Closed));
        assert_eq!(app.connection, ConnectionState::Disconnected);
        assert_eq!(app.log.len(), 2);
        assert_eq!(
            app.log.last().and_then(LogEntry::text),
            Some("disconnected from WebSocket server")
        );
        let controls = app.controls();
        assert!(controls.url_field && controls.connect);
        assert!(!controls.message_field && !controls.send);
    }

    #[test]
    fn test_connect_while_connected_is_rejected() {
        let mut app = connected_app();
        let effect = update(&mut app, Action::Connect("ws://elsewhere".into()));
        assert_eq!(effect, Effect::None);
        assert!(app.alert.is_none());
        assert_eq!(app.url, "ws://localhost:8080/ws");
    }

    #[test]
    fn test_connect_while_pending_is_rejected() {
        let mut app = test_app();
        let url = app.url.clone();
        assert!(matches!(
            update(&mut app, Action::Connect(url.clone())),
            Effect::OpenConnection(_)
        ));
        assert_eq!(update(&mut app, Action::Connect(url)), Effect::None);
    }

    #[test]
    fn test_failed_connect_allows_retry() {
        let mut app = test_app();
        let url = app.url.clone();
        update(&mut app, Action::Connect(url.clone()));
        update(
            &mut app,
            Action::Transport(TransportEvent::Error("connection refused".into())),
        );
        update(&mut app, Action::Transport(TransportEvent::Closed));

        assert_eq!(
            update(&mut app, Action::Connect(url.clone())),
            Effect::OpenConnection(url)
        );
    }

    #[test]
    fn test_disconnect_without_connection_is_noop() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Disconnect), Effect::None);
        assert!(app.log.is_empty());
    }

    #[test]
    fn test_disconnect_waits_for_close_event() {
        let mut app = connected_app();
        assert_eq!(update(&mut app, Action::Disconnect), Effect::CloseConnection);
        // State only changes once the transport reports the close
        assert_eq!(app.connection, ConnectionState::Connected);
    }

    #[test]
    fn test_transport_error_logs_without_state_change() {
        let mut app = connected_app();
        update(
            &mut app,
            Action::Transport(TransportEvent::Error("reset by peer".into())),
        );
        assert_eq!(app.connection, ConnectionState::Connected);
        assert_eq!(
            app.log.last().and_then(LogEntry::text),
            Some("WebSocket error: reset by peer")
        );
    }

    // ==========================================================================
    // Outbound
    // ==========================================================================

    #[test]
    fn test_empty_message_never_sends() {
        for mode in Mode::ALL {
            for mut app in [test_app(), connected_app()] {
                app.switch_mode(mode);
                let before = app.log.len();
                assert_eq!(update(&mut app, Action::Submit(String::new())), Effect::None);
                assert_eq!(app.alert.as_deref(), Some("Please enter a message to send."));
                assert_eq!(app.log.len(), before);
            }
        }
    }

    #[test]
    fn test_send_while_disconnected_warns_once() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Submit("hello".into()));
        assert_eq!(effect, Effect::None);
        assert!(app.alert.is_none());
        assert!(app.log.is_empty());
        assert_eq!(app.status_message, PanelError::NotConnected.to_string());
    }

    #[test]
    fn test_send_uses_mode_prefix_and_logs_wire_text() {
        let cases = [
            (Mode::Passthrough, "hello"),
            (Mode::AiChat, "/ai hello"),
            (Mode::AiControl, "/aicontrol hello"),
        ];
        for (mode, wire) in cases {
            let mut app = connected_app();
            update(&mut app, Action::SwitchMode(mode));
            let before = app.log.len();
            let effect = update(&mut app, Action::Submit("hello".into()));
            assert_eq!(effect, Effect::Send(wire.to_string()));
            // Nothing is logged until the frame is actually queued
            assert_eq!(app.log.len(), before);

            assert_eq!(update(&mut app, Action::Sent(wire.to_string())), Effect::None);
            assert_eq!(
                app.log.last().and_then(LogEntry::text),
                Some(format!("sent: {wire}").as_str())
            );
        }
    }

    #[test]
    fn test_mode_switch_does_not_touch_connection() {
        let mut app = connected_app();
        let before = app.log.len();
        update(&mut app, Action::CycleMode);
        assert_eq!(app.mode, Mode::AiChat);
        assert_eq!(app.connection, ConnectionState::Connected);
        assert_eq!(app.log.len(), before);
    }

    // ==========================================================================
    // Inbound
    // ==========================================================================

    #[test]
    fn test_plain_message_logged_verbatim() {
        let mut app = connected_app();
        received(&mut app, "hello");
        assert_eq!(app.log.len(), 2);
        assert_eq!(app.log.last().and_then(LogEntry::text), Some("received: hello"));
    }

    #[test]
    fn test_control_message_appends_card() {
        let mut app = connected_app();
        received(
            &mut app,
            "AI_CONTROL: ```json\n{\"风扇\":{\"开关\":\"on\",\"风速\":\"2\",\"理由\":\"hot\"}}\n```",
        );
        let Some(EntryBody::Card(card)) = app.log.last().map(|e| &e.body) else {
            panic!("expected a control card");
        };
        assert_eq!(card.blocks.len(), 1);
        assert_eq!(card.blocks[0].label, FAN_KEY);
        assert_eq!(card.blocks[0].field(SWITCH_FIELD), Some("on"));
        assert_eq!(card.blocks[0].field(SPEED_FIELD), Some("2"));
        assert_eq!(card.blocks[0].field(REASON_FIELD), Some("hot"));
    }

    #[test]
    fn test_malformed_control_message_falls_back() {
        let mut app = connected_app();
        let before = app.log.len();
        received(&mut app, "AI_CONTROL: not valid json");

        assert_eq!(app.log.len(), before + 1);
        let entry = app.log.last().unwrap();
        assert!(matches!(
            entry.body,
            EntryBody::Line { kind: LineKind::Fallback, .. }
        ));
        assert!(entry.text().unwrap().contains("AI_CONTROL: not valid json"));
        assert!(
            !app.log
                .entries()
                .iter()
                .any(|e| matches!(e.body, EntryBody::Card(_)))
        );
    }

    #[test]
    fn test_replayed_session_keeps_arrival_order() {
        let mut app = test_app();
        let url = app.url.clone();
        let actions = vec![
            Action::Connect(url),
            Action::Transport(TransportEvent::Opened),
            Action::Submit("ping".into()),
            Action::Sent("ping".into()),
            Action::Transport(TransportEvent::Message("pong".into())),
            Action::Transport(TransportEvent::Message(
                "AI_CONTROL: {\"窗帘\":{\"开关\":\"off\",\"理由\":\"night\"}}".into(),
            )),
            Action::Disconnect,
            Action::Transport(TransportEvent::Message("late".into())),
            Action::Transport(TransportEvent::Closed),
        ];
        for action in actions {
            update(&mut app, action);
        }

        let texts: Vec<Option<&str>> = app.log.entries().iter().map(LogEntry::text).collect();
        assert_eq!(
            texts,
            vec![
                Some("connected to WebSocket server"),
                Some("sent: ping"),
                Some("received: pong"),
                None,
                Some("received: late"),
                Some("disconnected from WebSocket server"),
            ]
        );
    }

    #[test]
    fn test_dismiss_alert() {
        let mut app = test_app();
        update(&mut app, Action::Submit(String::new()));
        assert!(app.alert.is_some());
        update(&mut app, Action::DismissAlert);
        assert!(app.alert.is_none());
    }
}
