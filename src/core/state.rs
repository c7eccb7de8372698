//! # Application State
//!
//! Core business state for Wisp. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── url: String                   // URL box contents at last connect
//! ├── mode: Mode                    // active framing mode
//! ├── connection: ConnectionState   // Disconnected | Connected
//! ├── connecting: bool              // attempt issued, no open/close yet
//! ├── log: MessageLog               // append-only message log
//! ├── status_message: String        // status bar text
//! └── alert: Option<String>         // blocking alert popup
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::core::config::ResolvedConfig;
use crate::core::message_log::MessageLog;
use crate::core::mode::Mode;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

impl ConnectionState {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connected => "connected",
        }
    }
}

/// Which controls accept input in a given connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlEnablement {
    pub url_field: bool,
    pub connect: bool,
    pub disconnect: bool,
    pub message_field: bool,
    pub send: bool,
}

impl ControlEnablement {
    pub fn for_state(state: ConnectionState) -> Self {
        let connected = state == ConnectionState::Connected;
        Self {
            url_field: !connected,
            connect: !connected,
            disconnect: connected,
            message_field: connected,
            send: connected,
        }
    }
}

pub struct App {
    pub url: String,
    pub mode: Mode,
    pub connection: ConnectionState,
    /// An `OpenConnection` effect is in flight and neither open nor close has arrived.
    pub connecting: bool,
    pub log: MessageLog,
    pub status_message: String,
    pub alert: Option<String>,
}

impl App {
    pub fn new(url: String) -> Self {
        let mut app = Self {
            url,
            mode: Mode::default(),
            connection: ConnectionState::Disconnected,
            connecting: false,
            log: MessageLog::new(),
            status_message: String::from("Enter a WebSocket URL and press Enter"),
            alert: None,
        };
        app.switch_mode(Mode::Passthrough);
        app
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        let mut app = Self::new(config.url.clone());
        app.switch_mode(config.mode);
        app
    }

    /// Select the active framing mode. Leaves the connection alone.
    pub fn switch_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Hint text for the empty message box.
    pub fn placeholder(&self) -> &'static str {
        self.mode.placeholder()
    }

    pub fn controls(&self) -> ControlEnablement {
        ControlEnablement::for_state(self.connection)
    }

    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionState::Connected
    }

    /// True while a connection is open or being opened.
    pub fn has_connection(&self) -> bool {
        self.is_connected() || self.connecting
    }
}
