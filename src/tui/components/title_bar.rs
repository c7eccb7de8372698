//! # TitleBar Component
//!
//! Top status bar showing connection state and notifications.
//!
//! ## Responsibilities
//!
//! - Display the connection state, colored by state
//! - Display the server URL while a connection is open or being opened
//! - Display status messages (e.g. "cannot send: WebSocket is not open")
//! - Show "↓ New" indicator when there's unseen content below scroll
//!
//! TitleBar is purely presentational. It receives all data as props and has
//! no internal state:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar {
//!     connection: app.connection,
//!     connecting: app.connecting,
//!     url: app.url.clone(),
//!     status_message: app.status_message.clone(),
//!     has_unseen_content: tui.message_list.has_unseen_content,
//! };
//! title_bar.render(frame, title_area);
//! ```
//!
//! ## Conditional Formatting
//!
//! 1. **Unseen content**: `"Wisp [connected] ws://host/ws | sent: hi | ↓ New"`
//! 2. **Status message**: `"Wisp [connected] ws://host/ws | sent: hi"`
//! 3. **Default**: `"Wisp [disconnected]"`

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::state::ConnectionState;
use crate::tui::component::Component;

/// Top status bar component.
///
/// # Props
///
/// - `connection` / `connecting`: Socket state from the core
/// - `url`: Server URL of the current (or pending) connection
/// - `status_message`: Transient status from the core
/// - `has_unseen_content`: Whether there's content below current scroll position
pub struct TitleBar {
    pub connection: ConnectionState,
    pub connecting: bool,
    pub url: String,
    pub status_message: String,
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(
        connection: ConnectionState,
        connecting: bool,
        url: String,
        status_message: String,
        has_unseen_content: bool,
    ) -> Self {
        Self {
            connection,
            connecting,
            url,
            status_message,
            has_unseen_content,
        }
    }

    fn state_span(&self) -> Span<'static> {
        let (label, color) = match (self.connection, self.connecting) {
            (ConnectionState::Connected, _) => (self.connection.label(), Color::Green),
            (ConnectionState::Disconnected, true) => ("connecting", Color::Yellow),
            (ConnectionState::Disconnected, false) => (self.connection.label(), Color::Red),
        };
        Span::styled(format!("[{label}]"), Style::default().fg(color))
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let sep = Style::default().fg(Color::DarkGray);
        let mut spans = vec![
            Span::styled("Wisp ", Style::default().add_modifier(Modifier::BOLD)),
            self.state_span(),
        ];

        if self.connection == ConnectionState::Connected || self.connecting {
            spans.push(Span::raw(format!(" {}", self.url)));
        }
        if !self.status_message.is_empty() {
            spans.push(Span::styled(" | ", sep));
            spans.push(Span::raw(self.status_message.clone()));
        }
        if self.has_unseen_content {
            spans.push(Span::styled(" | ", sep));
            spans.push(Span::styled("↓ New", Style::default().fg(Color::Cyan)));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
