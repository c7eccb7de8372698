use std::fmt;

/// Everything that can go wrong while driving the panel.
/// None of these are fatal; `update` recovers from each locally.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelError {
    /// Connect requested with a blank URL. Shown as an alert.
    EmptyUrl,
    /// Send requested with no text. Shown as an alert.
    EmptyMessage,
    /// Send requested while disconnected. Trace warning only.
    NotConnected,
    /// Connect requested while a connection is open or opening. Trace warning only.
    AlreadyConnected,
    /// The transport reported a failure. Logged as an error entry.
    Transport(String),
    /// An `AI_CONTROL: ` body was not a valid payload.
    ControlPayloadParse(String),
}

impl PanelError {
    /// Whether the error interrupts the user with an alert popup.
    pub fn is_alert(&self) -> bool {
        matches!(self, PanelError::EmptyUrl | PanelError::EmptyMessage)
    }
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelError::EmptyUrl => write!(f, "Please enter a WebSocket URL."),
            PanelError::EmptyMessage => write!(f, "Please enter a message to send."),
            PanelError::NotConnected => write!(f, "cannot send: WebSocket is not open"),
            PanelError::AlreadyConnected => {
                write!(f, "already connected; disconnect before connecting again")
            }
            PanelError::Transport(reason) => write!(f, "WebSocket error: {reason}"),
            PanelError::ControlPayloadParse(reason) => {
                write!(f, "AI control payload parse error: {reason}")
            }
        }
    }
}

impl std::error::Error for PanelError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_input_errors_alert() {
        assert!(PanelError::EmptyUrl.is_alert());
        assert!(PanelError::EmptyMessage.is_alert());
        assert!(!PanelError::NotConnected.is_alert());
        assert!(!PanelError::AlreadyConnected.is_alert());
        assert!(!PanelError::Transport("x".into()).is_alert());
        assert!(!PanelError::ControlPayloadParse("x".into()).is_alert());
    }

    #[test]
    fn test_transport_display_includes_reason() {
        let err = PanelError::Transport("connection refused".into());
        assert_eq!(err.to_string(), "WebSocket error: connection refused");
    }
}
