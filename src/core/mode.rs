//! # Message Framing Modes
//!
//! The mode decides how outbound text is framed before it hits the wire.
//! Exactly one mode is active at a time, and only the user changes it.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Text goes out exactly as typed
    #[serde(rename = "passthrough")]
    #[default]
    Passthrough,
    /// Text is handed to the server's conversational AI
    #[serde(rename = "ai-chat")]
    AiChat,
    /// Text is handed to the server's device-control AI
    #[serde(rename = "ai-control")]
    AiControl,
}

impl Mode {
    /// All modes in display order (mode bar, F1..F3).
    pub const ALL: [Mode; 3] = [Mode::Passthrough, Mode::AiChat, Mode::AiControl];

    /// Cycles to the next mode (wraps around)
    pub fn next(self) -> Mode {
        match self {
            Mode::Passthrough => Mode::AiChat,
            Mode::AiChat => Mode::AiControl,
            Mode::AiControl => Mode::Passthrough,
        }
    }

    /// Returns a human-readable label for display
    pub fn label(self) -> &'static str {
        match self {
            Mode::Passthrough => "Passthrough",
            Mode::AiChat => "AI Chat",
            Mode::AiControl => "AI Control",
        }
    }

    /// Hint shown in the empty message box while this mode is active.
    pub fn placeholder(self) -> &'static str {
        match self {
            Mode::Passthrough => "Type your message here...",
            Mode::AiChat => "Ask the AI...",
            Mode::AiControl => "Send a control instruction to the AI...",
        }
    }
}
