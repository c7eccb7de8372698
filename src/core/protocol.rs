//! # Wire Conventions
//!
//! The paired server recognises commands by string prefix rather than by a
//! framed protocol. Outbound, the mode picks a prefix. Inbound, one marker
//! identifies structured control payloads; everything else is plain text.
//!
//! ```text
//! Passthrough   hello            →  hello
//! AiChat        hello            →  /ai hello
//! AiControl     turn on the fan  →  /aicontrol turn on the fan
//!
//! AI_CONTROL: ```json {...} ```  →  Inbound::Control(payload)
//! anything else                  →  Inbound::Plain(text)
//! ```

use crate::core::control::ControlPayload;
use crate::core::mode::Mode;

pub const CHAT_PREFIX: &str = "/ai ";
pub const CONTROL_PREFIX: &str = "/aicontrol ";
pub const CONTROL_MARKER: &str = "AI_CONTROL: ";

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Frame user text for the wire. Pure: connection state plays no part.
pub fn encode(text: &str, mode: Mode) -> String {
    match mode {
        Mode::Passthrough => text.to_string(),
        Mode::AiChat => format!("{CHAT_PREFIX}{text}"),
        Mode::AiControl => format!("{CONTROL_PREFIX}{text}"),
    }
}

/// Classification of one received message.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Plain(String),
    Control(ControlPayload),
    /// Marker present but the body did not parse. Carries the full raw message.
    Malformed { raw: String, reason: String },
}

/// Decide how a received message should be shown. Keeps no state between calls.
pub fn route(message: &str) -> Inbound {
    let Some(body) = message.strip_prefix(CONTROL_MARKER) else {
        return Inbound::Plain(message.to_string());
    };

    match ControlPayload::parse(strip_fence(body)) {
        Ok(payload) => Inbound::Control(payload),
        Err(e) => Inbound::Malformed {
            raw: message.to_string(),
            reason: e.to_string(),
        },
    }
}

/// Remove a leading "```json" (plus whitespace) and a trailing "```" (plus
/// the whitespace before it). Either side may be missing.
fn strip_fence(body: &str) -> &str {
    let body = match body.strip_prefix(FENCE_OPEN) {
        Some(rest) => rest.trim_start(),
        None => body,
    };
    match body.strip_suffix(FENCE_CLOSE) {
        Some(rest) => rest.trim_end(),
        None => body,
    }
}
