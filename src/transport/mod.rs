//! # Transport
//!
//! The connection to the device sits behind the `Transport` trait so the
//! core can be driven by scripted events in tests and by a real WebSocket
//! at runtime.
//!
//! ```text
//!  TUI ── Outbound ──▶ [ Transport::run ] ── TransportEvent ──▶ TUI
//!                      (tokio task)
//! ```
//!
//! `drive` wraps a transport run and guarantees the lifecycle the core relies
//! on: a failed run reports `Error(reason)`, and every run ends with exactly
//! one `Closed`.

pub mod websocket;

use std::fmt;

use async_trait::async_trait;
use log::{info, warn};
use tokio::sync::mpsc::{Receiver, Sender};

pub use websocket::WebSocketTransport;

/// Lifecycle and data notifications from a live connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    Message(String),
    Closed,
    Error(String),
}

/// Requests from the UI to the connection task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Text(String),
    /// Start the closing handshake. `Closed` follows once it completes.
    Close,
}

#[derive(Debug)]
pub enum TransportError {
    /// Could not establish the connection (DNS, refused, bad URL, handshake).
    Connect(String),
    /// The established connection failed mid-stream.
    Socket(String),
    /// The event receiver was dropped (UI exited).
    ChannelClosed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Connect(msg) => write!(f, "connect failed: {msg}"),
            TransportError::Socket(msg) => write!(f, "socket error: {msg}"),
            TransportError::ChannelClosed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for TransportError {}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Returns the name of the transport.
    fn name(&self) -> &str;

    /// Connect to `url`, emit `Opened`, then pump messages both ways until
    /// either side closes. Must not emit `Closed` itself; `drive` does that.
    async fn run(
        &self,
        url: &str,
        outbound: Receiver<Outbound>,
        events: Sender<TransportEvent>,
    ) -> Result<(), TransportError>;
}

/// Run one connection to completion and emit its terminal events.
pub async fn drive(
    transport: &dyn Transport,
    url: &str,
    outbound: Receiver<Outbound>,
    events: Sender<TransportEvent>,
) {
    info!("[{}] connecting to {}", transport.name(), url);

    match transport.run(url, outbound, events.clone()).await {
        Ok(()) => info!("[{}] connection to {} ended", transport.name(), url),
        Err(TransportError::ChannelClosed) => {
            info!("[{}] event receiver dropped, stopping", transport.name());
            return;
        }
        Err(e) => {
            warn!("[{}] {} failed: {}", transport.name(), url, e);
            if events.send(TransportEvent::Error(e.to_string())).await.is_err() {
                return;
            }
        }
    }

    if events.send(TransportEvent::Closed).await.is_err() {
        warn!("Failed to report close for {}: receiver dropped", url);
    }
}
