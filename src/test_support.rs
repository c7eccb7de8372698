//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use async_trait::async_trait;
use ratatui::buffer::Buffer;
use tokio::sync::mpsc::{Receiver, Sender};
use unicode_width::UnicodeWidthStr;

use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::transport::{Outbound, Transport, TransportError, TransportEvent};

/// A transport that replays a fixed list of events instead of touching the network.
pub struct ScriptedTransport {
    script: Vec<TransportEvent>,
    failure: Option<String>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<TransportEvent>) -> Self {
        Self {
            script,
            failure: None,
        }
    }

    /// A transport whose connect attempt always fails with `reason`.
    pub fn failing(reason: &str) -> Self {
        Self {
            script: Vec::new(),
            failure: Some(reason.to_string()),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn run(
        &self,
        _url: &str,
        _outbound: Receiver<Outbound>,
        events: Sender<TransportEvent>,
    ) -> Result<(), TransportError> {
        if let Some(reason) = &self.failure {
            return Err(TransportError::Connect(reason.clone()));
        }
        for event in &self.script {
            events
                .send(event.clone())
                .await
                .map_err(|_| TransportError::ChannelClosed)?;
        }
        Ok(())
    }
}

/// Drain a receiver until every sender is gone.
pub async fn collect_events(mut rx: Receiver<TransportEvent>) -> Vec<TransportEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

/// Creates a test App with a preset URL and default mode.
pub fn test_app() -> App {
    App::from_config(&ResolvedConfig {
        url: "ws://localhost:8080/ws".to_string(),
        ..ResolvedConfig::default()
    })
}

/// Buffer contents as text, one line per row.
///
/// Cells hidden behind a wide character are skipped so CJK labels read
/// back exactly as they were written.
pub fn buffer_text(buffer: &Buffer) -> String {
    let width = usize::from(buffer.area.width).max(1);
    let mut text = String::new();
    for row in buffer.content().chunks(width) {
        let mut skip = 0;
        for cell in row {
            if skip > 0 {
                skip -= 1;
                continue;
            }
            let symbol = cell.symbol();
            skip = symbol.width().saturating_sub(1);
            text.push_str(symbol);
        }
        text.push('\n');
    }
    text
}
