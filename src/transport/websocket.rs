use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::time::{Instant, sleep_until, timeout_at};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use super::{Outbound, Transport, TransportError, TransportEvent};

/// How long to wait for the peer to answer our close frame before giving up.
pub const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// WebSocket client transport. Framing, masking and ping replies are left
/// to `tokio-tungstenite`.
#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    close_timeout: Duration,
}

impl WebSocketTransport {
    pub fn new() -> Self {
        Self {
            close_timeout: CLOSE_TIMEOUT,
        }
    }

    pub fn with_close_timeout(mut self, close_timeout: Duration) -> Self {
        self.close_timeout = close_timeout;
        self
    }
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    fn name(&self) -> &str {
        "websocket"
    }

    async fn run(
        &self,
        url: &str,
        mut outbound: Receiver<Outbound>,
        events: Sender<TransportEvent>,
    ) -> Result<(), TransportError> {
        let (ws_stream, _) = connect_async(url)
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        info!("[websocket] connected to {}", url);

        events
            .send(TransportEvent::Opened)
            .await
            .map_err(|_| TransportError::ChannelClosed)?;

        let (mut write, mut read) = ws_stream.split();
        // Set once a close is sent; outbound text is no longer accepted after that
        let mut close_deadline: Option<Instant> = None;

        loop {
            tokio::select! {
                request = outbound.recv(), if close_deadline.is_none() => {
                    match request {
                        Some(Outbound::Text(text)) => {
                            debug!("[websocket] sending {} bytes", text.len());
                            write
                                .send(WsMessage::Text(text))
                                .await
                                .map_err(|e| TransportError::Socket(e.to_string()))?;
                        }
                        // Sender dropped counts as a close request
                        Some(Outbound::Close) | None => {
                            info!("[websocket] closing {}", url);
                            let deadline = Instant::now() + self.close_timeout;
                            close_deadline = Some(deadline);
                            let sent =
                                timeout_at(deadline, write.send(WsMessage::Close(None))).await;
                            match sent {
                                Ok(result) => {
                                    result.map_err(|e| TransportError::Socket(e.to_string()))?
                                }
                                Err(_) => return Err(close_timed_out(url)),
                            }
                        }
                    }
                }
                () = wait_for(close_deadline), if close_deadline.is_some() => {
                    return Err(close_timed_out(url));
                }
                incoming = read.next() => {
                    let text = match incoming {
                        Some(Ok(WsMessage::Text(t))) => t,
                        Some(Ok(WsMessage::Binary(bytes))) => {
                            String::from_utf8_lossy(&bytes).into_owned()
                        }
                        Some(Ok(WsMessage::Close(frame))) => {
                            info!("[websocket] peer closed: {:?}", frame);
                            break;
                        }
                        Some(Ok(_)) => continue, // ping/pong/raw frames
                        Some(Err(e)) => return Err(TransportError::Socket(e.to_string())),
                        None => break,
                    };
                    events
                        .send(TransportEvent::Message(text))
                        .await
                        .map_err(|_| TransportError::ChannelClosed)?;
                }
            }
        }

        Ok(())
    }
}

fn close_timed_out(url: &str) -> TransportError {
    warn!("[websocket] no close reply from {}", url);
    TransportError::Socket(String::from("close handshake timed out"))
}

/// Resolves at `deadline`, or never when there is none.
async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
