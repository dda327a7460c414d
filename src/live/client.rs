// Live session transport
//
// One WebSocket per session. The setup message is sent as the first frame
// right after the socket opens; audio frames are fire-and-forget while the
// connection reports open; inbound messages are parsed leniently so one
// malformed message never takes down the receive path.

use anyhow::{Context, Result};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use super::messages::{RealtimeInputMessage, ServerMessage, SetupMessage, Voice};

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// Connection lifecycle as seen by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Transport endpoint configuration (rates and credentials live elsewhere).
#[derive(Debug, Clone)]
pub struct LiveConfig {
    /// WebSocket URL of the live service
    pub url: String,
    /// Target model name declared in the setup message
    pub model: String,
}

/// Sending half of a live session.
pub struct LiveClient {
    sink: WsSink,
    open: Arc<AtomicBool>,
}

/// Receiving half of a live session.
pub struct LiveReceiver {
    source: WsSource,
    open: Arc<AtomicBool>,
}

/// Open the socket and perform the handshake.
///
/// The setup message is the first and only message sent before any audio.
/// The access key is passed as a query parameter and held nowhere else.
pub async fn connect(
    config: &LiveConfig,
    api_key: &str,
    voice: Voice,
    system_instruction: &str,
) -> Result<(LiveClient, LiveReceiver)> {
    let url = format!("{}?key={}", config.url, api_key);

    info!("Connecting to live service at {}", config.url);

    let (stream, _response) = tokio_tungstenite::connect_async(url)
        .await
        .context("Failed to open live session socket")?;

    let (mut sink, source) = stream.split();

    let setup = SetupMessage::new(&config.model, voice, system_instruction);
    let payload = serde_json::to_string(&setup)?;
    sink.send(Message::Text(payload))
        .await
        .context("Failed to send setup message")?;

    info!("Live session connected (model {})", config.model);

    let open = Arc::new(AtomicBool::new(true));

    Ok((
        LiveClient {
            sink,
            open: Arc::clone(&open),
        },
        LiveReceiver { source, open },
    ))
}

impl LiveClient {
    /// Whether the socket is believed open. Capture frames are dropped, not
    /// buffered, while this is false.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Send one base64 PCM16 frame, fire-and-forget.
    ///
    /// A no-op when the connection is not open. A send failure is logged and
    /// marks the connection closed; it does not propagate.
    pub async fn send_audio(&mut self, base64_pcm: String) -> Result<()> {
        if !self.is_open() {
            return Ok(());
        }

        let message = RealtimeInputMessage::audio(base64_pcm);
        let payload = serde_json::to_string(&message)?;

        if let Err(e) = self.sink.send(Message::Text(payload)).await {
            warn!("Audio send failed, marking connection closed: {}", e);
            self.open.store(false, Ordering::SeqCst);
        }

        Ok(())
    }

    /// Close the socket. Idempotent.
    pub async fn close(&mut self) {
        if self.open.swap(false, Ordering::SeqCst) {
            info!("Closing live session socket");
            if let Err(e) = self.sink.send(Message::Close(None)).await {
                debug!("Close frame not delivered: {}", e);
            }
        }
    }
}

impl LiveReceiver {
    /// Next parsed message from the service, or `None` once the socket is
    /// closed by either side.
    ///
    /// Malformed messages are dropped with a warning; socket-level errors are
    /// logged but do not end the session by themselves.
    pub async fn next_message(&mut self) -> Option<ServerMessage> {
        loop {
            match self.source.next().await {
                Some(Ok(Message::Text(text))) => match serde_json::from_str(&text) {
                    Ok(message) => return Some(message),
                    Err(e) => warn!("Ignoring malformed message: {}", e),
                },
                Some(Ok(Message::Binary(bytes))) => match serde_json::from_slice(&bytes) {
                    Ok(message) => return Some(message),
                    Err(e) => warn!("Ignoring malformed binary message: {}", e),
                },
                Some(Ok(Message::Close(_))) => {
                    info!("Live session closed by remote");
                    self.open.store(false, Ordering::SeqCst);
                    return None;
                }
                Some(Ok(_)) => {
                    // Ping/pong frames are handled by the library
                }
                Some(Err(e)) => {
                    error!("Live socket error: {}", e);
                }
                None => {
                    self.open.store(false, Ordering::SeqCst);
                    return None;
                }
            }
        }
    }
}
