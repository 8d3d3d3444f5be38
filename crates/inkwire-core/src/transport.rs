//! WebSocket transport client.
//!
//! One persistent duplex connection per active room view, run on a
//! background thread and polled from the single-threaded client loop.
//! There is no automatic reconnection: a dropped connection requires the
//! owning view to connect again and re-run history replay.

use crate::protocol::{ClientEnvelope, ServerEnvelope};
use crate::shapes::Shape;
use serde_json::Value;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;
use tungstenite::{connect, Message};
use url::Url;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid relay url: {0}")]
    InvalidUrl(String),
    #[error("already connected")]
    AlreadyConnected,
    #[error("not connected")]
    NotConnected,
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Connection state as last observed via polled events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Events drained by the owning view each frame.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    Connected,
    Disconnected,
    /// Fan-out of a peer's committed operation. The payload is raw; the
    /// scene decides whether it decodes as a shape.
    ShapeReceived { room_id: i64, message: Value },
    /// Passthrough from the image-analysis collaborator.
    AiResponse { message: String },
    Error { message: String },
}

/// Commands sent to the WebSocket thread.
enum WsCommand {
    Send(String),
    Close,
}

/// Duplex relay connection polled from the client event loop.
pub struct Transport {
    state: ConnectionState,
    events: Vec<TransportEvent>,
    cmd_tx: Option<Sender<WsCommand>>,
    event_rx: Option<Receiver<TransportEvent>>,
    _thread: Option<JoinHandle<()>>,
}

impl Transport {
    /// Create a new disconnected transport.
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            events: Vec::new(),
            cmd_tx: None,
            event_rx: None,
            _thread: None,
        }
    }

    /// Connect to the relay, presenting the opaque bearer token in the
    /// connection URI.
    pub fn connect(&mut self, url: &str, token: &str) -> Result<(), TransportError> {
        if self.cmd_tx.is_some() {
            return Err(TransportError::AlreadyConnected);
        }

        let mut parsed =
            Url::parse(url).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        if parsed.scheme() != "ws" && parsed.scheme() != "wss" {
            return Err(TransportError::InvalidUrl(format!(
                "unsupported scheme: {}",
                parsed.scheme()
            )));
        }
        parsed.query_pairs_mut().append_pair("token", token);

        self.state = ConnectionState::Connecting;

        let (cmd_tx, cmd_rx) = channel::<WsCommand>();
        let (event_tx, event_rx) = channel::<TransportEvent>();
        let url = parsed.to_string();

        let handle = thread::spawn(move || run_socket_thread(&url, cmd_rx, event_tx));

        self.cmd_tx = Some(cmd_tx);
        self.event_rx = Some(event_rx);
        self._thread = Some(handle);
        Ok(())
    }

    /// Close the connection.
    pub fn disconnect(&mut self) {
        if let Some(tx) = self.cmd_tx.take() {
            let _ = tx.send(WsCommand::Close);
        }
        self.event_rx = None;
        self._thread = None;
        self.state = ConnectionState::Disconnected;
    }

    /// Send a join operation for a room.
    pub fn join(&self, room_id: i64) -> Result<(), TransportError> {
        self.send_envelope(&ClientEnvelope::JoinRoom { room_id })
    }

    /// Send a leave operation for a room.
    pub fn leave(&self, room_id: i64) -> Result<(), TransportError> {
        self.send_envelope(&ClientEnvelope::LeaveRoom { room_id })
    }

    /// Broadcast a locally committed shape to the room.
    pub fn send_shape(&self, room_id: i64, shape: &Shape) -> Result<(), TransportError> {
        self.send_envelope(&ClientEnvelope::Chat {
            room_id,
            message: shape.clone(),
        })
    }

    fn send_envelope(&self, envelope: &ClientEnvelope) -> Result<(), TransportError> {
        let tx = self.cmd_tx.as_ref().ok_or(TransportError::NotConnected)?;
        let json = serde_json::to_string(envelope)
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;
        tx.send(WsCommand::Send(json))
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    /// Drain pending events (non-blocking).
    pub fn poll_events(&mut self) -> Vec<TransportEvent> {
        if let Some(ref rx) = self.event_rx {
            while let Ok(event) = rx.try_recv() {
                match &event {
                    TransportEvent::Connected => self.state = ConnectionState::Connected,
                    TransportEvent::Disconnected => self.state = ConnectionState::Disconnected,
                    TransportEvent::Error { .. } => self.state = ConnectionState::Error,
                    _ => {}
                }
                self.events.push(event);
            }
        }
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn run_socket_thread(url: &str, cmd_rx: Receiver<WsCommand>, event_tx: Sender<TransportEvent>) {
    log::info!("transport thread: connecting to relay");

    let (mut socket, response) = match connect(url) {
        Ok(pair) => pair,
        Err(e) => {
            log::error!("relay connection failed: {e}");
            let _ = event_tx.send(TransportEvent::Error {
                message: format!("connection failed: {e}"),
            });
            return;
        }
    };
    log::info!("relay connected, status: {}", response.status());
    let _ = event_tx.send(TransportEvent::Connected);

    // Short read timeout keeps the loop responsive to outgoing commands.
    if let tungstenite::stream::MaybeTlsStream::Plain(tcp) = socket.get_mut() {
        let _ = tcp.set_read_timeout(Some(Duration::from_millis(50)));
        let _ = tcp.set_write_timeout(Some(Duration::from_secs(5)));
    }

    loop {
        match cmd_rx.try_recv() {
            Ok(WsCommand::Send(msg)) => {
                if let Err(e) = socket.send(Message::Text(msg)) {
                    log::error!("relay send error: {e}");
                    break;
                }
            }
            Ok(WsCommand::Close) | Err(TryRecvError::Disconnected) => {
                let _ = socket.close(None);
                break;
            }
            Err(TryRecvError::Empty) => {}
        }

        match socket.read() {
            Ok(Message::Text(text)) => {
                if let Some(event) = decode_inbound(&text) {
                    let _ = event_tx.send(event);
                }
            }
            Ok(Message::Ping(data)) => {
                let _ = socket.send(Message::Pong(data));
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(tungstenite::Error::Io(ref e))
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                continue;
            }
            Err(e) => {
                log::error!("relay read error: {e}");
                break;
            }
        }
    }

    let _ = event_tx.send(TransportEvent::Disconnected);
}

/// Decode one inbound frame. Unknown or malformed envelopes are ignored
/// with a log line, per the protocol's tolerance rule.
fn decode_inbound(text: &str) -> Option<TransportEvent> {
    match serde_json::from_str::<ServerEnvelope>(text) {
        Ok(ServerEnvelope::Chat { room_id, message }) => {
            Some(TransportEvent::ShapeReceived { room_id, message })
        }
        Ok(ServerEnvelope::Ai { message }) => Some(TransportEvent::AiResponse { message }),
        Err(err) => {
            log::warn!("ignoring unrecognized relay frame: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_chat_frame() {
        let event = decode_inbound(
            r#"{"type":"chat","roomId":3,"message":{"type":"eraser","points":[],"size":20}}"#,
        );
        match event {
            Some(TransportEvent::ShapeReceived { room_id, message }) => {
                assert_eq!(room_id, 3);
                assert_eq!(message["type"], "eraser");
            }
            other => panic!("expected shape event, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_ai_frame() {
        let event = decode_inbound(r#"{"type":"ai","message":"two boxes"}"#);
        assert!(matches!(event, Some(TransportEvent::AiResponse { .. })));
    }

    #[test]
    fn test_unknown_and_malformed_frames_ignored() {
        assert!(decode_inbound(r#"{"type":"presence","who":"peer"}"#).is_none());
        assert!(decode_inbound("not json at all").is_none());
        assert!(decode_inbound(r#"{"roomId":1}"#).is_none());
    }

    #[test]
    fn test_received_chat_grows_peer_scene() {
        let mut scene = crate::scene::Scene::new();
        let frame = r##"{"type":"chat","roomId":42,"message":{"type":"rectangle","x":10,"y":10,"width":100,"height":50,"strokeColor":"#ffffff","strokeWidth":3}}"##;
        let Some(TransportEvent::ShapeReceived { room_id, message }) = decode_inbound(frame)
        else {
            panic!("expected shape event");
        };
        assert_eq!(room_id, 42);
        scene.apply_remote(message);
        assert_eq!(scene.len(), 1);
        match &scene.shapes()[0] {
            Shape::Rectangle(r) => {
                assert!((r.x - 10.0).abs() < f64::EPSILON);
                assert!((r.width - 100.0).abs() < f64::EPSILON);
                assert_eq!(r.stroke_color, "#ffffff");
            }
            other => panic!("expected rectangle, got {other:?}"),
        }
    }

    #[test]
    fn test_send_without_connection_fails() {
        let transport = Transport::new();
        assert!(matches!(
            transport.join(1),
            Err(TransportError::NotConnected)
        ));
    }
}
