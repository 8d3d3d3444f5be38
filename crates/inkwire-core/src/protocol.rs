//! Wire envelopes exchanged with the relay.

use crate::shapes::Shape;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Messages sent to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEnvelope {
    /// Join a room's fan-out set.
    JoinRoom {
        #[serde(rename = "roomId")]
        room_id: i64,
    },
    /// Leave a room's fan-out set.
    LeaveRoom {
        #[serde(rename = "roomId")]
        room_id: i64,
    },
    /// A committed shape operation for a room.
    Chat {
        #[serde(rename = "roomId")]
        room_id: i64,
        message: Shape,
    },
}

/// Messages received from the relay.
///
/// The chat payload stays a raw [`Value`] here; the scene model owns the
/// decode-or-drop decision for remote shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEnvelope {
    /// Fan-out of another member's committed operation.
    Chat {
        #[serde(rename = "roomId")]
        room_id: i64,
        message: Value,
    },
    /// Passthrough of the image-analysis collaborator's output.
    Ai { message: String },
}
