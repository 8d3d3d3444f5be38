//! Relay wire envelopes.
//!
//! The chat payload is carried as a raw [`Value`]: the relay persists and
//! forwards it without interpreting shape geometry.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Frames received from clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEnvelope {
    JoinRoom {
        #[serde(rename = "roomId")]
        room_id: i64,
    },
    LeaveRoom {
        #[serde(rename = "roomId")]
        room_id: i64,
    },
    Chat {
        #[serde(rename = "roomId")]
        room_id: i64,
        message: Value,
    },
}

/// Frames sent to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEnvelope {
    Chat {
        #[serde(rename = "roomId")]
        room_id: i64,
        message: Value,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_room_parses() {
        let envelope: ClientEnvelope =
            serde_json::from_str(r#"{"type":"join_room","roomId":5}"#).unwrap();
        assert!(matches!(envelope, ClientEnvelope::JoinRoom { room_id: 5 }));
    }

    #[test]
    fn test_chat_payload_stays_opaque() {
        let envelope: ClientEnvelope = serde_json::from_str(
            r#"{"type":"chat","roomId":2,"message":{"type":"hexagon","sides":6}}"#,
        )
        .unwrap();
        // Even a shape kind no client understands passes through untouched.
        match envelope {
            ClientEnvelope::Chat { room_id, message } => {
                assert_eq!(room_id, 2);
                assert_eq!(message, json!({"type": "hexagon", "sides": 6}));
            }
            other => panic!("expected chat, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_fails_parse() {
        assert!(serde_json::from_str::<ClientEnvelope>(r#"{"type":"presence"}"#).is_err());
    }
}
