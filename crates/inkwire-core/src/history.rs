//! History replay on scene initialization.
//!
//! Before a view accepts gestures or drains live transport events, the
//! room's persisted operation log is fetched and replayed into the scene
//! in persisted order.

use crate::scene::Scene;
use crate::transport::{Transport, TransportError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("room not found: {0}")]
    RoomNotFound(String),
    #[error("history fetch failed: {0}")]
    FetchFailed(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// One persisted operation record.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub id: i64,
    /// Serialized shape payload, as persisted by the relay.
    pub message: String,
}

/// External collaborator resolving rooms and serving persisted logs.
pub trait RoomDirectory {
    fn resolve_room_id(&self, slug: &str) -> Result<i64, HistoryError>;
    fn fetch_room_log(&self, room_id: i64) -> Result<Vec<LogRecord>, HistoryError>;
}

/// The join capability the loader needs from the transport.
pub trait RoomJoiner {
    fn join(&self, room_id: i64) -> Result<(), TransportError>;
}

impl RoomJoiner for Transport {
    fn join(&self, room_id: i64) -> Result<(), TransportError> {
        Transport::join(self, room_id)
    }
}

/// Resolve a room slug, join the room, and replay its persisted log into
/// the scene. Returns the numeric room id for subsequent sends.
///
/// Records whose payload does not decode as a shape are skipped with a log
/// line; replay order is the persisted order. Must run to completion before
/// live events are processed.
pub fn load_history(
    directory: &dyn RoomDirectory,
    slug: &str,
    scene: &mut Scene,
    joiner: &dyn RoomJoiner,
) -> Result<i64, HistoryError> {
    let room_id = directory.resolve_room_id(slug)?;
    joiner.join(room_id)?;

    let records = directory.fetch_room_log(room_id)?;
    for record in records {
        match serde_json::from_str(&record.message) {
            Ok(payload) => scene.apply_remote(payload),
            Err(err) => {
                log::warn!("skipping undecodable history record {}: {err}", record.id);
            }
        }
    }
    Ok(room_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Shape;
    use std::cell::RefCell;
    use std::collections::HashMap;

    struct FakeDirectory {
        rooms: HashMap<String, i64>,
        logs: HashMap<i64, Vec<LogRecord>>,
    }

    impl RoomDirectory for FakeDirectory {
        fn resolve_room_id(&self, slug: &str) -> Result<i64, HistoryError> {
            self.rooms
                .get(slug)
                .copied()
                .ok_or_else(|| HistoryError::RoomNotFound(slug.to_string()))
        }

        fn fetch_room_log(&self, room_id: i64) -> Result<Vec<LogRecord>, HistoryError> {
            Ok(self.logs.get(&room_id).cloned().unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct RecordingJoiner {
        joined: RefCell<Vec<i64>>,
    }

    impl RoomJoiner for RecordingJoiner {
        fn join(&self, room_id: i64) -> Result<(), TransportError> {
            self.joined.borrow_mut().push(room_id);
            Ok(())
        }
    }

    fn directory_with_two_records() -> FakeDirectory {
        let mut rooms = HashMap::new();
        rooms.insert("sketch-7".to_string(), 7);
        let mut logs = HashMap::new();
        logs.insert(
            7,
            vec![
                LogRecord {
                    id: 1,
                    message: r##"{"type":"rectangle","x":0,"y":0,"width":10,"height":10,"strokeColor":"#fff","strokeWidth":1}"##.to_string(),
                },
                LogRecord {
                    id: 2,
                    message: r##"{"type":"line","x1":0,"y1":0,"x2":5,"y2":5,"strokeColor":"#fff","strokeWidth":1}"##.to_string(),
                },
            ],
        );
        FakeDirectory { rooms, logs }
    }

    #[test]
    fn test_joins_then_replays_in_persisted_order() {
        let directory = directory_with_two_records();
        let joiner = RecordingJoiner::default();
        let mut scene = Scene::new();

        let room_id = load_history(&directory, "sketch-7", &mut scene, &joiner).unwrap();

        assert_eq!(room_id, 7);
        assert_eq!(*joiner.joined.borrow(), vec![7]);
        assert_eq!(scene.len(), 2);
        assert!(matches!(scene.shapes()[0], Shape::Rectangle(_)));
        assert!(matches!(scene.shapes()[1], Shape::Line(_)));
    }

    #[test]
    fn test_unknown_slug_fails_before_join() {
        let directory = directory_with_two_records();
        let joiner = RecordingJoiner::default();
        let mut scene = Scene::new();

        let result = load_history(&directory, "nope", &mut scene, &joiner);

        assert!(matches!(result, Err(HistoryError::RoomNotFound(_))));
        assert!(joiner.joined.borrow().is_empty());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_empty_log_leaves_scene_empty() {
        let mut directory = directory_with_two_records();
        directory.rooms.insert("blank".to_string(), 42);
        let joiner = RecordingJoiner::default();
        let mut scene = Scene::new();

        let room_id = load_history(&directory, "blank", &mut scene, &joiner).unwrap();

        assert_eq!(room_id, 42);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_undecodable_record_skipped() {
        let mut directory = directory_with_two_records();
        directory.logs.get_mut(&7).unwrap().insert(
            0,
            LogRecord {
                id: 0,
                message: "{broken".to_string(),
            },
        );
        let joiner = RecordingJoiner::default();
        let mut scene = Scene::new();

        load_history(&directory, "sketch-7", &mut scene, &joiner).unwrap();

        // The broken record is dropped; the two good ones replay in order.
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_join_failure_aborts_replay() {
        struct FailingJoiner;
        impl RoomJoiner for FailingJoiner {
            fn join(&self, _room_id: i64) -> Result<(), TransportError> {
                Err(TransportError::NotConnected)
            }
        }

        let directory = directory_with_two_records();
        let mut scene = Scene::new();
        let result = load_history(&directory, "sketch-7", &mut scene, &FailingJoiner);

        assert!(matches!(result, Err(HistoryError::Transport(_))));
        assert!(scene.is_empty());
    }
}
