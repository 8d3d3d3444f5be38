//! Operation persistence boundary.
//!
//! The relay persists every chat operation before fanning it out, and the
//! HTTP surface serves room administration and log fetches from the same
//! store. `MemoryStore` is the in-process implementation; swapping in a
//! database means implementing [`OperationStore`] elsewhere.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("room not found: {0}")]
    RoomNotFound(i64),
    #[error("slug not found: {0}")]
    SlugNotFound(String),
    #[error("slug already taken: {0}")]
    SlugTaken(String),
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// A room known to the store.
#[derive(Debug, Clone, Serialize)]
pub struct RoomRecord {
    pub id: i64,
    pub slug: String,
}

/// One persisted chat operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMessage {
    pub id: i64,
    pub room_id: i64,
    /// Serialized shape payload, exactly as received.
    pub message: String,
    pub author_id: String,
}

/// Async persistence boundary for rooms and their operation logs.
#[async_trait]
pub trait OperationStore: Send + Sync {
    /// Persist one operation; returns the assigned record id.
    async fn append(
        &self,
        room_id: i64,
        message: &str,
        author_id: &str,
    ) -> Result<i64, StorageError>;

    /// The room's full log in persisted order.
    async fn fetch_log(&self, room_id: i64) -> Result<Vec<StoredMessage>, StorageError>;

    /// Drop the room's log, keeping the room itself.
    async fn clear_room(&self, room_id: i64) -> Result<(), StorageError>;

    async fn create_room(&self, slug: &str) -> Result<RoomRecord, StorageError>;

    async fn resolve_slug(&self, slug: &str) -> Result<RoomRecord, StorageError>;

    async fn delete_room(&self, room_id: i64) -> Result<(), StorageError>;
}

/// In-memory store used by the default assembly and the test suite.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    rooms: HashMap<i64, RoomRecord>,
    logs: HashMap<i64, Vec<StoredMessage>>,
    next_room_id: i64,
    next_message_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a room with a known id, for assembling fixtures.
    pub async fn seed_room(&self, id: i64, slug: &str) {
        let mut inner = self.inner.write().await;
        inner.rooms.insert(
            id,
            RoomRecord {
                id,
                slug: slug.to_string(),
            },
        );
        inner.next_room_id = inner.next_room_id.max(id + 1);
    }
}

#[async_trait]
impl OperationStore for MemoryStore {
    async fn append(
        &self,
        room_id: i64,
        message: &str,
        author_id: &str,
    ) -> Result<i64, StorageError> {
        let mut inner = self.inner.write().await;
        if !inner.rooms.contains_key(&room_id) {
            return Err(StorageError::RoomNotFound(room_id));
        }
        inner.next_message_id += 1;
        let id = inner.next_message_id;
        inner.logs.entry(room_id).or_default().push(StoredMessage {
            id,
            room_id,
            message: message.to_string(),
            author_id: author_id.to_string(),
        });
        Ok(id)
    }

    async fn fetch_log(&self, room_id: i64) -> Result<Vec<StoredMessage>, StorageError> {
        let inner = self.inner.read().await;
        if !inner.rooms.contains_key(&room_id) {
            return Err(StorageError::RoomNotFound(room_id));
        }
        Ok(inner.logs.get(&room_id).cloned().unwrap_or_default())
    }

    async fn clear_room(&self, room_id: i64) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;
        if !inner.rooms.contains_key(&room_id) {
            return Err(StorageError::RoomNotFound(room_id));
        }
        inner.logs.remove(&room_id);
        Ok(())
    }

    async fn create_room(&self, slug: &str) -> Result<RoomRecord, StorageError> {
        let mut inner = self.inner.write().await;
        if inner.rooms.values().any(|r| r.slug == slug) {
            return Err(StorageError::SlugTaken(slug.to_string()));
        }
        inner.next_room_id += 1;
        let record = RoomRecord {
            id: inner.next_room_id,
            slug: slug.to_string(),
        };
        inner.rooms.insert(record.id, record.clone());
        Ok(record)
    }

    async fn resolve_slug(&self, slug: &str) -> Result<RoomRecord, StorageError> {
        let inner = self.inner.read().await;
        inner
            .rooms
            .values()
            .find(|r| r.slug == slug)
            .cloned()
            .ok_or_else(|| StorageError::SlugNotFound(slug.to_string()))
    }

    async fn delete_room(&self, room_id: i64) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;
        inner
            .rooms
            .remove(&room_id)
            .ok_or(StorageError::RoomNotFound(room_id))?;
        inner.logs.remove(&room_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_preserves_order_and_ids() {
        let store = MemoryStore::new();
        let room = store.create_room("studio").await.unwrap();

        store.append(room.id, "{\"a\":1}", "alice").await.unwrap();
        store.append(room.id, "{\"b\":2}", "bob").await.unwrap();

        let log = store.fetch_log(room.id).await.unwrap();
        assert_eq!(log.len(), 2);
        assert!(log[0].id < log[1].id);
        assert_eq!(log[0].author_id, "alice");
        assert_eq!(log[1].message, "{\"b\":2}");
    }

    #[tokio::test]
    async fn test_append_to_unknown_room_fails() {
        let store = MemoryStore::new();
        let err = store.append(404, "{}", "alice").await.unwrap_err();
        assert!(matches!(err, StorageError::RoomNotFound(404)));
    }

    #[tokio::test]
    async fn test_clear_room_empties_log_keeps_room() {
        let store = MemoryStore::new();
        let room = store.create_room("studio").await.unwrap();
        store.append(room.id, "{}", "alice").await.unwrap();

        store.clear_room(room.id).await.unwrap();

        assert!(store.fetch_log(room.id).await.unwrap().is_empty());
        assert_eq!(store.resolve_slug("studio").await.unwrap().id, room.id);
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let store = MemoryStore::new();
        store.create_room("studio").await.unwrap();
        let err = store.create_room("studio").await.unwrap_err();
        assert!(matches!(err, StorageError::SlugTaken(_)));
    }

    #[tokio::test]
    async fn test_delete_room_drops_log() {
        let store = MemoryStore::new();
        let room = store.create_room("studio").await.unwrap();
        store.append(room.id, "{}", "alice").await.unwrap();

        store.delete_room(room.id).await.unwrap();

        assert!(matches!(
            store.fetch_log(room.id).await,
            Err(StorageError::RoomNotFound(_))
        ));
        assert!(store.resolve_slug("studio").await.is_err());
    }
}
