//! Inkwire WebSocket Relay Server
//!
//! Relays committed shape operations between clients in the same room,
//! persisting each operation before fanning it out. Rooms and their logs
//! live behind the [`storage::OperationStore`] boundary; membership and
//! delivery live in the [`router::RoomRouter`].

pub mod auth;
pub mod connection;
pub mod envelope;
pub mod router;
pub mod routes;
pub mod storage;

use auth::TokenVerifier;
use router::RoomRouter;
use std::sync::Arc;
use storage::OperationStore;

/// Shared application state handed to every connection task and route.
pub struct AppState {
    pub router: RoomRouter,
    pub store: Arc<dyn OperationStore>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn OperationStore>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            router: RoomRouter::new(),
            store,
            verifier,
        }
    }
}
