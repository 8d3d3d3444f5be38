//! Canvas session: one room view wired end to end.
//!
//! Owns the scene, the gesture translator, the frame scheduler and the
//! relay transport, and routes input events between them. Hosts feed it
//! raw pointer/keyboard events and drive two clocks: the caret blink
//! interval and the display refresh tick.

use crate::gesture::{
    DrawMode, GestureOutcome, GestureTranslator, PointerButton, TextKey,
};
use crate::history::{load_history, HistoryError, RoomDirectory};
use crate::render::{render, DisplayList, FrameScheduler};
use crate::scene::Scene;
use crate::shapes::Shape;
use crate::transport::{Transport, TransportEvent};
use kurbo::Point;

/// Notifications surfaced to the host from [`CanvasSession::poll`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Connected,
    Disconnected,
    /// Image-analysis output to show in the host's side panel.
    AiResponse(String),
    TransportError(String),
}

/// A live drawing surface bound to one room.
pub struct CanvasSession {
    pub scene: Scene,
    pub translator: GestureTranslator,
    scheduler: FrameScheduler,
    transport: Transport,
    room_id: Option<i64>,
}

impl CanvasSession {
    pub fn new(transport: Transport) -> Self {
        Self {
            scene: Scene::new(),
            translator: GestureTranslator::new(),
            scheduler: FrameScheduler::new(),
            transport,
            room_id: None,
        }
    }

    /// The joined room, once history replay has completed.
    pub fn room_id(&self) -> Option<i64> {
        self.room_id
    }

    /// Whether the session accepts gestures. False until [`Self::open_room`]
    /// has replayed the room's history.
    pub fn is_ready(&self) -> bool {
        self.room_id.is_some()
    }

    /// Resolve the room, join it and replay its persisted log into the
    /// scene. Gestures are refused until this has succeeded.
    pub fn open_room(
        &mut self,
        directory: &dyn RoomDirectory,
        slug: &str,
    ) -> Result<i64, HistoryError> {
        let room_id = load_history(directory, slug, &mut self.scene, &self.transport)?;
        self.room_id = Some(room_id);
        self.scheduler.request();
        Ok(room_id)
    }

    pub fn set_mode(&mut self, mode: DrawMode) {
        let outcome = self.translator.set_mode(mode);
        self.absorb(outcome);
    }

    pub fn set_stroke_color(&mut self, color: impl Into<String>) {
        self.translator.settings.stroke_color = color.into();
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.translator.settings.stroke_width = width;
    }

    /// Cancel any in-progress gesture (pointer left the surface).
    pub fn abort_gesture(&mut self) {
        let outcome = self.translator.abort();
        self.absorb(outcome);
    }

    pub fn pointer_down(&mut self, screen: Point, button: PointerButton) {
        if !self.is_ready() {
            return;
        }
        let outcome = self
            .translator
            .pointer_down(screen, button, &self.scene.camera);
        self.absorb(outcome);
    }

    pub fn pointer_move(&mut self, screen: Point) {
        if !self.is_ready() {
            return;
        }
        let outcome = self.translator.pointer_move(screen, &mut self.scene.camera);
        self.absorb(outcome);
    }

    pub fn pointer_up(&mut self, screen: Point, button: PointerButton) {
        if !self.is_ready() {
            return;
        }
        let outcome = self
            .translator
            .pointer_up(screen, button, &self.scene.camera);
        self.absorb(outcome);
    }

    pub fn wheel(&mut self, screen: Point, delta_y: f64) {
        if !self.is_ready() {
            return;
        }
        let outcome = self
            .translator
            .wheel(screen, delta_y, &mut self.scene.camera);
        self.absorb(outcome);
    }

    pub fn double_click(&mut self, screen: Point) {
        if !self.is_ready() {
            return;
        }
        let outcome = self.translator.double_click(screen, &self.scene.camera);
        self.absorb(outcome);
    }

    pub fn key(&mut self, key: TextKey) {
        if !self.is_ready() {
            return;
        }
        let outcome = self.translator.key(key);
        self.absorb(outcome);
    }

    /// Caret blink tick, driven by the host every [`crate::gesture::CARET_BLINK_MS`].
    pub fn tick_caret(&mut self) {
        let outcome = self.translator.tick_caret();
        self.absorb(outcome);
    }

    /// Drain transport events: append peer shapes for this room and hand
    /// everything else back to the host.
    pub fn poll(&mut self) -> Vec<SessionEvent> {
        let mut out = Vec::new();
        for event in self.transport.poll_events() {
            match event {
                TransportEvent::ShapeReceived { room_id, message } => {
                    if Some(room_id) == self.room_id {
                        self.scene.apply_remote(message);
                        self.scheduler.request();
                    } else {
                        log::debug!("dropping shape for unjoined room {room_id}");
                    }
                }
                TransportEvent::AiResponse { message } => {
                    out.push(SessionEvent::AiResponse(message));
                }
                TransportEvent::Connected => out.push(SessionEvent::Connected),
                TransportEvent::Disconnected => out.push(SessionEvent::Disconnected),
                TransportEvent::Error { message } => {
                    out.push(SessionEvent::TransportError(message));
                }
            }
        }
        out
    }

    /// Display refresh tick. Produces a display list only when a redraw is
    /// owed; the scheduler has already coalesced intermediate requests.
    pub fn frame(&mut self) -> Option<DisplayList> {
        let owed = self.scheduler.take() | self.scene.take_dirty();
        if !owed {
            return None;
        }
        Some(render(&self.scene, &self.translator))
    }

    fn absorb(&mut self, outcome: GestureOutcome) {
        match outcome {
            GestureOutcome::None => {}
            GestureOutcome::Redraw => {
                self.scheduler.request();
            }
            GestureOutcome::Commit(shape) => self.commit(shape),
        }
    }

    /// Local-echo commit: append to the scene immediately, then broadcast.
    /// Send failures never roll the local append back.
    fn commit(&mut self, shape: Shape) {
        let committed = self.scene.commit_local(shape).clone();
        self.scheduler.request();
        if let Some(room_id) = self.room_id {
            if let Err(err) = self.transport.send_shape(room_id, &committed) {
                log::error!("broadcast failed, shape kept locally: {err}");
            }
        }
    }
}
