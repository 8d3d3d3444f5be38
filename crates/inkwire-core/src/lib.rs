//! Inkwire Core Library
//!
//! Platform-agnostic scene model, gesture translation, rendering and relay
//! transport for the Inkwire collaborative drawing surface.

pub mod camera;
pub mod gesture;
pub mod history;
pub mod protocol;
pub mod render;
pub mod scene;
pub mod session;
pub mod shapes;
pub mod transport;

pub use camera::Camera;
pub use gesture::{
    DrawMode, Gesture, GestureOutcome, GestureTranslator, PointerButton, StrokeSettings,
    TextKey, CARET_BLINK_MS,
};
pub use history::{load_history, HistoryError, LogRecord, RoomDirectory, RoomJoiner};
pub use protocol::{ClientEnvelope, ServerEnvelope};
pub use render::{render, Blend, DisplayList, DrawOp, FrameScheduler, Rgba};
pub use scene::Scene;
pub use session::{CanvasSession, SessionEvent};
pub use shapes::Shape;
pub use transport::{ConnectionState, Transport, TransportError, TransportEvent};
