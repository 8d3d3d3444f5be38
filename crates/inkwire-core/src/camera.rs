//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Scale change per wheel unit.
pub const ZOOM_INTENSITY: f64 = 0.001;

/// Camera manages the view transform for the drawing surface.
///
/// It handles panning (translation) and zooming (scaling), converting
/// between screen coordinates and world coordinates. Scale is always
/// clamped to `[min_scale, max_scale]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan).
    pub offset: Vec2,
    /// Current zoom level.
    pub scale: f64,
    /// Minimum allowed zoom level.
    pub min_scale: f64,
    /// Maximum allowed zoom level.
    pub max_scale: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
            min_scale: 0.4,
            max_scale: 1.0,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Affine transform converting world coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        Point::new(
            (screen_point.x - self.offset.x) / self.scale,
            (screen_point.y - self.offset.y) / self.scale,
        )
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        Point::new(
            world_point.x * self.scale + self.offset.x,
            world_point.y * self.scale + self.offset.y,
        )
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Apply a wheel zoom step, keeping the world point under the cursor
    /// fixed on screen.
    ///
    /// The cursor position is converted to world coordinates before the
    /// scale change, then the offset is re-derived so the same world point
    /// maps back to the same screen point afterwards.
    pub fn zoom_about(&mut self, screen_point: Point, wheel_delta_y: f64) {
        let new_scale =
            (self.scale - wheel_delta_y * ZOOM_INTENSITY).clamp(self.min_scale, self.max_scale);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return;
        }

        let world_point = self.screen_to_world(screen_point);
        self.offset = Vec2::new(
            screen_point.x - world_point.x * new_scale,
            screen_point.y - world_point.y * new_scale,
        );
        self.scale = new_scale;
    }

    /// Reset camera to the default position and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.scale = 1.0;
    }
}
