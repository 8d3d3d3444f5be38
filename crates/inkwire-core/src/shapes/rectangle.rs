//! Rectangle shape.

use kurbo::{BezPath, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle.
///
/// `width`/`height` may be negative when the drag ran right-to-left or
/// bottom-to-top; `bounds` normalizes, the wire format does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub stroke_color: String,
    pub stroke_width: f64,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64, stroke_color: String, stroke_width: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            stroke_color,
            stroke_width,
        }
    }

    /// Normalized bounding rect (handles negative width/height).
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }

    pub fn to_path(&self) -> BezPath {
        self.bounds().to_path(0.1)
    }
}
