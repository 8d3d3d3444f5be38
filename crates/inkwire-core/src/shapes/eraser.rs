//! Eraser stroke shape.

use super::{points_bounds, polyline_path};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// Eraser width multiplier over the active stroke width.
pub const ERASER_WIDTH_FACTOR: f64 = 10.0;

/// An eraser stroke.
///
/// Carries only its point list and a brush `size` — no color. The renderer
/// draws it with a subtract blend against the already-drawn pixels instead
/// of a stroke color, so an eraser commit is an ordinary append-only shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eraser {
    pub points: Vec<Point>,
    pub size: f64,
}

impl Eraser {
    pub fn new(points: Vec<Point>, size: f64) -> Self {
        Self { points, size }
    }

    /// Brush size for a given stroke width setting.
    pub fn size_for_stroke_width(stroke_width: f64) -> f64 {
        stroke_width * ERASER_WIDTH_FACTOR
    }

    pub fn bounds(&self) -> Rect {
        points_bounds(&self.points)
    }

    pub fn to_path(&self) -> BezPath {
        polyline_path(&self.points)
    }
}
