//! Arrow shape.

use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// Angle between the shaft and each arrowhead leg.
const HEAD_ANGLE: f64 = std::f64::consts::PI / 7.0;

/// Minimum arrowhead length in world units.
const MIN_HEAD_LENGTH: f64 = 10.0;

/// A straight arrow: a shaft from `(x1, y1)` to `(x2, y2)` with a head at
/// the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrow {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_color: String,
    pub stroke_width: f64,
}

impl Arrow {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_color: String, stroke_width: f64) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_color,
            stroke_width,
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    /// Arrowhead leg length: `max(10, strokeWidth * 5)`.
    pub fn head_length(&self) -> f64 {
        MIN_HEAD_LENGTH.max(self.stroke_width * 5.0)
    }

    /// The two arrowhead leg endpoints, angled `±π/7` back from the shaft.
    pub fn head_points(&self) -> (Point, Point) {
        let angle = (self.y2 - self.y1).atan2(self.x2 - self.x1);
        let len = self.head_length();
        let left = Point::new(
            self.x2 - len * (angle - HEAD_ANGLE).cos(),
            self.y2 - len * (angle - HEAD_ANGLE).sin(),
        );
        let right = Point::new(
            self.x2 - len * (angle + HEAD_ANGLE).cos(),
            self.y2 - len * (angle + HEAD_ANGLE).sin(),
        );
        (left, right)
    }

    pub fn bounds(&self) -> Rect {
        let (left, right) = self.head_points();
        let mut rect = Rect::new(self.x1, self.y1, self.x2, self.y2).abs();
        rect = rect.union_pt(left);
        rect.union_pt(right)
    }

    /// Shaft plus closed arrowhead triangle.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start());
        path.line_to(self.end());

        let (left, right) = self.head_points();
        path.move_to(self.end());
        path.line_to(left);
        path.line_to(right);
        path.close_path();
        path
    }
}
