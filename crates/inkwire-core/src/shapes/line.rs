//! Line shape.

use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// A straight segment between two endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_color: String,
    pub stroke_width: f64,
}

impl Line {
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

    pub fn length(&self) -> f64 {
        (self.end() - self.start()).hypot()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x1, self.y1, self.x2, self.y2).abs()
    }

    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start());
        path.line_to(self.end());
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length() {
        let line = Line::new(0.0, 0.0, 3.0, 4.0, "#fff".into(), 1.0);
        assert!((line.length() - 5.0).abs() < f64::EPSILON);
    }
}
