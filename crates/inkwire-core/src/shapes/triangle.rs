//! Triangle shape.

use super::points_bounds;
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// A triangle given by its three vertices.
///
/// Committed from a box drag: the drag segment forms one edge and the
/// third vertex is derived so the triangle is equilateral (see
/// [`Triangle::from_drag`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Triangle {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub x3: f64,
    pub y3: f64,
    pub stroke_color: String,
    pub stroke_width: f64,
}

impl Triangle {
    /// Derive an equilateral triangle from a drag segment.
    ///
    /// The third vertex is the segment midpoint offset perpendicular to the
    /// drag vector by `|segment| * sqrt(3)/2` (the apex height of an
    /// equilateral triangle over the segment). A left-to-right drag puts the
    /// apex above the segment.
    pub fn from_drag(start: Point, end: Point, stroke_color: String, stroke_width: f64) -> Self {
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let mid_x = (start.x + end.x) / 2.0;
        let mid_y = (start.y + end.y) / 2.0;
        // (dy, -dx) is perpendicular to the drag vector with the same length.
        let apex = 3.0_f64.sqrt() / 2.0;
        Self {
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
            x3: mid_x + dy * apex,
            y3: mid_y - dx * apex,
            stroke_color,
            stroke_width,
        }
    }

    pub fn vertices(&self) -> [Point; 3] {
        [
            Point::new(self.x1, self.y1),
            Point::new(self.x2, self.y2),
            Point::new(self.x3, self.y3),
        ]
    }

    pub fn bounds(&self) -> Rect {
        points_bounds(&self.vertices())
    }

    pub fn to_path(&self) -> BezPath {
        let [a, b, c] = self.vertices();
        let mut path = BezPath::new();
        path.move_to(a);
        path.line_to(b);
        path.line_to(c);
        path.close_path();
        path
    }
}
