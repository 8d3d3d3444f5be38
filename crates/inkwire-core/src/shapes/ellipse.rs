//! Ellipse shape.

use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// An axis-aligned ellipse given by its center and radii.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ellipse {
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    pub radius_x: f64,
    pub radius_y: f64,
    pub stroke_color: String,
    pub stroke_width: f64,
}

impl Ellipse {
    pub fn new(x: f64, y: f64, radius_x: f64, radius_y: f64, stroke_color: String, stroke_width: f64) -> Self {
        Self {
            x,
            y,
            radius_x,
            radius_y,
            stroke_color,
            stroke_width,
        }
    }

    /// Build an ellipse inscribed in the drag rectangle, the way a box
    /// drag commits: center at the midpoint, radii half the extents.
    pub fn from_drag(start: Point, end: Point, stroke_color: String, stroke_width: f64) -> Self {
        Self::new(
            (start.x + end.x) / 2.0,
            (start.y + end.y) / 2.0,
            (end.x - start.x).abs() / 2.0,
            (end.y - start.y).abs() / 2.0,
            stroke_color,
            stroke_width,
        )
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.x - self.radius_x,
            self.y - self.radius_y,
            self.x + self.radius_x,
            self.y + self.radius_y,
        )
    }

    pub fn to_path(&self) -> BezPath {
        kurbo::Ellipse::new(Point::new(self.x, self.y), (self.radius_x, self.radius_y), 0.0)
            .to_path(0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_drag_centers_on_midpoint() {
        let e = Ellipse::from_drag(
            Point::new(0.0, 0.0),
            Point::new(10.0, 20.0),
            "#fff".into(),
            1.0,
        );
        assert!((e.x - 5.0).abs() < f64::EPSILON);
        assert!((e.y - 10.0).abs() < f64::EPSILON);
        assert!((e.radius_x - 5.0).abs() < f64::EPSILON);
        assert!((e.radius_y - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_drag_reversed_has_positive_radii() {
        let e = Ellipse::from_drag(
            Point::new(10.0, 20.0),
            Point::new(0.0, 0.0),
            "#fff".into(),
            1.0,
        );
        assert!(e.radius_x > 0.0);
        assert!(e.radius_y > 0.0);
    }
}
