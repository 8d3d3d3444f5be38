//! Freehand stroke shape.

use super::{points_bounds, polyline_path};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// A freehand stroke: every pointer sample of the gesture, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Freehand {
    pub points: Vec<Point>,
    pub stroke_color: String,
    pub stroke_width: f64,
}

impl Freehand {
    pub fn new(points: Vec<Point>, stroke_color: String, stroke_width: f64) -> Self {
        Self {
            points,
            stroke_color,
            stroke_width,
        }
    }

    pub fn bounds(&self) -> Rect {
        points_bounds(&self.points)
    }

    pub fn to_path(&self) -> BezPath {
        polyline_path(&self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_serialize_as_objects() {
        let stroke = Freehand::new(
            vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)],
            "#fff".into(),
            1.0,
        );
        let value = serde_json::to_value(&stroke).unwrap();
        assert_eq!(value["points"][0], serde_json::json!({"x": 1.0, "y": 2.0}));
    }

    #[test]
    fn test_single_point_stroke_has_degenerate_bounds() {
        let stroke = Freehand::new(vec![Point::new(5.0, 5.0)], "#fff".into(), 1.0);
        assert_eq!(stroke.bounds(), Rect::new(5.0, 5.0, 5.0, 5.0));
    }
}
