//! Scene model: the client's committed shape sequence and view transform.

use crate::camera::Camera;
use crate::shapes::Shape;
use serde_json::Value;

/// One client's local view of a room: an append-only sequence of committed
/// shapes plus the camera.
///
/// Insertion order is z-order; later shapes draw on top. Shapes are never
/// reordered or removed except by [`Scene::clear`]. A dirty flag tracks
/// whether a redraw is owed; the frame scheduler drains it once per frame.
#[derive(Debug, Default)]
pub struct Scene {
    shapes: Vec<Shape>,
    pub camera: Camera,
    dirty: bool,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed shapes in z-order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Append a locally committed shape.
    ///
    /// The caller hands the same shape to the transport for broadcast;
    /// local append never waits on delivery.
    pub fn commit_local(&mut self, shape: Shape) -> &Shape {
        self.shapes.push(shape);
        self.dirty = true;
        let last = self.shapes.len() - 1;
        &self.shapes[last]
    }

    /// Append a shape received from a peer.
    ///
    /// Never fails: a payload that does not decode as a shape is dropped
    /// and logged, leaving the scene untouched.
    pub fn apply_remote(&mut self, payload: Value) {
        match serde_json::from_value::<Shape>(payload) {
            Ok(shape) => {
                self.shapes.push(shape);
                self.dirty = true;
            }
            Err(err) => {
                log::warn!("dropping malformed remote shape: {err}");
            }
        }
    }

    /// Empty the committed sequence (reaction to a successful external
    /// clear-content action).
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.dirty = true;
    }

    /// Mark the scene as needing a redraw (camera moves, previews).
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Consume the dirty flag; returns whether a redraw is owed.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Line, Rectangle};
    use serde_json::json;

    fn rect(x: f64) -> Shape {
        Shape::Rectangle(Rectangle::new(x, 0.0, 10.0, 10.0, "#fff".into(), 1.0))
    }

    #[test]
    fn test_commit_preserves_insertion_order() {
        let mut scene = Scene::new();
        for i in 0..5 {
            scene.commit_local(rect(i as f64));
        }
        let xs: Vec<f64> = scene
            .shapes()
            .iter()
            .map(|s| match s {
                Shape::Rectangle(r) => r.x,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_apply_remote_appends_valid_shape() {
        let mut scene = Scene::new();
        scene.apply_remote(json!({
            "type": "line",
            "x1": 0.0, "y1": 0.0, "x2": 5.0, "y2": 5.0,
            "strokeColor": "#abc", "strokeWidth": 2.0
        }));
        assert_eq!(scene.len(), 1);
        assert!(matches!(scene.shapes()[0], Shape::Line(Line { .. })));
    }

    #[test]
    fn test_apply_remote_drops_malformed_payload() {
        let mut scene = Scene::new();
        scene.commit_local(rect(0.0));
        scene.take_dirty();

        scene.apply_remote(json!({"type": "hexagon", "sides": 6}));
        scene.apply_remote(json!("not even an object"));

        assert_eq!(scene.len(), 1);
        assert!(!scene.take_dirty());
    }

    #[test]
    fn test_clear_empties_sequence() {
        let mut scene = Scene::new();
        scene.commit_local(rect(0.0));
        scene.commit_local(rect(1.0));
        scene.clear();
        assert!(scene.is_empty());
        assert!(scene.take_dirty());
    }

    #[test]
    fn test_dirty_flag_consumed_once() {
        let mut scene = Scene::new();
        scene.commit_local(rect(0.0));
        assert!(scene.take_dirty());
        assert!(!scene.take_dirty());
    }
}
