//! Shape definitions for the drawing surface.
//!
//! Every committed edit is one of these variants. Shapes are immutable once
//! committed: edits appear as new shapes, and the serialized form of each
//! variant is the wire format exchanged with the relay (lowercase `type` tag,
//! camelCase fields).

mod arrow;
mod ellipse;
mod eraser;
mod freehand;
mod line;
mod rectangle;
mod text;
mod triangle;

pub use arrow::Arrow;
pub use ellipse::Ellipse;
pub use eraser::Eraser;
pub use freehand::Freehand;
pub use line::Line;
pub use rectangle::Rectangle;
pub use text::Text;
pub use triangle::Triangle;

use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// Closed tagged union of all committed shape kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Line(Line),
    Triangle(Triangle),
    Freehand(Freehand),
    Text(Text),
    Eraser(Eraser),
    Arrow(Arrow),
}

impl Shape {
    /// Diagnostic name matching the wire tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Rectangle(_) => "rectangle",
            Shape::Ellipse(_) => "ellipse",
            Shape::Line(_) => "line",
            Shape::Triangle(_) => "triangle",
            Shape::Freehand(_) => "freehand",
            Shape::Text(_) => "text",
            Shape::Eraser(_) => "eraser",
            Shape::Arrow(_) => "arrow",
        }
    }

    /// Bounding box in world coordinates.
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rectangle(s) => s.bounds(),
            Shape::Ellipse(s) => s.bounds(),
            Shape::Line(s) => s.bounds(),
            Shape::Triangle(s) => s.bounds(),
            Shape::Freehand(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
            Shape::Eraser(s) => s.bounds(),
            Shape::Arrow(s) => s.bounds(),
        }
    }

    /// Outline geometry for stroke rendering.
    ///
    /// Text has no stroke outline; the renderer emits text runs for it
    /// instead (see `render::render`), so this returns an empty path.
    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Rectangle(s) => s.to_path(),
            Shape::Ellipse(s) => s.to_path(),
            Shape::Line(s) => s.to_path(),
            Shape::Triangle(s) => s.to_path(),
            Shape::Freehand(s) => s.to_path(),
            Shape::Text(_) => BezPath::new(),
            Shape::Eraser(s) => s.to_path(),
            Shape::Arrow(s) => s.to_path(),
        }
    }
}

/// Polyline path through a point list; empty input yields an empty path.
pub(crate) fn polyline_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some(first) = points.first() else {
        return path;
    };
    path.move_to(*first);
    for p in &points[1..] {
        path.line_to(*p);
    }
    path
}

/// Bounding box of a point list; empty input yields a zero rect.
pub(crate) fn points_bounds(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    let mut rect = Rect::new(first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        rect.x0 = rect.x0.min(p.x);
        rect.y0 = rect.y0.min(p.y);
        rect.x1 = rect.x1.max(p.x);
        rect.y1 = rect.y1.max(p.y);
    }
    rect
}
