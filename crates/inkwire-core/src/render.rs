//! Rendering: scene + live preview to an ordered display list.
//!
//! The renderer is a pure function of the scene and the active gesture; it
//! owns no state. Backends (canvas, GPU, test capture) consume the display
//! list in order under the camera transform. `FrameScheduler` coalesces
//! redraw requests to one per display refresh.

use crate::gesture::{Gesture, GestureTranslator};
use crate::scene::Scene;
use crate::shapes::{Arrow, Ellipse, Eraser, Freehand, Line, Rectangle, Shape, Triangle};
use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};

/// RGBA color parsed from a `#rrggbb` / `#rgb` wire string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };

    /// Parse `#rrggbb` or `#rgb`. Unparseable colors fall back to white so
    /// a bad remote color never aborts a redraw.
    pub fn from_hex(hex: &str) -> Rgba {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let parsed = match digits.len() {
            6 => u32::from_str_radix(digits, 16).ok().map(|v| Rgba {
                r: (v >> 16) as u8,
                g: (v >> 8) as u8,
                b: v as u8,
                a: 255,
            }),
            3 => u32::from_str_radix(digits, 16).ok().map(|v| {
                let (r, g, b) = ((v >> 8) & 0xf, (v >> 4) & 0xf, v & 0xf);
                Rgba {
                    r: (r * 17) as u8,
                    g: (g * 17) as u8,
                    b: (b * 17) as u8,
                    a: 255,
                }
            }),
            _ => None,
        };
        parsed.unwrap_or(Rgba::WHITE)
    }
}

/// Pixel blend mode for a draw op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blend {
    /// Normal source-over compositing.
    Over,
    /// Subtract from already-drawn pixels (eraser strokes).
    Subtract,
}

/// One backend-agnostic drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Stroke an outline path.
    Stroke {
        path: BezPath,
        color: Rgba,
        width: f64,
        blend: Blend,
    },
    /// Fill a closed path (arrowheads).
    Fill { path: BezPath, color: Rgba },
    /// Draw a block of text anchored at a world point.
    TextRun {
        origin: Point,
        content: String,
        color: Rgba,
        font_size: f64,
        line_height: f64,
    },
}

/// Ordered drawing instructions for one frame; index order is z-order.
pub type DisplayList = Vec<DrawOp>;

/// Coalesces redraw requests to at most one per frame.
///
/// Handlers may run many times between display refreshes; each calls
/// [`FrameScheduler::request`], and the frame tick consumes the single
/// pending flag via [`FrameScheduler::take`].
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: bool,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a redraw as owed. Idempotent within a frame; returns whether
    /// this call newly scheduled it.
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    /// Consume the pending flag at the frame tick.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

/// Render the committed scene and any live preview into a display list.
///
/// Committed shapes emit in insertion order; the active preview draws last,
/// on top of everything.
pub fn render(scene: &Scene, translator: &GestureTranslator) -> DisplayList {
    let mut ops = Vec::with_capacity(scene.len() + 1);
    for shape in scene.shapes() {
        push_shape(&mut ops, shape);
    }
    push_preview(&mut ops, translator);
    ops
}

fn push_shape(ops: &mut DisplayList, shape: &Shape) {
    match shape {
        Shape::Rectangle(s) => push_stroke(ops, s.to_path(), &s.stroke_color, s.stroke_width),
        Shape::Ellipse(s) => push_stroke(ops, s.to_path(), &s.stroke_color, s.stroke_width),
        Shape::Line(s) => push_stroke(ops, s.to_path(), &s.stroke_color, s.stroke_width),
        Shape::Triangle(s) => push_stroke(ops, s.to_path(), &s.stroke_color, s.stroke_width),
        Shape::Freehand(s) => push_stroke(ops, s.to_path(), &s.stroke_color, s.stroke_width),
        Shape::Arrow(s) => {
            let color = Rgba::from_hex(&s.stroke_color);
            ops.push(DrawOp::Stroke {
                path: s.to_path(),
                color,
                width: s.stroke_width,
                blend: Blend::Over,
            });
            // Head triangle is filled, matching the committed look.
            let (left, right) = s.head_points();
            let mut head = BezPath::new();
            head.move_to(s.end());
            head.line_to(left);
            head.line_to(right);
            head.close_path();
            ops.push(DrawOp::Fill { path: head, color });
        }
        Shape::Eraser(s) => ops.push(DrawOp::Stroke {
            path: s.to_path(),
            color: Rgba::WHITE,
            width: s.size,
            blend: Blend::Subtract,
        }),
        Shape::Text(s) => ops.push(DrawOp::TextRun {
            origin: Point::new(s.x, s.y),
            content: s.content.clone(),
            color: Rgba::from_hex(&s.stroke_color),
            font_size: s.font_size(),
            line_height: s.line_height(),
        }),
    }
}

fn push_preview(ops: &mut DisplayList, translator: &GestureTranslator) {
    use crate::gesture::DrawMode;

    let settings = &translator.settings;
    match translator.gesture() {
        Gesture::Idle | Gesture::Panning { .. } => {}
        Gesture::BoxDrag { start, current } => {
            let color = settings.stroke_color.clone();
            let width = settings.stroke_width;
            let preview = match translator.mode() {
                DrawMode::Rect => Some(Shape::Rectangle(Rectangle::new(
                    start.x,
                    start.y,
                    current.x - start.x,
                    current.y - start.y,
                    color,
                    width,
                ))),
                DrawMode::Ellipse => {
                    Some(Shape::Ellipse(Ellipse::from_drag(*start, *current, color, width)))
                }
                DrawMode::Line => Some(Shape::Line(Line::new(
                    start.x, start.y, current.x, current.y, color, width,
                ))),
                DrawMode::Triangle => {
                    Some(Shape::Triangle(Triangle::from_drag(*start, *current, color, width)))
                }
                DrawMode::Arrow => Some(Shape::Arrow(Arrow::new(
                    start.x, start.y, current.x, current.y, color, width,
                ))),
                DrawMode::Freehand | DrawMode::Eraser | DrawMode::Text => None,
            };
            if let Some(shape) = preview {
                push_shape(ops, &shape);
            }
        }
        Gesture::Freehand { points } => {
            push_shape(
                ops,
                &Shape::Freehand(Freehand::new(
                    points.clone(),
                    settings.stroke_color.clone(),
                    settings.stroke_width,
                )),
            );
        }
        Gesture::Erasing { points } => {
            push_shape(
                ops,
                &Shape::Eraser(Eraser::new(
                    points.clone(),
                    Eraser::size_for_stroke_width(settings.stroke_width),
                )),
            );
        }
        Gesture::TextEditing(session) => {
            let mut content = session.buffer.clone();
            if session.caret_visible {
                content.push('|');
            }
            let font_size = settings.stroke_width * 10.0;
            ops.push(DrawOp::TextRun {
                origin: session.origin,
                content,
                color: Rgba::from_hex(&settings.stroke_color),
                font_size,
                line_height: font_size * 1.2,
            });
        }
    }
}

fn push_stroke(ops: &mut DisplayList, path: BezPath, color: &str, width: f64) {
    ops.push(DrawOp::Stroke {
        path,
        color: Rgba::from_hex(color),
        width,
        blend: Blend::Over,
    });
}
