//! Gesture translation: raw pointer/keyboard input to shape commits.
//!
//! One explicit state machine per surface. At most one gesture is active at
//! a time by construction (the [`Gesture`] enum), and every cancellation
//! routes through [`GestureTranslator::abort`].

use crate::camera::Camera;
use crate::shapes::{Arrow, Ellipse, Eraser, Freehand, Line, Rectangle, Shape, Text, Triangle};
use kurbo::{Point, Vec2};

/// Caret blink half-period for text editing, in milliseconds. The host
/// drives [`GestureTranslator::tick_caret`] on this interval, independent
/// of input events.
pub const CARET_BLINK_MS: u64 = 500;

/// Externally selected drawing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    #[default]
    Rect,
    Ellipse,
    Line,
    Triangle,
    Freehand,
    Text,
    Eraser,
    Arrow,
}

/// Pointer button roles. Primary draws, secondary pans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Keyboard input relevant to a text session.
#[derive(Debug, Clone, PartialEq)]
pub enum TextKey {
    Character(char),
    Enter,
    Backspace,
}

/// Stroke style sampled at commit time.
#[derive(Debug, Clone)]
pub struct StrokeSettings {
    pub stroke_color: String,
    pub stroke_width: f64,
}

impl Default for StrokeSettings {
    fn default() -> Self {
        Self {
            stroke_color: "#ffffff".to_string(),
            stroke_width: 3.0,
        }
    }
}

/// A live text entry session.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSession {
    /// Anchor in world coordinates.
    pub origin: Point,
    /// Accumulated content, `\n`-separated.
    pub buffer: String,
    /// Whether the blinking caret is currently shown.
    pub caret_visible: bool,
}

impl TextSession {
    fn new(origin: Point) -> Self {
        Self {
            origin,
            buffer: String::new(),
            caret_visible: true,
        }
    }
}

/// The active gesture, if any. Variants are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Two-point drag for rect/ellipse/line/triangle/arrow.
    BoxDrag { start: Point, current: Point },
    /// Accumulating freehand stroke points.
    Freehand { points: Vec<Point> },
    /// Accumulating eraser stroke points.
    Erasing { points: Vec<Point> },
    /// Translating the view; `anchor` is the screen position minus the
    /// camera offset at press time.
    Panning { anchor: Vec2 },
    /// Live text entry.
    TextEditing(TextSession),
}

/// What an input event produced.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// Nothing visible changed.
    None,
    /// Preview or camera changed; schedule a redraw.
    Redraw,
    /// A shape was committed (also implies a redraw).
    Commit(Shape),
}

/// Converts discrete input events into committed shapes or live previews,
/// according to the externally supplied [`DrawMode`].
#[derive(Debug, Default)]
pub struct GestureTranslator {
    mode: DrawMode,
    pub settings: StrokeSettings,
    gesture: Gesture,
}

impl GestureTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    /// The active gesture, for preview rendering.
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_active(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    /// Switch drawing mode. Any in-progress gesture is discarded, never
    /// committed.
    pub fn set_mode(&mut self, mode: DrawMode) -> GestureOutcome {
        let outcome = self.abort();
        self.mode = mode;
        outcome
    }

    /// Discard any in-progress gesture (mode switch, pointer leaving the
    /// surface). The single cancellation path: previews and text buffers
    /// are dropped without committing.
    pub fn abort(&mut self) -> GestureOutcome {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => GestureOutcome::None,
            _ => GestureOutcome::Redraw,
        }
    }

    pub fn pointer_down(
        &mut self,
        screen: Point,
        button: PointerButton,
        camera: &Camera,
    ) -> GestureOutcome {
        // A press anywhere ends an active text session, committing its
        // content if non-empty.
        if matches!(self.gesture, Gesture::TextEditing(_)) {
            return self.finalize_text();
        }

        if self.is_active() {
            // One pointer sequence at a time; a second button is ignored.
            return GestureOutcome::None;
        }

        match button {
            PointerButton::Secondary => {
                self.gesture = Gesture::Panning {
                    anchor: screen.to_vec2() - camera.offset,
                };
                GestureOutcome::None
            }
            PointerButton::Primary => {
                let world = camera.screen_to_world(screen);
                match self.mode {
                    DrawMode::Freehand => {
                        self.gesture = Gesture::Freehand { points: vec![world] };
                        GestureOutcome::Redraw
                    }
                    DrawMode::Eraser => {
                        self.gesture = Gesture::Erasing { points: vec![world] };
                        GestureOutcome::Redraw
                    }
                    // Text shapes start from a double-click.
                    DrawMode::Text => GestureOutcome::None,
                    _ => {
                        self.gesture = Gesture::BoxDrag {
                            start: world,
                            current: world,
                        };
                        GestureOutcome::Redraw
                    }
                }
            }
        }
    }

    pub fn pointer_move(&mut self, screen: Point, camera: &mut Camera) -> GestureOutcome {
        let world = camera.screen_to_world(screen);
        match &mut self.gesture {
            Gesture::BoxDrag { current, .. } => {
                *current = world;
                GestureOutcome::Redraw
            }
            Gesture::Freehand { points } | Gesture::Erasing { points } => {
                points.push(world);
                GestureOutcome::Redraw
            }
            Gesture::Panning { anchor } => {
                camera.offset = screen.to_vec2() - *anchor;
                GestureOutcome::Redraw
            }
            Gesture::Idle | Gesture::TextEditing(_) => GestureOutcome::None,
        }
    }

    pub fn pointer_up(
        &mut self,
        screen: Point,
        button: PointerButton,
        camera: &Camera,
    ) -> GestureOutcome {
        match (&self.gesture, button) {
            (Gesture::Panning { .. }, PointerButton::Secondary) => {
                self.gesture = Gesture::Idle;
                GestureOutcome::None
            }
            (Gesture::BoxDrag { .. }, PointerButton::Primary)
            | (Gesture::Freehand { .. }, PointerButton::Primary)
            | (Gesture::Erasing { .. }, PointerButton::Primary) => {
                let world = camera.screen_to_world(screen);
                self.commit_active(world)
            }
            _ => GestureOutcome::None,
        }
    }

    /// Wheel input: stateless zoom about the cursor.
    pub fn wheel(&mut self, screen: Point, delta_y: f64, camera: &mut Camera) -> GestureOutcome {
        let before = camera.scale;
        let offset_before = camera.offset;
        camera.zoom_about(screen, delta_y);
        if (camera.scale - before).abs() < f64::EPSILON && camera.offset == offset_before {
            GestureOutcome::None
        } else {
            GestureOutcome::Redraw
        }
    }

    /// Double-click opens a text session in text mode. An already-active
    /// session is finalized first; its commit (if any) is returned.
    pub fn double_click(&mut self, screen: Point, camera: &Camera) -> GestureOutcome {
        if self.mode != DrawMode::Text {
            return GestureOutcome::None;
        }
        let outcome = match self.gesture {
            Gesture::TextEditing(_) => self.finalize_text(),
            _ => GestureOutcome::None,
        };
        self.gesture = Gesture::TextEditing(TextSession::new(camera.screen_to_world(screen)));
        match outcome {
            GestureOutcome::Commit(shape) => GestureOutcome::Commit(shape),
            _ => GestureOutcome::Redraw,
        }
    }

    /// Keyboard input for the active text session.
    pub fn key(&mut self, key: TextKey) -> GestureOutcome {
        let Gesture::TextEditing(session) = &mut self.gesture else {
            return GestureOutcome::None;
        };
        match key {
            TextKey::Character(c) => session.buffer.push(c),
            TextKey::Enter => session.buffer.push('\n'),
            TextKey::Backspace => {
                session.buffer.pop();
            }
        }
        GestureOutcome::Redraw
    }

    /// Toggle the caret; driven on a fixed interval by the host.
    pub fn tick_caret(&mut self) -> GestureOutcome {
        if let Gesture::TextEditing(session) = &mut self.gesture {
            session.caret_visible = !session.caret_visible;
            GestureOutcome::Redraw
        } else {
            GestureOutcome::None
        }
    }

    /// End the active text session: commit a text shape if the trimmed
    /// buffer is non-empty, discard otherwise.
    pub fn finalize_text(&mut self) -> GestureOutcome {
        let Gesture::TextEditing(session) = std::mem::take(&mut self.gesture) else {
            return GestureOutcome::None;
        };
        if session.buffer.trim().is_empty() {
            return GestureOutcome::Redraw;
        }
        GestureOutcome::Commit(Shape::Text(Text::new(
            session.origin.x,
            session.origin.y,
            session.buffer,
            self.settings.stroke_color.clone(),
            self.settings.stroke_width,
        )))
    }

    fn commit_active(&mut self, world: Point) -> GestureOutcome {
        let color = self.settings.stroke_color.clone();
        let width = self.settings.stroke_width;
        match std::mem::take(&mut self.gesture) {
            Gesture::BoxDrag { start, .. } => {
                let current = world;
                let shape = match self.mode {
                    DrawMode::Rect => Shape::Rectangle(Rectangle::new(
                        start.x,
                        start.y,
                        current.x - start.x,
                        current.y - start.y,
                        color,
                        width,
                    )),
                    DrawMode::Ellipse => {
                        Shape::Ellipse(Ellipse::from_drag(start, current, color, width))
                    }
                    DrawMode::Line => Shape::Line(Line::new(
                        start.x, start.y, current.x, current.y, color, width,
                    )),
                    DrawMode::Triangle => {
                        Shape::Triangle(Triangle::from_drag(start, current, color, width))
                    }
                    DrawMode::Arrow => Shape::Arrow(Arrow::new(
                        start.x, start.y, current.x, current.y, color, width,
                    )),
                    // Freehand/eraser/text never enter a box drag.
                    DrawMode::Freehand | DrawMode::Eraser | DrawMode::Text => {
                        return GestureOutcome::Redraw;
                    }
                };
                GestureOutcome::Commit(shape)
            }
            Gesture::Freehand { points } => {
                GestureOutcome::Commit(Shape::Freehand(Freehand::new(points, color, width)))
            }
            Gesture::Erasing { points } => GestureOutcome::Commit(Shape::Eraser(Eraser::new(
                points,
                Eraser::size_for_stroke_width(width),
            ))),
            other => {
                self.gesture = other;
                GestureOutcome::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator(mode: DrawMode) -> (GestureTranslator, Camera) {
        let mut t = GestureTranslator::new();
        t.set_mode(mode);
        (t, Camera::new())
    }

    #[test]
    fn test_box_drag_commits_rectangle() {
        let (mut t, camera) = translator(DrawMode::Rect);
        t.pointer_down(Point::new(10.0, 10.0), PointerButton::Primary, &camera);
        t.pointer_move(Point::new(60.0, 40.0), &mut camera.clone());
        let outcome = t.pointer_up(Point::new(110.0, 60.0), PointerButton::Primary, &camera);
        match outcome {
            GestureOutcome::Commit(Shape::Rectangle(r)) => {
                assert!((r.x - 10.0).abs() < f64::EPSILON);
                assert!((r.width - 100.0).abs() < f64::EPSILON);
                assert!((r.height - 50.0).abs() < f64::EPSILON);
            }
            other => panic!("expected rectangle commit, got {other:?}"),
        }
        assert!(!t.is_active());
    }

    #[test]
    fn test_drag_uses_world_coordinates() {
        let (mut t, mut camera) = translator(DrawMode::Line);
        camera.offset = kurbo::Vec2::new(100.0, 0.0);
        camera.scale = 0.5;
        t.pointer_down(Point::new(100.0, 0.0), PointerButton::Primary, &camera);
        let outcome = t.pointer_up(Point::new(150.0, 50.0), PointerButton::Primary, &camera);
        match outcome {
            GestureOutcome::Commit(Shape::Line(line)) => {
                assert!((line.x1 - 0.0).abs() < f64::EPSILON);
                assert!((line.x2 - 100.0).abs() < f64::EPSILON);
                assert!((line.y2 - 100.0).abs() < f64::EPSILON);
            }
            other => panic!("expected line commit, got {other:?}"),
        }
    }

    #[test]
    fn test_freehand_accumulates_points() {
        let (mut t, mut camera) = translator(DrawMode::Freehand);
        t.pointer_down(Point::new(0.0, 0.0), PointerButton::Primary, &camera);
        t.pointer_move(Point::new(1.0, 1.0), &mut camera);
        t.pointer_move(Point::new(2.0, 0.5), &mut camera);
        let outcome = t.pointer_up(Point::new(2.0, 0.5), PointerButton::Primary, &camera);
        match outcome {
            GestureOutcome::Commit(Shape::Freehand(stroke)) => {
                assert_eq!(stroke.points.len(), 3);
            }
            other => panic!("expected freehand commit, got {other:?}"),
        }
    }

    #[test]
    fn test_eraser_commit_carries_derived_size() {
        let (mut t, mut camera) = translator(DrawMode::Eraser);
        t.settings.stroke_width = 4.0;
        t.pointer_down(Point::new(0.0, 0.0), PointerButton::Primary, &camera);
        t.pointer_move(Point::new(5.0, 5.0), &mut camera);
        let outcome = t.pointer_up(Point::new(5.0, 5.0), PointerButton::Primary, &camera);
        match outcome {
            GestureOutcome::Commit(Shape::Eraser(eraser)) => {
                assert!((eraser.size - 40.0).abs() < f64::EPSILON);
            }
            other => panic!("expected eraser commit, got {other:?}"),
        }
    }

    #[test]
    fn test_panning_translates_camera_and_blocks_drawing() {
        let (mut t, mut camera) = translator(DrawMode::Rect);
        t.pointer_down(Point::new(50.0, 50.0), PointerButton::Secondary, &camera);
        // A primary press during the pan is ignored.
        t.pointer_down(Point::new(60.0, 60.0), PointerButton::Primary, &camera);
        assert!(matches!(t.gesture(), Gesture::Panning { .. }));

        t.pointer_move(Point::new(70.0, 55.0), &mut camera);
        assert!((camera.offset.x - 20.0).abs() < f64::EPSILON);
        assert!((camera.offset.y - 5.0).abs() < f64::EPSILON);

        t.pointer_up(Point::new(70.0, 55.0), PointerButton::Secondary, &camera);
        assert!(!t.is_active());
    }

    #[test]
    fn test_mode_switch_discards_preview() {
        let (mut t, camera) = translator(DrawMode::Rect);
        t.pointer_down(Point::new(0.0, 0.0), PointerButton::Primary, &camera);
        let outcome = t.set_mode(DrawMode::Line);
        assert_eq!(outcome, GestureOutcome::Redraw);
        assert!(!t.is_active());
        // The abandoned drag must not commit on a later release.
        let outcome = t.pointer_up(Point::new(9.0, 9.0), PointerButton::Primary, &camera);
        assert_eq!(outcome, GestureOutcome::None);
    }

    #[test]
    fn test_text_session_lifecycle() {
        let (mut t, camera) = translator(DrawMode::Text);
        t.double_click(Point::new(20.0, 30.0), &camera);
        assert!(matches!(t.gesture(), Gesture::TextEditing(_)));

        for c in "hi".chars() {
            t.key(TextKey::Character(c));
        }
        t.key(TextKey::Enter);
        t.key(TextKey::Character('o'));
        t.key(TextKey::Character('x'));
        t.key(TextKey::Backspace);

        let outcome = t.pointer_down(Point::new(500.0, 500.0), PointerButton::Primary, &camera);
        match outcome {
            GestureOutcome::Commit(Shape::Text(text)) => {
                assert_eq!(text.content, "hi\no");
                assert!((text.x - 20.0).abs() < f64::EPSILON);
                assert!((text.y - 30.0).abs() < f64::EPSILON);
            }
            other => panic!("expected text commit, got {other:?}"),
        }
        assert!(!t.is_active());
    }

    #[test]
    fn test_empty_text_session_discards() {
        let (mut t, camera) = translator(DrawMode::Text);
        t.double_click(Point::new(0.0, 0.0), &camera);
        t.key(TextKey::Character(' '));
        let outcome = t.pointer_down(Point::new(1.0, 1.0), PointerButton::Primary, &camera);
        assert_eq!(outcome, GestureOutcome::Redraw);
    }

    #[test]
    fn test_second_double_click_finalizes_previous_session() {
        let (mut t, camera) = translator(DrawMode::Text);
        t.double_click(Point::new(0.0, 0.0), &camera);
        t.key(TextKey::Character('a'));
        let outcome = t.double_click(Point::new(50.0, 50.0), &camera);
        match outcome {
            GestureOutcome::Commit(Shape::Text(text)) => assert_eq!(text.content, "a"),
            other => panic!("expected commit of previous session, got {other:?}"),
        }
        // And a fresh session is now open at the new origin.
        match t.gesture() {
            Gesture::TextEditing(session) => {
                assert_eq!(session.origin, Point::new(50.0, 50.0));
                assert!(session.buffer.is_empty());
            }
            other => panic!("expected new session, got {other:?}"),
        }
    }

    #[test]
    fn test_caret_ticks_independent_of_input() {
        let (mut t, camera) = translator(DrawMode::Text);
        t.double_click(Point::ZERO, &camera);
        let visible_before = match t.gesture() {
            Gesture::TextEditing(s) => s.caret_visible,
            _ => unreachable!(),
        };
        t.tick_caret();
        let visible_after = match t.gesture() {
            Gesture::TextEditing(s) => s.caret_visible,
            _ => unreachable!(),
        };
        assert_ne!(visible_before, visible_after);
        // No session, no tick effect.
        t.abort();
        assert_eq!(t.tick_caret(), GestureOutcome::None);
    }

    #[test]
    fn test_wheel_zoom_has_no_gesture_state() {
        let (mut t, mut camera) = translator(DrawMode::Rect);
        let outcome = t.wheel(Point::new(100.0, 100.0), 120.0, &mut camera);
        assert_eq!(outcome, GestureOutcome::Redraw);
        assert!(!t.is_active());
        assert!(camera.scale < 1.0);
    }

    #[test]
    fn test_wheel_at_clamp_reports_no_change() {
        let (mut t, mut camera) = translator(DrawMode::Rect);
        camera.scale = camera.max_scale;
        let outcome = t.wheel(Point::ZERO, -500.0, &mut camera);
        assert_eq!(outcome, GestureOutcome::None);
    }
}
