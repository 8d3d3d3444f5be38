//! Text shape.

use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Font size multiplier over the active stroke width.
pub(crate) const FONT_SIZE_FACTOR: f64 = 10.0;

/// Line height as a multiple of the font size.
pub(crate) const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// A committed block of text anchored at a world point.
///
/// `content` may span multiple lines (`\n`-separated); the font size is
/// derived from the stroke width at commit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub x: f64,
    pub y: f64,
    pub content: String,
    pub stroke_color: String,
    pub stroke_width: f64,
}

impl Text {
    pub fn new(x: f64, y: f64, content: String, stroke_color: String, stroke_width: f64) -> Self {
        Self {
            x,
            y,
            content,
            stroke_color,
            stroke_width,
        }
    }

    pub fn font_size(&self) -> f64 {
        self.stroke_width * FONT_SIZE_FACTOR
    }

    pub fn line_height(&self) -> f64 {
        self.font_size() * LINE_HEIGHT_FACTOR
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }

    /// Rough anchor-based bounds: exact text metrics belong to the drawing
    /// backend, so height comes from the line count and width is left zero.
    pub fn bounds(&self) -> Rect {
        let line_count = self.content.split('\n').count() as f64;
        Rect::new(self.x, self.y, self.x, self.y + line_count * self.line_height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_size_from_stroke_width() {
        let text = Text::new(0.0, 0.0, "hi".into(), "#fff".into(), 3.0);
        assert!((text.font_size() - 30.0).abs() < f64::EPSILON);
        assert!((text.line_height() - 36.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_multiline_content_round_trips() {
        let text = Text::new(1.0, 2.0, "a\nb\nc".into(), "#fff".into(), 2.0);
        let json = serde_json::to_string(&text).unwrap();
        let back: Text = serde_json::from_str(&json).unwrap();
        assert_eq!(text, back);
        assert_eq!(back.lines().count(), 3);
    }
}
