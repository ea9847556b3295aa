//! Positioned text-render events produced while walking a page.

use serde::{Deserialize, Serialize};

use crate::geometry::{bounding_box_of, Point, Rect};

/// A glyph run: baseline segment plus the text drawn along it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// Baseline start point
    pub start: Point,
    /// Baseline end point
    pub end: Point,
    /// Decoded text content
    pub text: String,
}

impl TextRun {
    /// Create a new text run.
    pub fn new(text: impl Into<String>, start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Horizontal run starting at `(x, y)` with the given advance width.
    pub fn horizontal(text: impl Into<String>, x: f32, y: f32, width: f32) -> Self {
        Self::new(text, Point::new(x, y), Point::new(x + width, y))
    }

    /// Bounding rectangle of the baseline.
    pub fn bounds(&self) -> Rect {
        bounding_box_of(self.start, self.end)
    }
}

/// One text-showing operation, optionally decomposed into per-glyph runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRender {
    /// The whole run
    pub run: TextRun,
    /// Per-glyph sub-runs, in drawing order. Empty when the producer does
    /// not decompose the run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub glyphs: Vec<TextRun>,
}

impl TextRender {
    /// A run without glyph decomposition.
    pub fn new(run: TextRun) -> Self {
        Self {
            run,
            glyphs: Vec::new(),
        }
    }

    /// Build a run from its glyphs. The run spans from the first glyph's start
    /// to the last glyph's end.
    pub fn from_glyphs(glyphs: Vec<TextRun>) -> Self {
        let start = glyphs.first().map(|g| g.start).unwrap_or_default();
        let end = glyphs.last().map(|g| g.end).unwrap_or(start);
        let text: String = glyphs.iter().map(|g| g.text.as_str()).collect();
        Self {
            run: TextRun::new(text, start, end),
            glyphs,
        }
    }

    /// The units that are individually tested against a keep area: the
    /// glyphs when present, otherwise the whole run.
    pub fn units(&self) -> &[TextRun] {
        if self.glyphs.is_empty() {
            std::slice::from_ref(&self.run)
        } else {
            &self.glyphs
        }
    }
}

/// A page rendering event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderEvent {
    /// Text was drawn.
    Text(TextRender),
    /// Any other content operator (state changes, paths, images...).
    Other {
        /// Content stream operator name
        operator: String,
    },
}

impl RenderEvent {
    /// Shorthand for a text event without glyph decomposition.
    pub fn text(run: TextRun) -> Self {
        RenderEvent::Text(TextRender::new(run))
    }

    /// Shorthand for a non-text event.
    pub fn other(operator: impl Into<String>) -> Self {
        RenderEvent::Other {
            operator: operator.into(),
        }
    }

    /// The text payload, if this is a text event.
    pub fn as_text(&self) -> Option<&TextRender> {
        match self {
            RenderEvent::Text(t) => Some(t),
            RenderEvent::Other { .. } => None,
        }
    }
}
