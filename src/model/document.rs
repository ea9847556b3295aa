//! In-memory documents.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::Rect;

use super::source::check_page;
use super::{Events, PageSource, RenderEvent, TextRender, TextRun};

/// A document held entirely in memory.
///
/// Useful for synthetic inputs and for replaying events captured from
/// another decoder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryDocument {
    /// Pages in order
    pub pages: Vec<MemoryPage>,
}

/// A single page of an [`InMemoryDocument`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryPage {
    /// Page bounding box
    pub media_box: Rect,
    /// Render events in drawing order
    pub events: Vec<RenderEvent>,
}

impl MemoryPage {
    /// Create an empty page.
    pub fn new(media_box: Rect) -> Self {
        Self {
            media_box,
            events: Vec::new(),
        }
    }

    /// Append a text run.
    pub fn push_run(&mut self, run: TextRun) -> &mut Self {
        self.events.push(RenderEvent::text(run));
        self
    }

    /// Append a horizontal text run at `(x, y)`.
    pub fn push_text(&mut self, text: &str, x: f32, y: f32, width: f32) -> &mut Self {
        self.push_run(TextRun::horizontal(text, x, y, width))
    }

    /// Append a horizontal run split into equally wide glyphs.
    pub fn push_glyphs(&mut self, text: &str, x: f32, y: f32, glyph_width: f32) -> &mut Self {
        let glyphs = text
            .chars()
            .enumerate()
            .map(|(i, c)| {
                TextRun::horizontal(c.to_string(), x + i as f32 * glyph_width, y, glyph_width)
            })
            .collect();
        self.events
            .push(RenderEvent::Text(TextRender::from_glyphs(glyphs)));
        self
    }

    /// Append a non-text event.
    pub fn push_other(&mut self, operator: &str) -> &mut Self {
        self.events.push(RenderEvent::other(operator));
        self
    }
}

impl InMemoryDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page and return it for population.
    pub fn add_page(&mut self, media_box: Rect) -> &mut MemoryPage {
        self.pages.push(MemoryPage::new(media_box));
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Get a page by number (1-indexed).
    pub fn page(&self, page_num: u32) -> Option<&MemoryPage> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    fn checked_page(&self, page_num: u32) -> Result<&MemoryPage> {
        check_page(page_num, self.page_count())?;
        Ok(&self.pages[(page_num - 1) as usize])
    }
}

impl PageSource for InMemoryDocument {
    fn page_count(&self) -> u32 {
        u32::try_from(self.pages.len()).unwrap_or(u32::MAX)
    }

    fn page_box(&self, page: u32) -> Result<Rect> {
        Ok(self.checked_page(page)?.media_box)
    }

    fn render_events(&self, page: u32) -> Result<Events<'_>> {
        let page = self.checked_page(page)?;
        Ok(Box::new(page.events.iter().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn letter() -> Rect {
        Rect::new(0.0, 0.0, 612.0, 792.0)
    }

    #[test]
    fn test_pages_are_one_indexed() {
        let mut doc = InMemoryDocument::new();
        doc.add_page(letter()).push_text("first", 100.0, 400.0, 30.0);
        doc.add_page(letter()).push_text("second", 100.0, 400.0, 36.0);

        assert_eq!(doc.page_count(), 2);
        assert!(doc.page(0).is_none());
        assert_eq!(doc.page_text(1).unwrap(), "first");
        assert_eq!(doc.page_text(2).unwrap(), "second");
        assert!(matches!(doc.page_box(3), Err(Error::PageOutOfRange(3, 2))));
    }

    #[test]
    fn test_render_events_restart_per_call() {
        let mut doc = InMemoryDocument::new();
        doc.add_page(letter())
            .push_other("BT")
            .push_glyphs("abc", 100.0, 400.0, 5.0)
            .push_other("ET");

        let first: Vec<_> = doc.render_events(1).unwrap().collect();
        let second: Vec<_> = doc.render_events(1).unwrap().collect();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);

        let text = first[1].as_text().unwrap();
        assert_eq!(text.glyphs.len(), 3);
        assert_eq!(text.run.text, "abc");
    }

    #[test]
    fn test_json_roundtrip_preserves_page_boxes() {
        let mut doc = InMemoryDocument::new();
        doc.add_page(Rect::new(0.0, 0.0, 595.0, 842.0))
            .push_text("x", 1.0, 2.0, 3.0);
        let json = serde_json::to_string(&doc).unwrap();
        let back: InMemoryDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back.page_box(1).unwrap(), Rect::new(0.0, 0.0, 595.0, 842.0));
    }
}
