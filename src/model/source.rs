//! The page content model: page geometry plus a lazy stream of render events.

use crate::error::{Error, Result};
use crate::geometry::Rect;

use super::RenderEvent;

/// Lazy, single-pass stream of render events for one page.
pub type Events<'a> = Box<dyn Iterator<Item = RenderEvent> + 'a>;

/// Read-only access to a paginated document.
///
/// Pages are numbered from 1. Every call to [`PageSource::render_events`]
/// starts a fresh traversal of the page.
pub trait PageSource {
    /// Total number of pages.
    fn page_count(&self) -> u32;

    /// Bounding box of a page.
    fn page_box(&self, page: u32) -> Result<Rect>;

    /// Render events of a page, in drawing order.
    fn render_events(&self, page: u32) -> Result<Events<'_>>;

    /// Full text of a page with no geometric filtering.
    fn page_text(&self, page: u32) -> Result<String> {
        Ok(collect_text(self.render_events(page)?))
    }
}

impl<T: PageSource + ?Sized> PageSource for &T {
    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn page_box(&self, page: u32) -> Result<Rect> {
        (**self).page_box(page)
    }

    fn render_events(&self, page: u32) -> Result<Events<'_>> {
        (**self).render_events(page)
    }

    fn page_text(&self, page: u32) -> Result<String> {
        (**self).page_text(page)
    }
}

/// Concatenate the text of every text event, in order.
pub fn collect_text<I>(events: I) -> String
where
    I: IntoIterator<Item = RenderEvent>,
{
    let mut text = String::new();
    for event in events {
        if let RenderEvent::Text(render) = event {
            text.push_str(&render.run.text);
        }
    }
    text
}

/// Fail with [`Error::PageOutOfRange`] unless `page` is in `1..=count`.
pub fn check_page(page: u32, count: u32) -> Result<()> {
    if page == 0 || page > count {
        return Err(Error::PageOutOfRange(page, count));
    }
    Ok(())
}
