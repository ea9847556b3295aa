//! Body-text extraction: resolve the content window, then filter each page.
//!
//! # Example
//!
//! ```no_run
//! use pdfbody::extract::{BodyExtractor, ExtractOptions};
//! use pdfbody::PdfDocument;
//!
//! fn main() -> pdfbody::Result<()> {
//!     let doc = PdfDocument::open("book.pdf")?;
//!     let options = ExtractOptions::new().with_start_marker("Chapter 1");
//!
//!     let extraction = BodyExtractor::new(options).extract_report(&doc)?;
//!     println!("pages {:?}: {} chars", extraction.window, extraction.stats.chars);
//!     Ok(())
//! }
//! ```

mod options;

pub use options::{ErrorMode, ExtractOptions, DEFAULT_END_MARKERS, DEFAULT_START_MARKER};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::filter::AreaFilter;
use crate::geometry::{inset_margins, Rect};
use crate::model::PageSource;
use crate::scan::{ExtractionWindow, MarkerScanner};

/// Separator appended after every page's text.
pub const PAGE_SEPARATOR: char = '\n';

/// Initial buffer reservation per page in the window.
const PAGE_CAPACITY_HINT: usize = 2048;

/// Result of an extraction run, with the resolved window and statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Kept text of every page in the window, each followed by a newline
    pub text: String,

    /// Pages the text was taken from
    pub window: ExtractionWindow,

    /// Extraction statistics
    pub stats: ExtractionStats,
}

/// Statistics collected during extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages extracted (the window size)
    pub pages: u32,

    /// Pages treated as empty because they could not be decoded
    pub pages_skipped: u32,

    /// Text units kept inside the keep-rectangles
    pub glyphs_kept: u64,

    /// Text units dropped as margin content
    pub glyphs_dropped: u64,

    /// Characters in the output, separators included
    pub chars: u64,
}

/// Extracts the main body text of a document.
///
/// The run is all-or-nothing: any failure returns an error and no text.
#[derive(Debug, Clone, Default)]
pub struct BodyExtractor {
    options: ExtractOptions,
}

impl BodyExtractor {
    /// Create an extractor with the given options.
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract the body text.
    pub fn extract<S>(&self, source: &S) -> Result<String>
    where
        S: PageSource + ?Sized,
    {
        self.extract_report(source).map(|extraction| extraction.text)
    }

    /// Extract the body text along with the window and statistics.
    pub fn extract_report<S>(&self, source: &S) -> Result<Extraction>
    where
        S: PageSource + ?Sized,
    {
        self.options.validate()?;

        let scanner = MarkerScanner::with_error_mode(self.options.error_mode);
        let window = scanner.resolve_window(
            source,
            &self.options.start_marker,
            &self.options.end_markers,
        )?;

        let mut text = String::with_capacity(window.len() as usize * PAGE_CAPACITY_HINT);
        let mut stats = ExtractionStats::default();
        let mut filter = AreaFilter::new(Rect::default());

        for page in window.pages() {
            let page_box = source.page_box(page)?;
            let keep = inset_margins(&page_box, &self.options.margins);
            if !keep.is_well_formed() {
                return Err(Error::InvalidMargins {
                    page,
                    width: keep.width,
                    height: keep.height,
                });
            }
            filter.set_area(keep);

            match source.render_events(page) {
                Ok(events) => {
                    let page_text = filter.extract_page(events);
                    log::debug!("Page {}: kept {} bytes", page, page_text.len());
                    text.push_str(&page_text);
                }
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!("Page {} could not be decoded, treating as empty: {}", page, e);
                    stats.pages_skipped += 1;
                }
                Err(e) => return Err(e),
            }
            text.push(PAGE_SEPARATOR);

            let counts = filter.take_stats();
            stats.glyphs_kept += counts.kept;
            stats.glyphs_dropped += counts.dropped;
            stats.pages += 1;
        }

        stats.chars = text.chars().count() as u64;
        log::info!(
            "Extracted {} pages: {} units kept, {} dropped, {} chars",
            stats.pages,
            stats.glyphs_kept,
            stats.glyphs_dropped,
            stats.chars
        );

        Ok(Extraction {
            text,
            window,
            stats,
        })
    }
}
