//! Boundary detection: locate the pages that open and close the main content.
//!
//! Both scans read each page's full, unfiltered text and test for a literal,
//! case-sensitive substring. The start scan walks forward from page 1, the
//! end scan walks backward from the last page so it finds the *last*
//! occurrence.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extract::ErrorMode;
use crate::model::PageSource;

/// Inclusive, 1-based page range holding the main content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionWindow {
    /// First page (contains the start marker)
    pub start: u32,
    /// Last page (contains an end marker)
    pub end: u32,
}

impl ExtractionWindow {
    /// The pages covered by this window.
    pub fn pages(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }

    /// Number of pages covered.
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start) + 1
    }

    /// Windows always cover at least one page.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Scans documents for marker text.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerScanner {
    error_mode: ErrorMode,
}

impl MarkerScanner {
    /// Create a scanner that fails on undecodable pages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scanner with the given error mode.
    pub fn with_error_mode(error_mode: ErrorMode) -> Self {
        Self { error_mode }
    }

    /// First page, scanning forward, whose text contains `marker`.
    pub fn find_start_page<S>(&self, source: &S, marker: &str) -> Result<Option<u32>>
    where
        S: PageSource + ?Sized,
    {
        for page in 1..=source.page_count() {
            if self.page_text(source, page)?.contains(marker) {
                log::debug!("Start marker {:?} found on page {}", marker, page);
                return Ok(Some(page));
            }
        }
        Ok(None)
    }

    /// Last page, scanning backward, whose text contains any of `markers`.
    pub fn find_end_page<S, M>(&self, source: &S, markers: &[M]) -> Result<Option<u32>>
    where
        S: PageSource + ?Sized,
        M: AsRef<str>,
    {
        for page in (1..=source.page_count()).rev() {
            let text = self.page_text(source, page)?;
            if let Some(marker) = markers.iter().find(|m| text.contains(m.as_ref())) {
                log::debug!("End marker {:?} found on page {}", marker.as_ref(), page);
                return Ok(Some(page));
            }
        }
        Ok(None)
    }

    /// Resolve both boundaries. Fails unless both are found and in order.
    pub fn resolve_window<S, M>(
        &self,
        source: &S,
        start_marker: &str,
        end_markers: &[M],
    ) -> Result<ExtractionWindow>
    where
        S: PageSource + ?Sized,
        M: AsRef<str>,
    {
        let start = self.find_start_page(source, start_marker)?;
        let end = self.find_end_page(source, end_markers)?;

        let (start, end) = match (start, end) {
            (Some(start), Some(end)) => (start, end),
            (start, end) => {
                let mut missing = Vec::new();
                if start.is_none() {
                    missing.push(format!("start marker {:?}", start_marker));
                }
                if end.is_none() {
                    let names: Vec<&str> = end_markers.iter().map(AsRef::as_ref).collect();
                    missing.push(format!("any end marker {:?}", names));
                }
                return Err(Error::BoundaryNotFound(missing.join(" or ")));
            }
        };

        if end < start {
            return Err(Error::EmptyWindow { start, end });
        }

        let window = ExtractionWindow { start, end };
        log::info!("Content window: pages {}-{}", start, end);
        Ok(window)
    }

    fn page_text<S>(&self, source: &S, page: u32) -> Result<String>
    where
        S: PageSource + ?Sized,
    {
        match source.page_text(page) {
            Ok(text) => Ok(text),
            Err(e) if self.error_mode == ErrorMode::Lenient => {
                log::warn!("Skipping unreadable page {} while scanning: {}", page, e);
                Ok(String::new())
            }
            Err(e) => Err(e),
        }
    }
}
