//! Extraction options and configuration loading.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::Margins;

/// Marker that opens the main content by default.
pub const DEFAULT_START_MARKER: &str = "Introduction";

/// Markers that close the main content by default.
pub const DEFAULT_END_MARKERS: [&str; 2] = ["Epilogue", "Conclusion"];

/// Options controlling a body-text extraction run.
///
/// Deserializes from JSON; missing fields take their defaults:
///
/// ```json
/// {
///   "start_marker": "Chapter 1",
///   "end_markers": ["Appendix"],
///   "margins": { "top": 72, "bottom": 72 },
///   "error_mode": "lenient"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Text whose first occurrence marks the first page
    pub start_marker: String,

    /// Texts whose last occurrence (any of them) marks the last page
    pub end_markers: Vec<String>,

    /// Margins trimmed from every page before filtering
    pub margins: Margins,

    /// Error handling mode for undecodable pages
    pub error_mode: ErrorMode,
}

impl ExtractOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start marker.
    pub fn with_start_marker(mut self, marker: impl Into<String>) -> Self {
        self.start_marker = marker.into();
        self
    }

    /// Replace the end markers.
    pub fn with_end_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.end_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Add an end marker, ignoring duplicates.
    pub fn add_end_marker(mut self, marker: impl Into<String>) -> Self {
        let marker = marker.into();
        if !self.end_markers.contains(&marker) {
            self.end_markers.push(marker);
        }
        self
    }

    /// Set the margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (treat undecodable pages as empty).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Parse options from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check that the options can drive an extraction.
    pub fn validate(&self) -> Result<()> {
        if self.start_marker.is_empty() {
            return Err(Error::InvalidOptions("start marker is empty".to_string()));
        }
        if self.end_markers.is_empty() {
            return Err(Error::InvalidOptions("no end markers given".to_string()));
        }
        if self.end_markers.iter().any(String::is_empty) {
            return Err(Error::InvalidOptions("end marker is empty".to_string()));
        }
        if !self.margins.is_valid() {
            return Err(Error::InvalidOptions(format!(
                "margins must be finite and non-negative: {:?}",
                self.margins
            )));
        }
        Ok(())
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            start_marker: DEFAULT_START_MARKER.to_string(),
            end_markers: DEFAULT_END_MARKERS.iter().map(|m| m.to_string()).collect(),
            margins: Margins::default(),
            error_mode: ErrorMode::Strict,
        }
    }
}

/// Error handling mode for pages that cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Log and treat the page as empty
    Lenient,
}
