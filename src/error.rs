//! Error types for pdfbody.

use std::io;
use thiserror::Error;

/// Result type alias for pdfbody operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting body text.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading the input or writing the output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input document could not be read (missing, unreadable, truncated).
    #[error("Cannot open input document: {0}")]
    Open(io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure or a page content stream.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and cannot be decoded.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// The start marker and/or every end marker are absent from the document.
    #[error("Could not find {0} in the document")]
    BoundaryNotFound(String),

    /// The last end-marker page comes before the first start-marker page.
    #[error("End marker page {end} comes before start marker page {start}")]
    EmptyWindow {
        /// Resolved start page.
        start: u32,
        /// Resolved end page.
        end: u32,
    },

    /// Margins leave no room on a page.
    #[error("Margins exceed page {page}: keep area would be {width} x {height}")]
    InvalidMargins {
        /// Page whose box is too small for the margins.
        page: u32,
        /// Resulting keep-rectangle width.
        width: f32,
        /// Resulting keep-rectangle height.
        height: f32,
    },

    /// Extraction options are unusable.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Configuration file could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Whether the input could not be opened or decoded as a document.
    pub fn is_open_failure(&self) -> bool {
        matches!(
            self,
            Error::Open(_)
                | Error::UnknownFormat
                | Error::UnsupportedVersion(_)
                | Error::PdfParse(_)
                | Error::Encrypted
        )
    }

    /// Whether the content window could not be resolved.
    pub fn is_boundary_failure(&self) -> bool {
        matches!(self, Error::BoundaryNotFound(_) | Error::EmptyWindow { .. })
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

/// Classify a failure to load the input document.
///
/// Anything that goes wrong before the document is decoded, I/O included,
/// is an open failure rather than a generic I/O error.
pub(crate) fn open_error(err: Error) -> Error {
    match err {
        Error::Io(e) => Error::Open(e),
        other => other,
    }
}
