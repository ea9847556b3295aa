//! # pdfbody
//!
//! Extract the main body text of a PDF, leaving out front matter, back
//! matter, running headers, footers and page numbers.
//!
//! The body is bounded twice:
//!
//! - **By page**: from the first page mentioning a start marker
//!   (default `"Introduction"`) to the last page mentioning any end marker
//!   (default `"Epilogue"` or `"Conclusion"`), both inclusive.
//! - **By area**: on each of those pages only text whose baseline lies
//!   inside the page box minus fixed margins is kept.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfbody::extract_file;
//!
//! fn main() -> pdfbody::Result<()> {
//!     let text = extract_file("book.pdf")?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```
//!
//! ## Custom options
//!
//! ```no_run
//! use pdfbody::{extract_file_with_options, ExtractOptions, Margins};
//!
//! let options = ExtractOptions::new()
//!     .with_start_marker("Chapter 1")
//!     .with_end_markers(["Afterword"])
//!     .with_margins(Margins::new(40.0, 40.0, 60.0, 60.0));
//! let text = extract_file_with_options("book.pdf", &options)?;
//! # Ok::<(), pdfbody::Error>(())
//! ```
//!
//! Anything implementing [`PageSource`] can be extracted from, including
//! the in-memory [`InMemoryDocument`].

pub mod detect;
pub mod error;
pub mod extract;
pub mod filter;
pub mod geometry;
pub mod model;
pub mod output;
pub mod parser;
pub mod scan;

// Re-export commonly used types
pub use detect::{is_pdf_bytes, sniff_bytes, sniff_path};
pub use error::{Error, Result};
pub use extract::{BodyExtractor, ErrorMode, ExtractOptions, Extraction, ExtractionStats};
pub use filter::{AreaFilter, FilterStats};
pub use geometry::{bounding_box_of, contains, inset_margins, Margins, Matrix, Point, Rect};
pub use model::{InMemoryDocument, PageSource, RenderEvent, TextRender, TextRun};
pub use output::write_text;
pub use parser::PdfDocument;
pub use scan::{ExtractionWindow, MarkerScanner};

use std::io::Read;
use std::path::Path;

/// Extract the body text of a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// use pdfbody::extract_file;
///
/// let text = extract_file("book.pdf").unwrap();
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<String> {
    extract_file_with_options(path, &ExtractOptions::default())
}

/// Extract the body text of a PDF file.
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<String> {
    options.validate()?;
    let doc = PdfDocument::open(path)?;
    BodyExtractor::new(options.clone()).extract(&doc)
}

/// Extract the body text of a PDF held in memory with default options.
///
/// # Example
///
/// ```no_run
/// use pdfbody::extract_bytes;
///
/// let data = std::fs::read("book.pdf").unwrap();
/// let text = extract_bytes(&data).unwrap();
/// ```
pub fn extract_bytes(data: &[u8]) -> Result<String> {
    extract_bytes_with_options(data, &ExtractOptions::default())
}

/// Extract the body text of a PDF held in memory.
pub fn extract_bytes_with_options(data: &[u8], options: &ExtractOptions) -> Result<String> {
    options.validate()?;
    let doc = PdfDocument::from_bytes(data)?;
    BodyExtractor::new(options.clone()).extract(&doc)
}

/// Extract the body text of a PDF read from `reader`.
pub fn extract_reader<R: Read>(reader: R, options: &ExtractOptions) -> Result<String> {
    options.validate()?;
    let doc = PdfDocument::from_reader(reader)?;
    BodyExtractor::new(options.clone()).extract(&doc)
}

/// Extract a PDF file's body text and write it to `output`.
///
/// Nothing is written unless extraction succeeds.
///
/// # Example
///
/// ```no_run
/// use pdfbody::{extract_file_to, ExtractOptions};
///
/// let report = extract_file_to("book.pdf", "book.txt", &ExtractOptions::default())?;
/// println!("pages {}-{}", report.window.start, report.window.end);
/// # Ok::<(), pdfbody::Error>(())
/// ```
pub fn extract_file_to<P, Q>(input: P, output: Q, options: &ExtractOptions) -> Result<Extraction>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    options.validate()?;
    let extraction = {
        let doc = PdfDocument::open(input)?;
        BodyExtractor::new(options.clone()).extract_report(&doc)?
    };
    write_text(output, &extraction.text)?;
    Ok(extraction)
}
