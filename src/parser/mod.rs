//! PDF decoding: document loading, font metrics and content interpretation.

mod backend;
mod fonts;
mod interpreter;

pub use backend::PdfDocument;
pub use fonts::{decode_text_simple, FontMetrics};
pub use interpreter::{ContentInterpreter, FontMap, XObjectMap};
