//! Page content model.
//!
//! A document is seen as a sequence of pages, each exposing its bounding box
//! and a lazy stream of [`RenderEvent`]s. The PDF decoder in
//! [`crate::parser`] and [`InMemoryDocument`] both implement [`PageSource`].

mod document;
mod event;
mod source;

pub use document::{InMemoryDocument, MemoryPage};
pub use event::{RenderEvent, TextRender, TextRun};
pub use source::{check_page, collect_text, Events, PageSource};
