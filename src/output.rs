//! Writing extracted text to disk.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Write `text` to `path` atomically.
///
/// The text goes to a temporary file in the destination directory which is
/// then renamed over `path`. A failed write leaves any existing file intact.
pub fn write_text<P: AsRef<Path>>(path: P, text: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(text.as_bytes())?;
    file.flush()?;
    file.persist(path).map_err(|e| Error::Io(e.error))?;

    log::debug!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}
