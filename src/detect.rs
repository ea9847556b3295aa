//! PDF header sniffing.
//!
//! Inputs are checked for a `%PDF-x.y` header before being handed to the
//! decoder so that wrong-format files fail early with a clear error.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Readers tolerate junk before the header; scan this many leading bytes.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Read the header of a file and return its PDF version (e.g., "1.7").
pub fn sniff_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut head = Vec::with_capacity(HEADER_SEARCH_WINDOW);
    File::open(path)?
        .take(HEADER_SEARCH_WINDOW as u64)
        .read_to_end(&mut head)?;
    sniff_bytes(&head)
}

/// Return the PDF version declared at the start of `data`.
pub fn sniff_bytes(data: &[u8]) -> Result<String> {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    let offset = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let version_bytes = window
        .get(offset + PDF_MAGIC.len()..offset + PDF_MAGIC.len() + 3)
        .ok_or(Error::UnknownFormat)?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }
    Ok(version)
}

/// Whether `data` starts like a PDF document.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    sniff_bytes(data).is_ok()
}

/// Versions look like "1.7" or "2.0".
fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3
        && matches!(bytes[0], b'1' | b'2')
        && bytes[1] == b'.'
        && bytes[2].is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_versions() {
        assert_eq!(sniff_bytes(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap(), "1.7");
        assert_eq!(sniff_bytes(b"%PDF-2.0\n").unwrap(), "2.0");
    }

    #[test]
    fn test_sniff_tolerates_leading_junk() {
        assert_eq!(sniff_bytes(b"\r\n\xef\xbb\xbf%PDF-1.4\n").unwrap(), "1.4");
    }

    #[test]
    fn test_sniff_rejects_other_formats() {
        assert!(matches!(sniff_bytes(b"<!DOCTYPE html>"), Err(Error::UnknownFormat)));
        assert!(matches!(sniff_bytes(b"%PDF"), Err(Error::UnknownFormat)));
        assert!(matches!(sniff_bytes(b""), Err(Error::UnknownFormat)));
        assert!(matches!(
            sniff_bytes(b"%PDF-x.y"),
            Err(Error::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_is_pdf_bytes() {
        assert!(is_pdf_bytes(b"%PDF-1.4\n"));
        assert!(!is_pdf_bytes(b"Not a PDF"));
    }

    #[test]
    fn test_version_validation() {
        assert!(is_valid_version("1.0"));
        assert!(is_valid_version("2.0"));
        assert!(!is_valid_version("10.0"));
        assert!(!is_valid_version("3.0"));
        assert!(!is_valid_version("abc"));
    }
}
