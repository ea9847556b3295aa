//! Font metrics and character code decoding.

use std::collections::HashMap;

use lopdf::{Dictionary, Document as LopdfDocument, Object};

/// Fallback advance for fonts without width information, in glyph space
/// (thousandths of an em).
const DEFAULT_GLYPH_WIDTH: f32 = 500.0;

/// Courier is monospaced; every glyph advances 600 units.
const COURIER_GLYPH_WIDTH: f32 = 600.0;

/// Default advance for composite (Type0) fonts without `/DW`.
const DEFAULT_CID_WIDTH: f32 = 1000.0;

/// Glyph advance widths of one font resource.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    /// Base font name (e.g., "Helvetica-Bold")
    pub base_font: String,
    /// Bytes per character code (1 for simple fonts, 2 for Type0)
    pub code_len: usize,
    widths: HashMap<u32, f32>,
    /// `c_first c_last w` entries of a CID `/W` array, kept unexpanded
    ranges: Vec<(u32, u32, f32)>,
    default_width: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            base_font: "Unknown".to_string(),
            code_len: 1,
            widths: HashMap::new(),
            ranges: Vec::new(),
            default_width: DEFAULT_GLYPH_WIDTH,
        }
    }
}

impl FontMetrics {
    /// Read metrics from a font dictionary.
    pub fn from_dict(doc: &LopdfDocument, font: &Dictionary) -> Self {
        let base_font = font
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let subtype = font
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .unwrap_or(b"");

        if subtype == b"Type0" {
            Self::composite(doc, font, base_font)
        } else {
            Self::simple(doc, font, base_font)
        }
    }

    fn simple(doc: &LopdfDocument, font: &Dictionary, base_font: String) -> Self {
        let first_char = font
            .get(b"FirstChar")
            .ok()
            .and_then(|o| number(resolve(doc, o)))
            .unwrap_or(0.0) as u32;

        let mut widths = HashMap::new();
        if let Some(array) = font
            .get(b"Widths")
            .ok()
            .and_then(|o| resolve(doc, o).as_array().ok())
        {
            for (i, w) in array.iter().enumerate() {
                let Some(code) = u32::try_from(i).ok().and_then(|i| first_char.checked_add(i))
                else {
                    break;
                };
                if let Some(w) = number(resolve(doc, w)) {
                    widths.insert(code, w);
                }
            }
        }

        let missing_width = font
            .get(b"FontDescriptor")
            .ok()
            .and_then(|o| resolve(doc, o).as_dict().ok())
            .and_then(|d| d.get(b"MissingWidth").ok())
            .and_then(|o| number(resolve(doc, o)));

        let default_width = missing_width.unwrap_or_else(|| {
            if base_font.contains("Courier") {
                COURIER_GLYPH_WIDTH
            } else {
                DEFAULT_GLYPH_WIDTH
            }
        });

        Self {
            base_font,
            code_len: 1,
            widths,
            ranges: Vec::new(),
            default_width,
        }
    }

    fn composite(doc: &LopdfDocument, font: &Dictionary, base_font: String) -> Self {
        let descendant = font
            .get(b"DescendantFonts")
            .ok()
            .and_then(|o| resolve(doc, o).as_array().ok())
            .and_then(|arr| arr.first())
            .and_then(|o| resolve(doc, o).as_dict().ok());

        let mut metrics = Self {
            base_font,
            code_len: 2,
            widths: HashMap::new(),
            ranges: Vec::new(),
            default_width: DEFAULT_CID_WIDTH,
        };

        let Some(cid_font) = descendant else {
            return metrics;
        };

        if let Some(dw) = cid_font.get(b"DW").ok().and_then(|o| number(resolve(doc, o))) {
            metrics.default_width = dw;
        }

        if let Some(w) = cid_font
            .get(b"W")
            .ok()
            .and_then(|o| resolve(doc, o).as_array().ok())
        {
            parse_cid_widths(doc, w, &mut metrics.widths, &mut metrics.ranges);
        }

        metrics
    }

    /// Advance width of a character code, in glyph space units.
    pub fn width(&self, code: u32) -> f32 {
        if let Some(width) = self.widths.get(&code) {
            return *width;
        }
        self.ranges
            .iter()
            .rev()
            .find(|(first, last, _)| (*first..=*last).contains(&code))
            .map(|(_, _, width)| *width)
            .unwrap_or(self.default_width)
    }
}

/// Parse a CID `/W` array: `c [w1 w2 ...]` or `c_first c_last w`.
fn parse_cid_widths(
    doc: &LopdfDocument,
    w: &[Object],
    widths: &mut HashMap<u32, f32>,
    ranges: &mut Vec<(u32, u32, f32)>,
) {
    let mut i = 0;
    while i < w.len() {
        let Some(first) = number(resolve(doc, &w[i])) else {
            i += 1;
            continue;
        };
        let first = first as u32;

        match w.get(i + 1).map(|o| resolve(doc, o)) {
            Some(Object::Array(list)) => {
                for (offset, width) in list.iter().enumerate() {
                    let Some(code) = u32::try_from(offset)
                        .ok()
                        .and_then(|offset| first.checked_add(offset))
                    else {
                        break;
                    };
                    if let Some(width) = number(resolve(doc, width)) {
                        widths.insert(code, width);
                    }
                }
                i += 2;
            }
            Some(last) => {
                let last = number(last).map(|l| l as u32);
                let width = w.get(i + 2).and_then(|o| number(resolve(doc, o)));
                if let (Some(last), Some(width)) = (last, width) {
                    if first <= last {
                        ranges.push((first, last, width));
                    }
                }
                i += 3;
            }
            None => break,
        }
    }
}

/// Follow an indirect reference, leaving direct objects untouched.
pub(crate) fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Helper to extract a number from a PDF object.
pub(crate) fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Decode bytes without a font encoding: UTF-16BE with BOM, then UTF-8,
/// then Latin-1.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// Scripts written without spaces between words (CJK ideographs, kana).
pub(crate) fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        // Hiragana, Katakana
        || (0x3040..=0x30FF).contains(&code)
        // CJK symbols and punctuation
        || (0x3000..=0x303F).contains(&code)
}
