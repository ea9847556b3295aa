//! lopdf-backed implementation of the page content model.

use std::io::Read;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::detect::{sniff_bytes, sniff_path};
use crate::error::{open_error, Error, Result};
use crate::geometry::Rect;
use crate::model::{check_page, Events, PageSource};

use super::fonts::{number, resolve};
use super::interpreter::{collect_xobjects, ContentInterpreter, XObjectMap};

/// US Letter, used when no page box can be found.
const DEFAULT_PAGE_BOX: Rect = Rect {
    x: 0.0,
    y: 0.0,
    width: 612.0,
    height: 792.0,
};

/// Guards `/Parent` walks against cyclic page trees.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// A decoded PDF document.
///
/// The underlying file is read once at open time; dropping the value
/// releases everything.
pub struct PdfDocument {
    doc: LopdfDocument,
    pages: Vec<ObjectId>,
    version: String,
}

impl PdfDocument {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        sniff_path(path).map_err(open_error)?;
        let doc = LopdfDocument::load(path).map_err(|e| open_error(e.into()))?;
        Ok(Self::from_lopdf(doc))
    }

    /// Decode a PDF held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        sniff_bytes(data)?;
        let doc = LopdfDocument::load_mem(data).map_err(|e| open_error(e.into()))?;
        Ok(Self::from_lopdf(doc))
    }

    /// Decode a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data).map_err(Error::Open)?;
        Self::from_bytes(&data)
    }

    /// Wrap an already loaded lopdf document.
    pub fn from_lopdf(doc: LopdfDocument) -> Self {
        let pages = doc.get_pages().into_values().collect();
        let version = doc.version.to_string();
        log::debug!("Loaded PDF {} document", version);
        Self {
            doc,
            pages,
            version,
        }
    }

    /// Direct access to the underlying `lopdf::Document`.
    pub fn raw_doc(&self) -> &LopdfDocument {
        &self.doc
    }

    /// PDF version string from the file header.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        check_page(page, self.page_count())?;
        Ok(self.pages[(page - 1) as usize])
    }

    fn page_dict(&self, page_id: ObjectId) -> Result<&Dictionary> {
        self.doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))
    }

    /// Look up a page attribute, walking up the page tree when absent.
    fn inherited<'a>(&'a self, page: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
        let mut current = page;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Ok(obj) = current.get(key) {
                return Some(resolve(&self.doc, obj));
            }
            let parent = current.get(b"Parent").ok()?.as_reference().ok()?;
            current = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }

    /// XObjects reachable from a page's resources, nearest definition winning.
    fn page_xobjects(&self, page: u32, page_id: ObjectId) -> XObjectMap<'_> {
        let mut xobjects = XObjectMap::new();
        let (direct, inherited) = match self.doc.get_page_resources(page_id) {
            Ok(resources) => resources,
            Err(e) => {
                log::warn!("Page {}: cannot read XObject resources: {}", page, e);
                return xobjects;
            }
        };
        for id in inherited.iter().rev() {
            if let Ok(resources) = self.doc.get_dictionary(*id) {
                collect_xobjects(&self.doc, resources, &mut xobjects);
            }
        }
        if let Some(resources) = direct {
            collect_xobjects(&self.doc, resources, &mut xobjects);
        }
        xobjects
    }

    /// Concatenated, decompressed content streams of a page.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self.page_dict(page_id)?;

        let Ok(contents) = page_dict.get(b"Contents") else {
            // A page without content is blank, not broken
            return Ok(Vec::new());
        };

        match resolve(&self.doc, contents) {
            // Unfiltered streams fail to "decompress"; use their raw bytes
            Object::Stream(s) => Ok(s
                .decompressed_content()
                .unwrap_or_else(|_| s.content.clone())),
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Stream(s) = resolve(&self.doc, obj) {
                        match s.decompressed_content() {
                            Ok(data) => content.extend_from_slice(&data),
                            Err(_) => content.extend_from_slice(&s.content),
                        }
                        content.push(b' ');
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> u32 {
        u32::try_from(self.pages.len()).unwrap_or(u32::MAX)
    }

    fn page_box(&self, page: u32) -> Result<Rect> {
        let page_dict = self.page_dict(self.page_id(page)?)?;

        let media_box = self
            .inherited(page_dict, b"MediaBox")
            .and_then(|o| o.as_array().ok())
            .and_then(|arr| rect_from_array(&self.doc, arr));

        Ok(media_box.unwrap_or_else(|| {
            log::debug!("Page {} has no MediaBox, assuming US Letter", page);
            DEFAULT_PAGE_BOX
        }))
    }

    fn render_events(&self, page: u32) -> Result<Events<'_>> {
        let page_id = self.page_id(page)?;
        let content = self.page_content(page_id)?;

        let fonts = self.doc.get_page_fonts(page_id).unwrap_or_else(|e| {
            log::warn!("Page {}: cannot read font resources: {}", page, e);
            Default::default()
        });

        let interpreter = ContentInterpreter::new(&self.doc, fonts, &content)
            .map_err(|e| Error::PdfParse(format!("Page {}: {}", page, e)))?
            .with_xobjects(self.page_xobjects(page, page_id));
        Ok(Box::new(interpreter))
    }
}

/// Normalize a `[llx lly urx ury]` array into a rectangle.
fn rect_from_array(doc: &LopdfDocument, arr: &[Object]) -> Option<Rect> {
    if arr.len() < 4 {
        return None;
    }
    let v: Vec<f32> = arr[..4]
        .iter()
        .filter_map(|o| number(resolve(doc, o)))
        .collect();
    if v.len() != 4 {
        return None;
    }
    Some(Rect::from_corners(v[0], v[1], v[2], v[3]))
}
