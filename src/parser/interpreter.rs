//! Content stream interpretation.
//!
//! Walks a page's decoded operations and yields [`RenderEvent`]s lazily.
//! Text-showing operators become one text event per string, decomposed into
//! one glyph run per character code; the glyph baseline goes from the
//! rendering-matrix origin to the origin advanced by the glyph width.
//!
//! Form XObjects painted with `Do` are interpreted in place, under the
//! form's `/Matrix` and with its own resources layered over the caller's.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document as LopdfDocument, Object, Stream};

use crate::error::{Error, Result};
use crate::geometry::{Matrix, Point};
use crate::model::{RenderEvent, TextRender, TextRun};

use super::fonts::{decode_text_simple, is_spaceless_script_char, number, resolve, FontMetrics};

/// `TJ` adjustments beyond this many thousandths of an em read as a word gap.
const WORD_GAP_THRESHOLD: f32 = 200.0;

/// Nesting limit for forms painting forms; also stops self-referencing forms.
const MAX_FORM_DEPTH: usize = 8;

/// Font resources by name.
pub type FontMap<'a> = BTreeMap<Vec<u8>, &'a Dictionary>;

/// XObject streams by name.
pub type XObjectMap<'a> = BTreeMap<Vec<u8>, &'a Stream>;

/// Text state parameters (saved and restored with `q`/`Q`).
#[derive(Debug, Clone)]
struct TextState {
    font: Option<Vec<u8>>,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scaling: f32,
    leading: f32,
    rise: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: None,
            font_size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scaling: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct GraphicsState {
    ctm: Matrix,
    text: TextState,
}

/// Caller state suspended while a form XObject is being interpreted.
struct FormFrame<'a> {
    operations: std::vec::IntoIter<Operation>,
    fonts: FontMap<'a>,
    xobjects: XObjectMap<'a>,
    metrics: HashMap<Vec<u8>, Rc<FontMetrics>>,
    gs: GraphicsState,
    gs_stack: Vec<GraphicsState>,
    tm: Matrix,
    tlm: Matrix,
}

/// Lazy iterator over the render events of one page.
pub struct ContentInterpreter<'a> {
    doc: &'a LopdfDocument,
    fonts: FontMap<'a>,
    xobjects: XObjectMap<'a>,
    metrics: HashMap<Vec<u8>, Rc<FontMetrics>>,
    operations: std::vec::IntoIter<Operation>,
    pending: VecDeque<RenderEvent>,
    gs: GraphicsState,
    gs_stack: Vec<GraphicsState>,
    /// Text matrix
    tm: Matrix,
    /// Text line matrix
    tlm: Matrix,
    forms: Vec<FormFrame<'a>>,
}

impl<'a> ContentInterpreter<'a> {
    /// Decode a content stream and prepare to interpret it.
    pub fn new(
        doc: &'a LopdfDocument,
        fonts: FontMap<'a>,
        content: &[u8],
    ) -> Result<Self> {
        let content = Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(Self {
            doc,
            fonts,
            xobjects: XObjectMap::new(),
            metrics: HashMap::new(),
            operations: content.operations.into_iter(),
            pending: VecDeque::new(),
            gs: GraphicsState::default(),
            gs_stack: Vec::new(),
            tm: Matrix::identity(),
            tlm: Matrix::identity(),
            forms: Vec::new(),
        })
    }

    /// XObjects that `Do` operators on this page can paint.
    pub fn with_xobjects(mut self, xobjects: XObjectMap<'a>) -> Self {
        self.xobjects = xobjects;
        self
    }

    /// Apply one operation. Text output is queued in `pending`; any other
    /// operator is returned as an [`RenderEvent::Other`].
    fn apply(&mut self, op: Operation) -> Option<RenderEvent> {
        let operands = &op.operands;
        match op.operator.as_str() {
            "BT" => {
                self.tm = Matrix::identity();
                self.tlm = Matrix::identity();
            }
            "q" => self.gs_stack.push(self.gs.clone()),
            "Q" => match self.gs_stack.pop() {
                Some(saved) => self.gs = saved,
                None => log::debug!("Unbalanced Q operator"),
            },
            "cm" => {
                if let Some(m) = matrix_operand(operands) {
                    self.gs.ctm = m.then(&self.gs.ctm);
                }
            }
            "Tf" => {
                if let Some(Object::Name(name)) = operands.first() {
                    self.select_font(name.clone());
                }
                if let Some(size) = operands.get(1).and_then(number) {
                    self.gs.text.font_size = size;
                }
            }
            "Tc" => {
                if let Some(v) = operands.first().and_then(number) {
                    self.gs.text.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = operands.first().and_then(number) {
                    self.gs.text.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = operands.first().and_then(number) {
                    self.gs.text.horizontal_scaling = v / 100.0;
                }
            }
            "TL" => {
                if let Some(v) = operands.first().and_then(number) {
                    self.gs.text.leading = v;
                }
            }
            "Ts" => {
                if let Some(v) = operands.first().and_then(number) {
                    self.gs.text.rise = v;
                }
            }
            "Td" | "TD" => {
                if operands.len() >= 2 {
                    let tx = number(&operands[0]).unwrap_or(0.0);
                    let ty = number(&operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        self.gs.text.leading = -ty;
                    }
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = matrix_operand(operands) {
                    self.tm = m;
                    self.tlm = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.queue_text(bytes);
                }
                return None;
            }
            "'" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.queue_text(bytes);
                }
                return None;
            }
            "\"" => {
                if let Some(aw) = operands.first().and_then(number) {
                    self.gs.text.word_spacing = aw;
                }
                if let Some(ac) = operands.get(1).and_then(number) {
                    self.gs.text.char_spacing = ac;
                }
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    self.queue_text(bytes);
                }
                return None;
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    self.queue_text_array(items);
                }
                return None;
            }
            "Do" => {
                if let Some(Object::Name(name)) = operands.first() {
                    self.enter_form(name);
                }
            }
            _ => {}
        }

        Some(RenderEvent::Other {
            operator: op.operator,
        })
    }

    /// Start interpreting the form XObject `name`; other XObjects are skipped.
    fn enter_form(&mut self, name: &[u8]) {
        let Some(stream) = self.xobjects.get(name).copied() else {
            log::debug!("XObject /{} not found", String::from_utf8_lossy(name));
            return;
        };
        let is_form = stream
            .dict
            .get(b"Subtype")
            .and_then(Object::as_name)
            .map(|subtype| subtype == b"Form")
            .unwrap_or(false);
        if !is_form {
            return;
        }
        if self.forms.len() >= MAX_FORM_DEPTH {
            log::warn!(
                "Form /{} nested deeper than {} levels, skipped",
                String::from_utf8_lossy(name),
                MAX_FORM_DEPTH
            );
            return;
        }

        let data = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());
        let content = match Content::decode(&data) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Form /{}: {}", String::from_utf8_lossy(name), e);
                return;
            }
        };

        let doc = self.doc;
        let matrix = stream
            .dict
            .get(b"Matrix")
            .ok()
            .and_then(|o| resolve(doc, o).as_array().ok())
            .and_then(|arr| {
                let values: Vec<Object> = arr.iter().map(|o| resolve(doc, o).clone()).collect();
                matrix_operand(&values)
            })
            .unwrap_or_else(Matrix::identity);

        // Forms without their own resources use the caller's
        let mut fonts = self.fonts.clone();
        let mut xobjects = self.xobjects.clone();
        if let Some(resources) = stream
            .dict
            .get(b"Resources")
            .ok()
            .and_then(|o| resolve(doc, o).as_dict().ok())
        {
            collect_fonts(doc, resources, &mut fonts);
            collect_xobjects(doc, resources, &mut xobjects);
        }

        let mut gs = self.gs.clone();
        gs.ctm = matrix.then(&self.gs.ctm);
        let caller = FormFrame {
            operations: std::mem::replace(&mut self.operations, content.operations.into_iter()),
            fonts: std::mem::replace(&mut self.fonts, fonts),
            xobjects: std::mem::replace(&mut self.xobjects, xobjects),
            metrics: std::mem::take(&mut self.metrics),
            gs: std::mem::replace(&mut self.gs, gs),
            gs_stack: std::mem::take(&mut self.gs_stack),
            tm: self.tm,
            tlm: self.tlm,
        };
        self.forms.push(caller);

        // The inherited font name now resolves against the form's resources
        if let Some(font) = self.gs.text.font.clone() {
            self.select_font(font);
        }
    }

    /// Resume the caller once a form's operations run out.
    fn leave_form(&mut self) -> bool {
        let Some(caller) = self.forms.pop() else {
            return false;
        };
        self.operations = caller.operations;
        self.fonts = caller.fonts;
        self.xobjects = caller.xobjects;
        self.metrics = caller.metrics;
        self.gs = caller.gs;
        self.gs_stack = caller.gs_stack;
        self.tm = caller.tm;
        self.tlm = caller.tlm;
        true
    }

    fn select_font(&mut self, name: Vec<u8>) {
        if !self.metrics.contains_key(&name) {
            let metrics = match self.fonts.get(name.as_slice()) {
                Some(dict) => FontMetrics::from_dict(self.doc, dict),
                None => {
                    log::debug!(
                        "Font resource /{} not found, using default metrics",
                        String::from_utf8_lossy(&name)
                    );
                    FontMetrics::default()
                }
            };
            self.metrics.insert(name.clone(), Rc::new(metrics));
        }
        self.gs.text.font = Some(name);
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translation(tx, ty).then(&self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        let leading = self.gs.text.leading;
        self.move_line(0.0, -leading);
    }

    /// Text rendering matrix for the current pen position.
    fn rendering_matrix(&self) -> Matrix {
        let ts = &self.gs.text;
        let tsm = Matrix::new(
            ts.font_size * ts.horizontal_scaling,
            0.0,
            0.0,
            ts.font_size,
            0.0,
            ts.rise,
        );
        tsm.then(&self.tm).then(&self.gs.ctm)
    }

    fn pen(&self) -> Point {
        self.rendering_matrix().transform(Point::new(0.0, 0.0))
    }

    /// Advance the text matrix horizontally by `tx` unscaled text space units.
    fn advance(&mut self, tx: f32) {
        self.tm = Matrix::translation(tx, 0.0).then(&self.tm);
    }

    fn current_metrics(&self) -> Rc<FontMetrics> {
        self.gs
            .text
            .font
            .as_ref()
            .and_then(|name| self.metrics.get(name))
            .cloned()
            .unwrap_or_default()
    }

    /// Show one string, returning its last decoded character.
    fn queue_text(&mut self, bytes: &[u8]) -> Option<char> {
        if bytes.is_empty() {
            return None;
        }

        let metrics = self.current_metrics();
        let doc = self.doc;
        let font_dict = self
            .gs
            .text
            .font
            .as_ref()
            .and_then(|name| self.fonts.get(name.as_slice()).copied());
        let encoding = font_dict.and_then(|f| f.get_font_encoding(doc).ok());

        let decode = |code: &[u8]| -> String {
            let decoded = match &encoding {
                Some(enc) => LopdfDocument::decode_text(enc, code).unwrap_or_default(),
                None => String::new(),
            };
            if decoded.is_empty() {
                decode_text_simple(code)
            } else {
                decoded
            }
        };

        let mut glyphs = Vec::with_capacity(bytes.len() / metrics.code_len.max(1));
        for code in bytes.chunks(metrics.code_len.max(1)) {
            let code_value = code.iter().fold(0u32, |acc, b| (acc << 8) | u32::from(*b));
            let w0 = metrics.width(code_value) / 1000.0;

            let trm = self.rendering_matrix();
            let start = trm.transform(Point::new(0.0, 0.0));
            let end = trm.transform(Point::new(w0, 0.0));
            glyphs.push(TextRun::new(decode(code), start, end));

            let ts = &self.gs.text;
            let mut spacing = ts.char_spacing;
            if code == b" " {
                spacing += ts.word_spacing;
            }
            let tx = (w0 * ts.font_size + spacing) * ts.horizontal_scaling;
            self.advance(tx);
        }

        let render = TextRender::from_glyphs(glyphs);
        let last = render.run.text.chars().last();
        self.pending.push_back(RenderEvent::Text(render));
        last
    }

    /// Show a `TJ` array: strings interleaved with position adjustments.
    fn queue_text_array(&mut self, items: &[Object]) {
        let mut last_char: Option<char> = None;

        for item in items {
            match item {
                Object::String(bytes, _) => {
                    if let Some(c) = self.queue_text(bytes) {
                        last_char = Some(c);
                    }
                }
                Object::Integer(_) | Object::Real(_) => {
                    let adjustment = -number(item).unwrap_or(0.0);
                    let before = self.pen();
                    let ts = &self.gs.text;
                    let tx = adjustment / 1000.0 * ts.font_size * ts.horizontal_scaling;
                    self.advance(tx);

                    let is_word_gap = adjustment > WORD_GAP_THRESHOLD
                        && last_char
                            .map(|c| !c.is_whitespace() && !is_spaceless_script_char(c))
                            .unwrap_or(false);
                    if is_word_gap {
                        let after = self.pen();
                        self.pending
                            .push_back(RenderEvent::text(TextRun::new(" ", before, after)));
                        last_char = Some(' ');
                    }
                }
                _ => {}
            }
        }
    }
}

impl Iterator for ContentInterpreter<'_> {
    type Item = RenderEvent;

    fn next(&mut self) -> Option<RenderEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            let Some(op) = self.operations.next() else {
                if self.leave_form() {
                    continue;
                }
                return None;
            };
            if let Some(event) = self.apply(op) {
                return Some(event);
            }
        }
    }
}

/// Add the fonts of a resource dictionary, replacing same-named entries.
pub(crate) fn collect_fonts<'a>(
    doc: &'a LopdfDocument,
    resources: &'a Dictionary,
    fonts: &mut FontMap<'a>,
) {
    let Some(dict) = resources
        .get(b"Font")
        .ok()
        .and_then(|o| resolve(doc, o).as_dict().ok())
    else {
        return;
    };
    for (name, value) in dict.iter() {
        if let Ok(font) = resolve(doc, value).as_dict() {
            fonts.insert(name.clone(), font);
        }
    }
}

/// Add the XObjects of a resource dictionary, replacing same-named entries.
pub(crate) fn collect_xobjects<'a>(
    doc: &'a LopdfDocument,
    resources: &'a Dictionary,
    xobjects: &mut XObjectMap<'a>,
) {
    let Some(dict) = resources
        .get(b"XObject")
        .ok()
        .and_then(|o| resolve(doc, o).as_dict().ok())
    else {
        return;
    };
    for (name, value) in dict.iter() {
        if let Ok(stream) = resolve(doc, value).as_stream() {
            xobjects.insert(name.clone(), stream);
        }
    }
}

/// Read six numeric operands as a matrix.
fn matrix_operand(operands: &[Object]) -> Option<Matrix> {
    if operands.len() < 6 {
        return None;
    }
    let v: Vec<f32> = operands[..6].iter().filter_map(number).collect();
    if v.len() != 6 {
        return None;
    }
    Some(Matrix::new(v[0], v[1], v[2], v[3], v[4], v[5]))
}
