//! Span extraction from PDF content streams.
//!
//! Walks the text operators of a page, tracking the text matrix to recover
//! each span's position and effective font size, then rebuilds the page's
//! plain text by grouping spans that share a baseline.

use std::collections::{BTreeMap, HashMap};

use lopdf::{Document as LopdfDocument, Object, ObjectId};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::{BBox, PageContent, Span};

/// Fraction of the font size below the baseline (descender).
const DESCENT: f32 = 0.2;
/// Fraction of the font size above the baseline (ascender).
const ASCENT: f32 = 0.8;
/// Average glyph advance as a fraction of the font size.
const GLYPH_ADVANCE: f32 = 0.5;
/// TJ adjustment (thousandths of an em) treated as a word space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Extracts spans and plain text from the pages of one document.
pub(crate) struct PageExtractor<'a> {
    doc: &'a LopdfDocument,
    normalize_unicode: bool,
}

impl<'a> PageExtractor<'a> {
    pub(crate) fn new(doc: &'a LopdfDocument, normalize_unicode: bool) -> Self {
        Self {
            doc,
            normalize_unicode,
        }
    }

    /// Extract one page. `number` is the 1-based page number.
    pub(crate) fn extract_page(&self, number: u32, page_id: ObjectId) -> Result<PageContent> {
        let lopdf_fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let base_fonts: HashMap<Vec<u8>, String> = lopdf_fonts
            .iter()
            .map(|(name, font)| {
                let base_font = font
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| String::from_utf8_lossy(n).to_string())
                    .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                (name.clone(), base_font)
            })
            .collect();

        let content = self.page_content(page_id)?;
        let spans = self.parse_spans(number, &content, &base_fonts, &lopdf_fonts)?;
        let text = lines_to_text(&spans);

        Ok(PageContent::with_content(number, spans, text))
    }

    /// Concatenated, decompressed content streams of a page.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without content streams is blank, not broken.
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                // Unfiltered streams fail to "decompress"; use their raw bytes.
                Ok(Object::Stream(s)) => Ok(s
                    .decompressed_content()
                    .unwrap_or_else(|_| s.content.clone())),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            let data = s
                                .decompressed_content()
                                .unwrap_or_else(|_| s.content.clone());
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn parse_spans(
        &self,
        page: u32,
        content: &[u8],
        base_fonts: &HashMap<Vec<u8>, String>,
        lopdf_fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    ) -> Result<Vec<Span>> {
        if content.is_empty() {
            return Ok(Vec::new());
        }

        let content = lopdf::content::Content::decode(content)
            .map_err(|e| Error::TextExtract(e.to_string()))?;

        let mut spans = Vec::new();
        let mut font_resource: Vec<u8> = Vec::new();
        let mut font_name = String::new();
        let mut font_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut in_text_block = false;

        for op in &content.operations {
            let operands = &op.operands;
            let shown = match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    matrix = TextMatrix::default();
                    None
                }
                "ET" => {
                    in_text_block = false;
                    None
                }
                "Tf" if operands.len() >= 2 => {
                    if let Object::Name(name) = &operands[0] {
                        font_resource = name.clone();
                        font_name = base_fonts
                            .get(name)
                            .cloned()
                            .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                    }
                    font_size = number(&operands[1]).unwrap_or(12.0);
                    None
                }
                "TL" if !operands.is_empty() => {
                    matrix.leading = number(&operands[0]).unwrap_or(matrix.leading);
                    None
                }
                "Td" if operands.len() >= 2 => {
                    let tx = number(&operands[0]).unwrap_or(0.0);
                    let ty = number(&operands[1]).unwrap_or(0.0);
                    matrix.translate(tx, ty);
                    None
                }
                "TD" if operands.len() >= 2 => {
                    let tx = number(&operands[0]).unwrap_or(0.0);
                    let ty = number(&operands[1]).unwrap_or(0.0);
                    matrix.leading = -ty;
                    matrix.translate(tx, ty);
                    None
                }
                "Tm" if operands.len() >= 6 => {
                    let v: Vec<f32> = operands
                        .iter()
                        .take(6)
                        .map(|o| number(o).unwrap_or(0.0))
                        .collect();
                    matrix.set(v[0], v[1], v[2], v[3], v[4], v[5]);
                    None
                }
                "T*" => {
                    matrix.next_line();
                    None
                }
                "Tj" if in_text_block => match operands.first() {
                    Some(Object::String(bytes, _)) => {
                        Some(self.decode(&font_resource, lopdf_fonts, bytes))
                    }
                    _ => None,
                },
                "TJ" if in_text_block => match operands.first() {
                    Some(Object::Array(items)) => {
                        Some(self.decode_tj(&font_resource, lopdf_fonts, items))
                    }
                    _ => None,
                },
                "'" | "\"" => {
                    matrix.next_line();
                    let idx = if op.operator == "\"" { 2 } else { 0 };
                    match (in_text_block, operands.get(idx)) {
                        (true, Some(Object::String(bytes, _))) => {
                            Some(self.decode(&font_resource, lopdf_fonts, bytes))
                        }
                        _ => None,
                    }
                }
                _ => None,
            };

            let Some(raw) = shown else { continue };
            let text = if self.normalize_unicode {
                raw.nfkc().collect::<String>()
            } else {
                raw
            };
            let text = text.trim();
            if text.is_empty() {
                continue;
            }

            let (x, y) = matrix.position();
            let size = font_size * matrix.scale();
            let width = text.chars().count() as f32 * size * GLYPH_ADVANCE;
            let bbox = BBox::new(x, y - size * DESCENT, x + width, y + size * ASCENT);

            spans.push(
                Span::new(text, size, page)
                    .with_font(font_name.clone())
                    .with_bbox(bbox),
            );
            matrix.advance(width / matrix.scale().max(f32::EPSILON));
        }

        Ok(spans)
    }

    fn decode(
        &self,
        font_resource: &[u8],
        lopdf_fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        bytes: &[u8],
    ) -> String {
        let encoding = lopdf_fonts
            .get(font_resource)
            .and_then(|f| f.get_font_encoding(self.doc).ok());

        match encoding {
            Some(ref enc) => LopdfDocument::decode_text(enc, bytes)
                .unwrap_or_else(|_| decode_text_simple(bytes)),
            None => decode_text_simple(bytes),
        }
    }

    /// Decode a TJ array, turning large negative kerning into word spaces.
    fn decode_tj(
        &self,
        font_resource: &[u8],
        lopdf_fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        items: &[Object],
    ) -> String {
        let mut combined = String::new();

        for item in items {
            match item {
                Object::String(bytes, _) => {
                    combined.push_str(&self.decode(font_resource, lopdf_fonts, bytes));
                }
                Object::Integer(_) | Object::Real(_) => {
                    let adjustment = -number(item).unwrap_or(0.0);
                    let ends_spaced = combined.ends_with(' ') || combined.ends_with('\u{00A0}');
                    let spaceless = combined
                        .chars()
                        .last()
                        .map(is_spaceless_script_char)
                        .unwrap_or(true);
                    if adjustment > TJ_SPACE_THRESHOLD && !ends_spaced && !spaceless {
                        combined.push(' ');
                    }
                }
                _ => {}
            }
        }

        combined
    }
}

/// Rebuild plain text from spans: one output line per baseline, top to bottom.
pub(crate) fn lines_to_text(spans: &[Span]) -> String {
    if spans.is_empty() {
        return String::new();
    }

    let baseline = |s: &Span| s.bbox.y0 + s.font_size * DESCENT;

    let mut ordered: Vec<&Span> = spans.iter().collect();
    ordered.sort_by(|a, b| {
        baseline(b)
            .total_cmp(&baseline(a))
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_y: Option<f32> = None;

    for span in ordered {
        let y = baseline(span);
        let same_line = current_y
            .map(|cy| (y - cy).abs() <= span.font_size * 0.3)
            .unwrap_or(false);

        if !same_line {
            if current_y.is_some() {
                lines.push(std::mem::take(&mut current));
            }
            current_y = Some(y);
        } else {
            let joins_cjk = current
                .chars()
                .last()
                .zip(span.text.chars().next())
                .map(|(a, b)| is_spaceless_script_char(a) && is_spaceless_script_char(b))
                .unwrap_or(false);
            if !joins_cjk && !current.ends_with(' ') {
                current.push(' ');
            }
        }
        current.push_str(&span.text);
    }
    lines.push(current);

    lines.join("\n")
}

/// Text matrix for tracking position in content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    /// Line start, restored by T* and quote operators
    line_e: f32,
    line_f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
            leading: 12.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        *self = Self {
            a,
            b,
            c,
            d,
            e,
            f,
            line_e: e,
            line_f: f,
            leading: self.leading,
        };
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    /// Move along the baseline after showing text (unscaled units).
    fn advance(&mut self, tx: f32) {
        self.e += tx * self.a;
        self.f += tx * self.b;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Scripts written without spaces between words (Chinese, Japanese).
fn is_spaceless_script_char(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{20000}'..='\u{2EBEF}'
        | '\u{3040}'..='\u{309F}'
        | '\u{30A0}'..='\u{30FF}'
        | '\u{3000}'..='\u{303F}')
}

/// Decoding fallback when the font has no usable encoding.
fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFEu8, 0xFF][..]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
