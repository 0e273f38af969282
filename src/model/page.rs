//! Positioned text as delivered by a document source.

use serde::{Deserialize, Serialize};

/// Font flag: italic or oblique face.
pub const FLAG_ITALIC: u32 = 2;
/// Font flag: serif face.
pub const FLAG_SERIF: u32 = 4;
/// Font flag: monospaced face.
pub const FLAG_MONOSPACE: u32 = 8;
/// Font flag: bold face.
pub const FLAG_BOLD: u32 = 16;

/// Axis-aligned bounding box `(x0, y0, x1, y1)` in page points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    /// Create a bounding box from its corners.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// A run of text sharing one font, with its position on the page.
///
/// Spans are produced by a [`DocumentSource`](crate::parser::DocumentSource)
/// and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Text content, already trimmed by the source
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    /// Style bits (see the `FLAG_*` constants)
    pub font_flags: u32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Bounding box on the page
    pub bbox: BBox,
    /// Page number (1-indexed)
    pub page: u32,
}

impl Span {
    /// Create a span with default flags, font name and bounding box.
    pub fn new(text: impl Into<String>, font_size: f32, page: u32) -> Self {
        Self {
            text: text.into(),
            font_size,
            font_flags: 0,
            font_name: String::new(),
            bbox: BBox::default(),
            page,
        }
    }

    /// Set the font name and derive style flags from it.
    pub fn with_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = font_name.into();
        self.font_flags = flags_from_font_name(&self.font_name);
        self
    }

    /// Set the bounding box.
    pub fn with_bbox(mut self, bbox: BBox) -> Self {
        self.bbox = bbox;
        self
    }

    /// Whether the bold flag is set.
    pub fn is_bold(&self) -> bool {
        self.font_flags & FLAG_BOLD != 0
    }

    /// Whether the italic flag is set.
    pub fn is_italic(&self) -> bool {
        self.font_flags & FLAG_ITALIC != 0
    }
}

/// Derive style flags from a PostScript-style font name.
pub fn flags_from_font_name(font_name: &str) -> u32 {
    let name = font_name.to_lowercase();
    let mut flags = 0;

    if name.contains("bold") || name.contains("black") || name.contains("heavy") {
        flags |= FLAG_BOLD;
    }
    if name.contains("italic") || name.contains("oblique") {
        flags |= FLAG_ITALIC;
    }
    if name.contains("courier") || name.contains("mono") || name.contains("consolas") {
        flags |= FLAG_MONOSPACE;
    }
    if name.contains("times") || (name.contains("serif") && !name.contains("sans")) {
        flags |= FLAG_SERIF;
    }

    flags
}

/// The spans and plain text of one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// Page number (1-indexed)
    pub number: u32,
    /// Spans in reading order
    pub spans: Vec<Span>,
    /// Plain text with one line per visual line
    pub text: String,
}

impl PageContent {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            ..Default::default()
        }
    }

    /// Create a page from spans and plain text.
    pub fn with_content(number: u32, spans: Vec<Span>, text: impl Into<String>) -> Self {
        Self {
            number,
            spans,
            text: text.into(),
        }
    }

    /// Whether the page has no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// All pages of a loaded document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentContent {
    /// Document name (file name for documents loaded from disk)
    pub name: String,
    /// Pages in order
    pub pages: Vec<PageContent>,
}

impl DocumentContent {
    /// Create an empty document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pages: Vec::new(),
        }
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: PageContent) {
        self.pages.push(page);
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, number: u32) -> Option<&PageContent> {
        if number == 0 {
            return None;
        }
        self.pages.get((number - 1) as usize)
    }

    /// Iterate over every span of every page.
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.pages.iter().flat_map(|page| page.spans.iter())
    }

    /// Plain text of the whole document, pages separated by a newline.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| format!("{}\n", page.text))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_flags_from_name() {
        assert_eq!(flags_from_font_name("Helvetica-Bold"), FLAG_BOLD);
        assert_eq!(flags_from_font_name("Helvetica-Oblique"), FLAG_ITALIC);
        assert_eq!(
            flags_from_font_name("Times-BoldItalic"),
            FLAG_BOLD | FLAG_ITALIC | FLAG_SERIF
        );
        assert_eq!(flags_from_font_name("Courier"), FLAG_MONOSPACE);
        assert_eq!(flags_from_font_name("DejaVuSans"), 0);
    }

    #[test]
    fn test_span_builder() {
        let span = Span::new("Intro", 18.0, 1)
            .with_font("Arial-BoldMT")
            .with_bbox(BBox::new(72.0, 700.0, 150.0, 718.0));
        assert!(span.is_bold());
        assert!(!span.is_italic());
        assert_eq!(span.bbox.width(), 78.0);
        assert_eq!(span.bbox.height(), 18.0);
    }

    #[test]
    fn test_document_page_lookup() {
        let mut doc = DocumentContent::new("a.pdf");
        doc.add_page(PageContent::with_content(1, vec![], "first"));
        doc.add_page(PageContent::with_content(2, vec![], "second"));

        assert_eq!(doc.page_count(), 2);
        assert!(doc.get_page(0).is_none());
        assert_eq!(doc.get_page(2).unwrap().text, "second");
        assert!(doc.get_page(3).is_none());
        assert_eq!(doc.plain_text(), "first\nsecond\n");
    }

    #[test]
    fn test_blank_page() {
        assert!(PageContent::with_content(1, vec![], "  \n\t").is_blank());
        assert!(!PageContent::with_content(1, vec![], "x").is_blank());
    }
}
