//! In-memory document source shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use pdfsift::parser::document_name;
use pdfsift::{DocumentContent, DocumentSource, Error, PageContent, Result, Span};

/// Serves prepared documents by file name; unknown names fail to load.
#[derive(Default)]
pub struct FakeSource {
    documents: HashMap<String, DocumentContent>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, doc: DocumentContent) -> Self {
        self.documents.insert(doc.name.clone(), doc);
        self
    }
}

impl DocumentSource for FakeSource {
    fn load(&self, path: &Path) -> Result<DocumentContent> {
        self.documents
            .get(&document_name(path))
            .cloned()
            .ok_or_else(|| Error::PdfParse(format!("cannot open {}", path.display())))
    }
}

/// A page built from `(text, font_size)` lines, one span per line.
pub fn page(number: u32, lines: &[(&str, f32)]) -> PageContent {
    let spans = lines
        .iter()
        .map(|(text, size)| Span::new(*text, *size, number))
        .collect();
    let text = lines
        .iter()
        .map(|(text, _)| *text)
        .collect::<Vec<_>>()
        .join("\n");
    PageContent::with_content(number, spans, text)
}

/// A document named `name` with the given pages.
pub fn document(name: &str, pages: Vec<PageContent>) -> DocumentContent {
    let mut doc = DocumentContent::new(name);
    for page in pages {
        doc.add_page(page);
    }
    doc
}

/// Create empty placeholder files so directory discovery finds them.
pub fn touch_all(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            std::fs::write(&path, b"%PDF-1.4\n").unwrap();
            path
        })
        .collect()
}
