//! Document source abstraction.
//!
//! The analysis pipelines never touch document bytes; they consume
//! [`DocumentContent`] produced by a [`DocumentSource`]. [`LopdfSource`] is
//! the bundled implementation; tests and embedders can supply their own.

use std::path::Path;

use lopdf::Document as LopdfDocument;

use crate::detect::sniff_path;
use crate::error::{Error, Result};
use crate::model::{DocumentContent, PageContent};

use super::layout::PageExtractor;
use super::options::{ErrorMode, ParseOptions};

/// Something that can turn a path into positioned text.
pub trait DocumentSource: Send + Sync {
    /// Load every page of the document at `path`.
    fn load(&self, path: &Path) -> Result<DocumentContent>;
}

/// Display name of a document: its file name, or the whole path.
pub fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// [`DocumentSource`] backed by `lopdf`.
#[derive(Debug, Clone, Default)]
pub struct LopdfSource {
    options: ParseOptions,
}

impl LopdfSource {
    /// Create a source with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source with custom options.
    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Options in effect.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Extract pages from an already loaded document.
    pub fn read_document(&self, name: &str, doc: &LopdfDocument) -> Result<DocumentContent> {
        let extractor = PageExtractor::new(doc, self.options.normalize_unicode);
        let mut content = DocumentContent::new(name);

        for (index, (_, page_id)) in doc.get_pages().into_iter().enumerate() {
            let number = index as u32 + 1;
            match extractor.extract_page(number, page_id) {
                Ok(page) => content.add_page(page),
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!("{}: skipping text of page {}: {}", name, number, e);
                    content.add_page(PageContent::new(number));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(content)
    }

    /// Load a document from an in-memory byte slice.
    pub fn load_bytes(&self, name: &str, data: &[u8]) -> Result<DocumentContent> {
        crate::detect::sniff_bytes(data)?;
        let doc = LopdfDocument::load_mem(data).map_err(Error::from)?;
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        self.read_document(name, &doc)
    }
}

impl DocumentSource for LopdfSource {
    fn load(&self, path: &Path) -> Result<DocumentContent> {
        let header = sniff_path(path)?;
        log::debug!("{}: PDF {}", path.display(), header.version);

        let doc = LopdfDocument::load(path).map_err(Error::from)?;
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }

        self.read_document(&document_name(path), &doc)
    }
}
