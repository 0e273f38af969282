//! Title and heading outline extraction.
//!
//! Every span of the document is classified against the document-wide mean
//! font size; accepted spans become heading candidates, and their distinct
//! sizes decide the H1/H2/H3 levels.
//!
//! ```no_run
//! use pdfsift::outline::OutlineExtractor;
//! use pdfsift::parser::LopdfSource;
//!
//! let extractor = OutlineExtractor::new();
//! let result = extractor.extract_file(&LopdfSource::new(), "report.pdf".as_ref())?;
//! println!("{} ({} headings)", result.title, result.outline.len());
//! # Ok::<(), pdfsift::Error>(())
//! ```

mod classifier;
mod hierarchy;
mod title;

pub use classifier::{average_font_size, SpanClassifier, DEFAULT_FONT_SIZE};
pub use hierarchy::{assign_levels, distinct_sizes, level_for_size, MAX_OUTLINE_ENTRIES};
pub use title::{detect_title, UNTITLED};

use std::path::Path;

use crate::error::Result;
use crate::model::{DocumentContent, HeadingCandidate, OutlineResult};
use crate::parser::DocumentSource;
use crate::text::clean_text;

/// Builds [`OutlineResult`]s from loaded documents.
#[derive(Debug, Clone, Default)]
pub struct OutlineExtractor {
    classifier: SpanClassifier,
}

impl OutlineExtractor {
    /// Create an extractor with the standard classifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Heading candidates of a document, in page then detection order.
    pub fn find_candidates(&self, doc: &DocumentContent) -> Vec<HeadingCandidate> {
        let avg_font_size = average_font_size(doc.spans());

        doc.pages
            .iter()
            .enumerate()
            .flat_map(|(index, page)| {
                let number = index as u32 + 1;
                page.spans
                    .iter()
                    .filter(move |span| self.classifier.is_heading_span(span, avg_font_size))
                    .map(move |span| {
                        HeadingCandidate::new(clean_text(&span.text), span.font_size, number)
                    })
            })
            .collect()
    }

    /// Title and outline of a loaded document.
    ///
    /// Returns an empty title when the first page has no text; callers
    /// loading from disk substitute the file stem.
    pub fn extract(&self, doc: &DocumentContent) -> OutlineResult {
        let title = doc
            .pages
            .first()
            .and_then(|page| detect_title(&page.spans))
            .unwrap_or_default();

        let candidates = self.find_candidates(doc);
        let outline = assign_levels(&candidates);
        log::info!(
            "{}: {} heading candidates, {} outline entries",
            doc.name,
            candidates.len(),
            outline.len()
        );

        OutlineResult { title, outline }
    }

    /// Load a document from `path` and extract its outline.
    pub fn extract_file(&self, source: &dyn DocumentSource, path: &Path) -> Result<OutlineResult> {
        log::info!("Extracting outline from: {}", path.display());
        let doc = source.load(path)?;
        let mut result = self.extract(&doc);

        if result.title.is_empty() {
            result.title = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }

        Ok(result)
    }
}

/// Load a document from `path` and extract its outline with the standard
/// classifier.
pub fn extract_outline(source: &dyn DocumentSource, path: &Path) -> Result<OutlineResult> {
    OutlineExtractor::new().extract_file(source, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, PageContent, Span};

    fn doc_with_pages(pages: Vec<Vec<Span>>) -> DocumentContent {
        let mut doc = DocumentContent::new("test.pdf");
        for (i, spans) in pages.into_iter().enumerate() {
            doc.add_page(PageContent::with_content(i as u32 + 1, spans, ""));
        }
        doc
    }

    #[test]
    fn test_extract_outline_from_spans() {
        let doc = doc_with_pages(vec![
            vec![
                Span::new("Annual Report", 24.0, 1),
                Span::new("1. Overview", 16.0, 1),
                Span::new("this page describes the overall picture of the year", 10.0, 1),
                Span::new("and continues with more detail about operations", 10.0, 1),
            ],
            vec![
                Span::new("2. Results", 16.0, 2),
                Span::new("revenue grew in every region we operate in today", 10.0, 2),
            ],
        ]);

        let result = OutlineExtractor::new().extract(&doc);
        assert_eq!(result.title, "Annual Report");
        assert_eq!(result.outline.len(), 3);
        assert_eq!(result.outline[0].level, HeadingLevel::H1);
        assert_eq!(result.outline[1].text, "1. Overview");
        assert_eq!(result.outline[1].level, HeadingLevel::H2);
        assert_eq!(result.outline[2].page, 2);
    }

    #[test]
    fn test_candidate_text_is_cleaned() {
        let doc = doc_with_pages(vec![vec![
            Span::new("★ Key   Findings:", 18.0, 1),
            Span::new("plain words in body copy for reference only", 10.0, 1),
        ]]);
        let candidates = OutlineExtractor::new().find_candidates(&doc);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "Key Findings:");
    }

    #[test]
    fn test_ornament_line_is_not_an_entry() {
        let doc = doc_with_pages(vec![vec![
            Span::new("Report Title", 20.0, 1),
            Span::new("★★★★", 20.0, 1),
            Span::new("the body of the report starts on this line", 10.0, 1),
            Span::new("and carries on for a while after that", 10.0, 1),
        ]]);
        let result = OutlineExtractor::new().extract(&doc);
        assert_eq!(result.outline.len(), 1);
        assert_eq!(result.outline[0].text, "Report Title");
        assert!(result.outline.iter().all(|e| e.text.chars().count() >= 3));
    }

    #[test]
    fn test_document_wide_baseline() {
        // Page 2 alone would make "Section Heading" average-sized; against the
        // whole document it stands out.
        let doc = doc_with_pages(vec![
            vec![Span::new("many small words here and there", 10.0, 1); 6],
            vec![Span::new("Section Heading", 14.0, 2)],
        ]);
        let candidates = OutlineExtractor::new().find_candidates(&doc);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].page, 2);
    }

    #[test]
    fn test_empty_document() {
        let result = OutlineExtractor::new().extract(&DocumentContent::new("empty.pdf"));
        assert!(result.title.is_empty());
        assert!(result.outline.is_empty());
    }
}
