//! Page segmentation into titled sections.

use crate::model::{DocumentContent, HeadingCandidate, Section, SectionLevel, Span};
use crate::outline::{average_font_size, SpanClassifier};
use crate::text::clean_text;

/// Lines of page text taken as a section's content.
pub const CONTENT_WINDOW_LINES: usize = 10;

/// Splits pages into sections anchored at heading candidates.
///
/// Headings are found against the page's own mean font size, and every
/// section found this way is recorded as H2; levels are not resolved
/// per page.
#[derive(Debug, Clone, Default)]
pub struct SectionSegmenter {
    classifier: SpanClassifier,
}

impl SectionSegmenter {
    /// Create a segmenter with the standard classifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Heading candidates of one page, judged against the page-local baseline.
    pub fn find_page_headings(&self, spans: &[Span], page_number: u32) -> Vec<HeadingCandidate> {
        if spans.is_empty() {
            return Vec::new();
        }

        let avg_font_size = average_font_size(spans);
        spans
            .iter()
            .filter(|span| self.classifier.is_heading_span(span, avg_font_size))
            .map(|span| HeadingCandidate::new(clean_text(&span.text), span.font_size, page_number))
            .collect()
    }

    /// Sections of one page. `page_number` is 1-based.
    ///
    /// A page without headings becomes a single "Page N" section holding
    /// the full page text, unless the page is blank.
    pub fn segment_page(
        &self,
        document: &str,
        spans: &[Span],
        plain_text: &str,
        page_number: u32,
    ) -> Vec<Section> {
        let headings = self.find_page_headings(spans, page_number);

        if headings.is_empty() {
            if plain_text.trim().is_empty() {
                return Vec::new();
            }
            return vec![Section {
                document: document.to_string(),
                page: page_number,
                title: format!("Page {}", page_number),
                content: plain_text.to_string(),
                heading_level: SectionLevel::Content,
            }];
        }

        headings
            .into_iter()
            .map(|heading| Section {
                document: document.to_string(),
                page: page_number,
                content: section_content(plain_text, &heading.text),
                title: heading.text,
                heading_level: SectionLevel::H2,
            })
            .collect()
    }

    /// Sections of every page of a document, in page order.
    pub fn segment_document(&self, doc: &DocumentContent) -> Vec<Section> {
        doc.pages
            .iter()
            .enumerate()
            .flat_map(|(index, page)| {
                self.segment_page(&doc.name, &page.spans, &page.text, index as u32 + 1)
            })
            .collect()
    }
}

/// Content window for a heading.
///
/// The first line containing the heading (case-insensitive) anchors the
/// window: the following ten lines joined by spaces. When no line matches,
/// the page's first ten lines are used instead.
pub fn section_content(page_text: &str, heading: &str) -> String {
    let lines: Vec<&str> = page_text.split('\n').collect();
    let needle = heading.to_lowercase();

    match lines
        .iter()
        .position(|line| line.to_lowercase().contains(&needle))
    {
        Some(index) => {
            let start = index + 1;
            let end = (start + CONTENT_WINDOW_LINES).min(lines.len());
            lines[start..end].join(" ").trim().to_string()
        }
        None => lines
            .iter()
            .take(CONTENT_WINDOW_LINES)
            .copied()
            .collect::<Vec<_>>()
            .join(" "),
    }
}
