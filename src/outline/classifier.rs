//! Heading candidate classification from typographic signals.

use regex::Regex;

use crate::model::Span;
use crate::text::{clean_text, is_all_upper, is_title_case};

/// Baseline used when no font sizes were observed.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Minimum points for a span to count as a heading.
const ACCEPT_THRESHOLD: u8 = 3;

/// Minimum length of the cleaned heading text.
const MIN_HEADING_CHARS: usize = 3;

/// Decides whether a text span looks like a heading.
///
/// Points are awarded for a font noticeably larger than the baseline (+2),
/// short text (+1), upper- or title-case (+1), a trailing colon (+1) and a
/// numbering or label pattern (+2). Three points or more accept the span.
/// The baseline is always passed in explicitly: the outline uses a
/// document-wide average, section segmentation a page-local one.
#[derive(Debug, Clone)]
pub struct SpanClassifier {
    patterns: Vec<Regex>,
}

impl SpanClassifier {
    /// Create a classifier with the standard heading patterns.
    pub fn new() -> Self {
        let patterns = [
            // "1. Intro", "2) Scope"
            r"^\d+[.)]\s+",
            // "CHAPTER ", "A. "
            r"^[A-Z]+[.\s]+",
            // "Chapter 1", "Section 12"
            r"^\w+\s+\d+",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("static pattern"))
        .collect();

        Self { patterns }
    }

    /// Heuristic score of `text` set at `font_size` against `avg_font_size`.
    pub fn score(&self, text: &str, font_size: f32, avg_font_size: f64) -> u8 {
        let trimmed = text.trim();
        let ratio = if avg_font_size > 0.0 {
            f64::from(font_size) / avg_font_size
        } else {
            1.0
        };

        let mut score = 0;
        if ratio > 1.1 {
            score += 2;
        }
        if text.chars().count() < 100 {
            score += 1;
        }
        if is_all_upper(text) || is_title_case(text) {
            score += 1;
        }
        if trimmed.ends_with(':') {
            score += 1;
        }
        if self.patterns.iter().any(|p| p.is_match(trimmed)) {
            score += 2;
        }
        score
    }

    /// Whether `text` set at `font_size` is a heading candidate.
    ///
    /// Text that cleans down to fewer than three characters, such as a row
    /// of ornament glyphs, is never a heading.
    pub fn is_heading(&self, text: &str, font_size: f32, avg_font_size: f64) -> bool {
        if clean_text(text).chars().count() < MIN_HEADING_CHARS {
            return false;
        }
        self.score(text, font_size, avg_font_size) >= ACCEPT_THRESHOLD
    }

    /// [`is_heading`](Self::is_heading) for a span.
    pub fn is_heading_span(&self, span: &Span, avg_font_size: f64) -> bool {
        self.is_heading(&span.text, span.font_size, avg_font_size)
    }
}

impl Default for SpanClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Mean font size of `spans`, or [`DEFAULT_FONT_SIZE`] when there are none.
pub fn average_font_size<'a, I>(spans: I) -> f64
where
    I: IntoIterator<Item = &'a Span>,
{
    let (sum, count) = spans
        .into_iter()
        .fold((0.0f64, 0usize), |(sum, count), span| {
            (sum + f64::from(span.font_size), count + 1)
        });

    if count == 0 {
        DEFAULT_FONT_SIZE
    } else {
        sum / count as f64
    }
}
