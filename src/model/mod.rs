//! Data model shared by the outline and relevance pipelines.
//!
//! Spans and pages come from a document source; everything else is
//! derived from them and is immutable once produced.

mod outline;
mod page;
mod section;

pub use outline::{HeadingCandidate, HeadingLevel, OutlineEntry, OutlineResult};
pub use page::{
    flags_from_font_name, BBox, DocumentContent, PageContent, Span, FLAG_BOLD, FLAG_ITALIC,
    FLAG_MONOSPACE, FLAG_SERIF,
};
pub use section::{
    DocumentFailure, ExtractedSection, RefinedAnalysis, RelevanceReport, ReportMetadata,
    ScoredSection, Section, SectionLevel,
};
