//! Section and relevance report types.

use serde::{Deserialize, Serialize};

/// Structural level recorded on a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionLevel {
    H1,
    H2,
    H3,
    /// A whole page without any detected heading
    #[serde(rename = "content")]
    Content,
}

/// A titled slice of page text.
///
/// `content` is a fixed window of lines following the heading line,
/// not the full extent of the section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub document: String,
    /// Page number (1-indexed)
    pub page: u32,
    pub title: String,
    pub content: String,
    pub heading_level: SectionLevel,
}

impl Section {
    /// Text handed to the relevance scorer: title and content.
    pub fn scoring_text(&self) -> String {
        format!("{} {}", self.title, self.content)
    }
}

/// A section with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSection {
    #[serde(flatten)]
    pub section: Section,
    pub relevance_score: f32,
}

/// Short extractive summary of a top-ranked section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinedAnalysis {
    pub document: String,
    pub page: u32,
    pub refined_text: String,
}

/// One ranked entry of `extracted_sections`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSection {
    pub document: String,
    pub page: u32,
    pub section_title: String,
    /// Rank starting at 1
    pub importance_rank: usize,
}

/// Inputs that produced a relevance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    /// Local time, ISO-8601
    pub timestamp: String,
}

/// A document that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFailure {
    pub document: String,
    pub reason: String,
}

/// Ranked sections and summaries for a document collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceReport {
    pub metadata: ReportMetadata,
    pub extracted_sections: Vec<ExtractedSection>,
    pub sub_section_analysis: Vec<RefinedAnalysis>,
    /// Documents skipped because they could not be read
    #[serde(skip)]
    pub failures: Vec<DocumentFailure>,
}
