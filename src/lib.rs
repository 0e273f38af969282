//! # pdfsift
//!
//! Document outline inference and persona-driven section ranking for PDFs.
//!
//! The library reads positioned text spans from PDF pages and works purely
//! from typographic signals: font size relative to the document, casing,
//! length and numbering patterns. Two analyses are built on top:
//!
//! - **Outline**: a title and an H1/H2/H3 heading outline per document.
//! - **Relevance**: sections of a document collection ranked against a
//!   persona and a job to be done, with short extractive summaries.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfsift::{render, Pdfsift};
//!
//! fn main() -> pdfsift::Result<()> {
//!     let sift = Pdfsift::new();
//!
//!     let outline = sift.outline("report.pdf")?;
//!     println!("{}", render::to_json(&outline, render::JsonFormat::Pretty)?);
//!
//!     let report = sift.relevance(
//!         &["a.pdf", "b.pdf"],
//!         "Investment Analyst",
//!         "Analyze revenue trends",
//!     );
//!     println!("{} sections ranked", report.extracted_sections.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **No layout model**: heading detection uses font metrics and text shape only
//! - **Pluggable scoring**: sentence embeddings via [`Embedder`], keyword
//!   overlap otherwise
//! - **Pluggable input**: anything implementing [`DocumentSource`]
//! - **Parallel processing**: Uses Rayon across documents

pub mod batch;
pub mod detect;
pub mod error;
pub mod model;
pub mod outline;
pub mod parser;
pub mod relevance;
pub mod render;
pub mod text;

// Re-export commonly used types
pub use batch::{run_outline_batch, run_relevance_batch, BatchSummary, RELEVANCE_REPORT_FILE};
pub use detect::{find_pdfs, has_pdf_extension, sniff_bytes, sniff_path, PdfHeader};
pub use error::{Error, Result};
pub use model::{
    DocumentContent, DocumentFailure, ExtractedSection, HeadingCandidate, HeadingLevel,
    OutlineEntry, OutlineResult, PageContent, RefinedAnalysis, RelevanceReport, ReportMetadata,
    ScoredSection, Section, SectionLevel, Span,
};
pub use outline::{extract_outline, OutlineExtractor, SpanClassifier};
pub use parser::{DocumentSource, ErrorMode, LopdfSource, ParseOptions};
pub use relevance::{
    Embedder, RankOptions, RelevanceExtractor, RelevanceScorer, SectionSegmenter,
};
pub use render::JsonFormat;

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Extract the title and outline of a PDF file.
///
/// # Example
///
/// ```no_run
/// let outline = pdfsift::outline_file("document.pdf").unwrap();
/// for entry in &outline.outline {
///     println!("{} {} (p.{})", entry.level, entry.text, entry.page);
/// }
/// ```
pub fn outline_file<P: AsRef<Path>>(path: P) -> Result<OutlineResult> {
    extract_outline(&LopdfSource::new(), path.as_ref())
}

/// Rank the sections of several PDF files with keyword scoring.
///
/// # Example
///
/// ```no_run
/// let report = pdfsift::rank_files(&["a.pdf", "b.pdf"], "Student", "Prepare for exams");
/// println!("{}", pdfsift::render::to_json(&report, pdfsift::JsonFormat::Pretty).unwrap());
/// ```
pub fn rank_files<P: AsRef<Path>>(
    paths: &[P],
    persona: &str,
    job_to_be_done: &str,
) -> RelevanceReport {
    Pdfsift::new().relevance(paths, persona, job_to_be_done)
}

/// Load a PDF file into pages of positioned text.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<DocumentContent> {
    LopdfSource::new().load(path.as_ref())
}

/// Builder bundling parse options, report bounds and an optional
/// embedding backend.
///
/// # Example
///
/// ```no_run
/// use pdfsift::{Pdfsift, RankOptions};
///
/// let report = Pdfsift::new()
///     .lenient()
///     .sequential()
///     .with_rank_options(RankOptions::new().with_max_sections(5))
///     .relevance(&["guide.pdf"], "Travel Planner", "Plan a 4-day trip");
/// # let _ = report;
/// ```
#[derive(Clone, Default)]
pub struct Pdfsift {
    parse_options: ParseOptions,
    rank_options: RankOptions,
    embedder: Option<Arc<dyn Embedder>>,
}

impl Pdfsift {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable lenient parsing mode.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parse_options = self.parse_options.sequential();
        self
    }

    /// Replace the parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Set report bounds.
    pub fn with_rank_options(mut self, options: RankOptions) -> Self {
        self.rank_options = options;
        self
    }

    /// Score relevance with sentence embeddings.
    pub fn with_embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// The document source these options describe.
    pub fn source(&self) -> LopdfSource {
        LopdfSource::with_options(self.parse_options.clone())
    }

    /// The relevance extractor these options describe.
    pub fn relevance_extractor(&self) -> RelevanceExtractor {
        RelevanceExtractor::new()
            .with_scorer(RelevanceScorer::from_optional(self.embedder.clone()))
            .with_rank_options(self.rank_options)
            .with_parallel(self.parse_options.parallel)
    }

    /// Extract the title and outline of one PDF file.
    pub fn outline<P: AsRef<Path>>(&self, path: P) -> Result<OutlineResult> {
        OutlineExtractor::new().extract_file(&self.source(), path.as_ref())
    }

    /// Rank the sections of several PDF files against a persona and job.
    pub fn relevance<P: AsRef<Path>>(
        &self,
        paths: &[P],
        persona: &str,
        job_to_be_done: &str,
    ) -> RelevanceReport {
        let paths: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
        self.relevance_extractor()
            .extract(&self.source(), &paths, persona, job_to_be_done)
    }

    /// Write `<stem>.json` outlines for every PDF in `input_dir`.
    pub fn outline_dir<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_dir: P,
        output_dir: Q,
    ) -> Result<BatchSummary> {
        run_outline_batch(
            &self.source(),
            &OutlineExtractor::new(),
            input_dir.as_ref(),
            output_dir.as_ref(),
            self.parse_options.parallel,
            &|_| {},
        )
    }

    /// Write a relevance report for every PDF in `input_dir`.
    ///
    /// Returns `None` and writes nothing when the directory holds no PDFs.
    pub fn relevance_dir<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_dir: P,
        output_dir: Q,
        persona: &str,
        job_to_be_done: &str,
    ) -> Result<Option<RelevanceReport>> {
        let written = run_relevance_batch(
            &self.source(),
            &self.relevance_extractor(),
            input_dir.as_ref(),
            output_dir.as_ref(),
            persona,
            job_to_be_done,
            &|_| {},
        )?;
        Ok(written.map(|(report, _)| report))
    }
}

impl std::fmt::Debug for Pdfsift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pdfsift")
            .field("parse_options", &self.parse_options)
            .field("rank_options", &self.rank_options)
            .field("semantic", &self.embedder.is_some())
            .finish()
    }
}
