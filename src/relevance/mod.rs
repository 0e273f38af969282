//! Persona/job relevance ranking across a document collection.
//!
//! Each document is segmented into sections and scored independently; the
//! scored sections are then concatenated in input order and ranked once,
//! so the result does not depend on which document finished first.
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use pdfsift::parser::LopdfSource;
//! use pdfsift::relevance::RelevanceExtractor;
//!
//! let paths = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let report = RelevanceExtractor::new().extract(
//!     &LopdfSource::new(),
//!     &paths,
//!     "Investment Analyst",
//!     "Analyze revenue trends",
//! );
//! for section in &report.extracted_sections {
//!     println!("{}. {} (p.{})", section.importance_rank, section.section_title, section.page);
//! }
//! ```

mod options;
mod rank;
mod scorer;
mod segment;
mod summarize;

pub use options::RankOptions;
pub use rank::rank;
pub use scorer::{build_query, cosine_similarity, keyword_score, Embedder, RelevanceScorer};
pub use segment::{section_content, SectionSegmenter, CONTENT_WINDOW_LINES};
pub use summarize::{summarize, MAX_SUMMARY_CHARS};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::Result;
use crate::model::{
    DocumentContent, DocumentFailure, ExtractedSection, RefinedAnalysis, RelevanceReport,
    ReportMetadata, ScoredSection,
};
use crate::parser::{document_name, DocumentSource};

/// Format of `metadata.timestamp`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Builds [`RelevanceReport`]s for a persona and job.
#[derive(Debug, Clone)]
pub struct RelevanceExtractor {
    segmenter: SectionSegmenter,
    scorer: RelevanceScorer,
    options: RankOptions,
    parallel: bool,
}

impl Default for RelevanceExtractor {
    fn default() -> Self {
        Self {
            segmenter: SectionSegmenter::new(),
            scorer: RelevanceScorer::keyword(),
            options: RankOptions::default(),
            parallel: true,
        }
    }
}

impl RelevanceExtractor {
    /// Create an extractor with keyword scoring and default bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific scorer.
    pub fn with_scorer(mut self, scorer: RelevanceScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Score with sentence embeddings from `embedder`.
    pub fn with_embedder(self, embedder: Arc<dyn Embedder>) -> Self {
        self.with_scorer(RelevanceScorer::with_embedder(embedder))
    }

    /// Set the report bounds.
    pub fn with_rank_options(mut self, options: RankOptions) -> Self {
        self.options = options;
        self
    }

    /// Enable or disable processing documents in parallel.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The scorer in use.
    pub fn scorer(&self) -> &RelevanceScorer {
        &self.scorer
    }

    /// The report bounds in use.
    pub fn rank_options(&self) -> &RankOptions {
        &self.options
    }

    /// Segment and score one loaded document.
    pub fn score_document(
        &self,
        doc: &DocumentContent,
        persona: &str,
        job_to_be_done: &str,
    ) -> Vec<ScoredSection> {
        let sections = self.segmenter.segment_document(doc);
        log::info!("{}: {} sections", doc.name, sections.len());
        self.scorer.score_sections(sections, persona, job_to_be_done)
    }

    /// Rank the sections of already loaded documents.
    pub fn analyze(
        &self,
        docs: &[DocumentContent],
        persona: &str,
        job_to_be_done: &str,
    ) -> RelevanceReport {
        let per_document: Vec<Vec<ScoredSection>> = if self.parallel {
            docs.par_iter()
                .map(|doc| self.score_document(doc, persona, job_to_be_done))
                .collect()
        } else {
            docs.iter()
                .map(|doc| self.score_document(doc, persona, job_to_be_done))
                .collect()
        };

        let documents = docs.iter().map(|d| d.name.clone()).collect();
        self.build_report(
            documents,
            per_document.into_iter().flatten().collect(),
            Vec::new(),
            persona,
            job_to_be_done,
        )
    }

    /// Load `paths` from `source` and rank their sections.
    ///
    /// Documents that fail to load contribute no sections, are recorded in
    /// [`RelevanceReport::failures`] and still appear in
    /// `metadata.documents`.
    pub fn extract(
        &self,
        source: &dyn DocumentSource,
        paths: &[PathBuf],
        persona: &str,
        job_to_be_done: &str,
    ) -> RelevanceReport {
        self.extract_with_progress(source, paths, persona, job_to_be_done, &|_| {})
    }

    /// Like [`extract`](Self::extract), calling `on_progress` after each
    /// document has been processed.
    pub fn extract_with_progress(
        &self,
        source: &dyn DocumentSource,
        paths: &[PathBuf],
        persona: &str,
        job_to_be_done: &str,
        on_progress: &(dyn Fn(&Path) + Sync),
    ) -> RelevanceReport {
        log::info!("Processing {} PDFs for persona: {}", paths.len(), persona);

        let process = |path: &PathBuf| -> Result<Vec<ScoredSection>> {
            log::info!("Processing document: {}", document_name(path));
            let result = source
                .load(path)
                .map(|doc| self.score_document(&doc, persona, job_to_be_done));
            on_progress(path);
            result
        };

        let outcomes: Vec<Result<Vec<ScoredSection>>> = if self.parallel {
            paths.par_iter().map(process).collect()
        } else {
            paths.iter().map(process).collect()
        };

        let mut scored = Vec::new();
        let mut failures = Vec::new();
        for (path, outcome) in paths.iter().zip(outcomes) {
            match outcome {
                Ok(sections) => scored.extend(sections),
                Err(e) => {
                    log::error!("Cannot load PDF {}: {}", path.display(), e);
                    failures.push(DocumentFailure {
                        document: document_name(path),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let documents = paths.iter().map(|p| document_name(p)).collect();
        self.build_report(documents, scored, failures, persona, job_to_be_done)
    }

    fn build_report(
        &self,
        documents: Vec<String>,
        scored: Vec<ScoredSection>,
        failures: Vec<DocumentFailure>,
        persona: &str,
        job_to_be_done: &str,
    ) -> RelevanceReport {
        let ranked = rank(scored);

        let extracted_sections: Vec<ExtractedSection> = ranked
            .iter()
            .take(self.options.max_sections)
            .enumerate()
            .map(|(i, s)| ExtractedSection {
                document: s.section.document.clone(),
                page: s.section.page,
                section_title: s.section.title.clone(),
                importance_rank: i + 1,
            })
            .collect();

        let sub_section_analysis = ranked
            .iter()
            .take(self.options.max_summaries)
            .map(|s| RefinedAnalysis {
                document: s.section.document.clone(),
                page: s.section.page,
                refined_text: summarize(&s.section.content, persona, job_to_be_done),
            })
            .collect();

        log::info!("Extracted {} relevant sections", extracted_sections.len());

        RelevanceReport {
            metadata: ReportMetadata {
                documents,
                persona: persona.to_string(),
                job_to_be_done: job_to_be_done.to_string(),
                timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            },
            extracted_sections,
            sub_section_analysis,
            failures,
        }
    }
}
