//! Directory batch drivers.
//!
//! Both drivers discover the PDFs directly inside an input directory,
//! process them and write JSON results into an output directory. A
//! document that cannot be read is logged and reported, never fatal.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::detect::find_pdfs;
use crate::error::Result;
use crate::model::{DocumentFailure, RelevanceReport};
use crate::outline::OutlineExtractor;
use crate::parser::{document_name, DocumentSource};
use crate::relevance::RelevanceExtractor;
use crate::render::{write_json, JsonFormat};

/// File name of the relevance report inside the output directory.
pub const RELEVANCE_REPORT_FILE: &str = "relevance_analysis.json";

/// Outcome of an outline batch.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// JSON files written, in input order
    pub written: Vec<PathBuf>,
    /// Documents that produced no output
    pub failures: Vec<DocumentFailure>,
}

impl BatchSummary {
    /// Number of documents attempted.
    pub fn total(&self) -> usize {
        self.written.len() + self.failures.len()
    }
}

/// Output path of the outline for `pdf`: `<output_dir>/<stem>.json`.
pub fn outline_output_path(output_dir: &Path, pdf: &Path) -> PathBuf {
    let stem = pdf
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| document_name(pdf));
    output_dir.join(format!("{}.json", stem))
}

/// Extract the outline of every PDF in `input_dir` into `output_dir`.
///
/// `on_progress` is called once per document, after its file is written
/// or its failure recorded.
pub fn run_outline_batch(
    source: &dyn DocumentSource,
    extractor: &OutlineExtractor,
    input_dir: &Path,
    output_dir: &Path,
    parallel: bool,
    on_progress: &(dyn Fn(&Path) + Sync),
) -> Result<BatchSummary> {
    let pdfs = find_pdfs(input_dir)?;
    fs::create_dir_all(output_dir)?;
    log::info!("Found {} PDF files in {}", pdfs.len(), input_dir.display());

    let process = |pdf: &PathBuf| -> Result<PathBuf> {
        let result = extractor.extract_file(source, pdf).and_then(|outline| {
            let output = outline_output_path(output_dir, pdf);
            write_json(&output, &outline, JsonFormat::Pretty)?;
            log::info!(
                "Processed {} -> {} ({} headings)",
                document_name(pdf),
                output.display(),
                outline.outline.len()
            );
            Ok(output)
        });
        on_progress(pdf);
        result
    };

    let outcomes: Vec<Result<PathBuf>> = if parallel {
        pdfs.par_iter().map(process).collect()
    } else {
        pdfs.iter().map(process).collect()
    };

    let mut summary = BatchSummary::default();
    for (pdf, outcome) in pdfs.iter().zip(outcomes) {
        match outcome {
            Ok(output) => summary.written.push(output),
            Err(e) => {
                log::error!("Error processing {}: {}", pdf.display(), e);
                summary.failures.push(DocumentFailure {
                    document: document_name(pdf),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(summary)
}

/// Rank the sections of every PDF in `input_dir` and write
/// [`RELEVANCE_REPORT_FILE`] into `output_dir`.
///
/// Returns the report together with the path it was written to, or `None`
/// without writing anything when `input_dir` holds no PDFs.
pub fn run_relevance_batch(
    source: &dyn DocumentSource,
    extractor: &RelevanceExtractor,
    input_dir: &Path,
    output_dir: &Path,
    persona: &str,
    job_to_be_done: &str,
    on_progress: &(dyn Fn(&Path) + Sync),
) -> Result<Option<(RelevanceReport, PathBuf)>> {
    let pdfs = find_pdfs(input_dir)?;
    if pdfs.is_empty() {
        log::warn!("No PDF files found in {}", input_dir.display());
        return Ok(None);
    }
    fs::create_dir_all(output_dir)?;
    log::info!("Found {} PDF files in {}", pdfs.len(), input_dir.display());

    let report = extractor.extract_with_progress(source, &pdfs, persona, job_to_be_done, on_progress);

    let output = output_dir.join(RELEVANCE_REPORT_FILE);
    write_json(&output, &report, JsonFormat::Pretty)?;
    log::info!("Relevance analysis written to {}", output.display());

    Ok(Some((report, output)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_output_path() {
        let out = Path::new("/out");
        assert_eq!(
            outline_output_path(out, Path::new("/in/report.final.pdf")),
            PathBuf::from("/out/report.final.json")
        );
        assert_eq!(
            outline_output_path(out, Path::new("/in/Upper.PDF")),
            PathBuf::from("/out/Upper.json")
        );
    }

    #[test]
    fn test_summary_total() {
        let summary = BatchSummary {
            written: vec![PathBuf::from("a.json")],
            failures: vec![DocumentFailure {
                document: "b.pdf".to_string(),
                reason: "broken".to_string(),
            }],
        };
        assert_eq!(summary.total(), 2);
    }

    #[test]
    fn test_missing_input_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let result = run_outline_batch(
            &crate::parser::LopdfSource::new(),
            &OutlineExtractor::new(),
            &missing,
            dir.path(),
            false,
            &|_| {},
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_relevance_batch_skips_empty_input() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("notes.txt"), b"not a pdf").unwrap();

        let result = run_relevance_batch(
            &crate::parser::LopdfSource::new(),
            &RelevanceExtractor::new(),
            input.path(),
            output.path(),
            "Analyst",
            "review",
            &|_| {},
        )
        .unwrap();

        assert!(result.is_none());
        assert!(!output.path().join(RELEVANCE_REPORT_FILE).exists());
    }
}
