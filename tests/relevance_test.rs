//! Integration tests for persona/job relevance ranking.

mod common;

use std::path::PathBuf;
use std::sync::Arc;

use common::{document, page, touch_all, FakeSource};
use pdfsift::{
    run_relevance_batch, Embedder, Error, RankOptions, RelevanceExtractor, Result,
    RELEVANCE_REPORT_FILE,
};

const PERSONA: &str = "Travel Planner";
const JOB: &str = "Plan beach trips for friends";

fn source() -> FakeSource {
    FakeSource::new()
        .with_document(document(
            "travel.pdf",
            vec![
                page(
                    1,
                    &[
                        ("Coastal Adventures", 18.0),
                        ("beach hiking and kayaking trips along the southern coast", 10.0),
                        ("guided tours leave every morning from the harbour", 10.0),
                    ],
                ),
                page(
                    2,
                    &[
                        ("Restaurants", 18.0),
                        ("local cuisine and seafood dinners near the old town", 10.0),
                        ("booking ahead is recommended in summer", 10.0),
                    ],
                ),
            ],
        ))
        .with_document(document(
            "history.pdf",
            vec![page(
                1,
                &[
                    ("the museum opened in the nineteenth century", 11.0),
                    ("its collection spans many centuries of art", 11.0),
                ],
            )],
        ))
}

fn paths(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(|n| PathBuf::from("/docs").join(n)).collect()
}

/// Counts vocabulary words; fails on any text mentioning "museum".
struct VocabularyEmbedder;

impl Embedder for VocabularyEmbedder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let lower = text.to_lowercase();
        if lower.contains("museum") {
            return Err(Error::Embedding("model unavailable".to_string()));
        }
        Ok(["beach", "trips", "travel", "seafood"]
            .iter()
            .map(|w| lower.matches(w).count() as f32)
            .collect())
    }

    fn dimension(&self) -> Option<usize> {
        Some(4)
    }
}

#[test]
fn test_sections_ranked_by_relevance() {
    let report = RelevanceExtractor::new().extract(
        &source(),
        &paths(&["travel.pdf", "history.pdf"]),
        PERSONA,
        JOB,
    );

    let ranked: Vec<_> = report
        .extracted_sections
        .iter()
        .map(|s| (s.importance_rank, s.document.as_str(), s.section_title.as_str(), s.page))
        .collect();
    assert_eq!(
        ranked,
        vec![
            (1, "travel.pdf", "Coastal Adventures", 1),
            (2, "travel.pdf", "Restaurants", 2),
            (3, "history.pdf", "Page 1", 1),
        ]
    );
    assert!(report.failures.is_empty());
}

#[test]
fn test_refined_text_for_top_section() {
    let report =
        RelevanceExtractor::new().extract(&source(), &paths(&["travel.pdf"]), PERSONA, JOB);
    assert_eq!(report.sub_section_analysis.len(), 2);
    assert_eq!(
        report.sub_section_analysis[0].refined_text,
        "beach hiking and kayaking trips along the southern coast \
         guided tours leave every morning from the harbour"
    );
}

#[test]
fn test_metadata_lists_every_requested_document() {
    let report = RelevanceExtractor::new().extract(
        &source(),
        &paths(&["travel.pdf", "missing.pdf", "history.pdf"]),
        PERSONA,
        JOB,
    );
    assert_eq!(
        report.metadata.documents,
        vec!["travel.pdf", "missing.pdf", "history.pdf"]
    );
    assert_eq!(report.metadata.persona, PERSONA);
    assert_eq!(report.metadata.job_to_be_done, JOB);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].document, "missing.pdf");
    assert_eq!(report.extracted_sections.len(), 3);
}

#[test]
fn test_rank_options_limit_report() {
    let report = RelevanceExtractor::new()
        .with_rank_options(RankOptions::new().with_max_sections(2).with_max_summaries(1))
        .extract(&source(), &paths(&["travel.pdf", "history.pdf"]), PERSONA, JOB);
    assert_eq!(report.extracted_sections.len(), 2);
    assert_eq!(report.sub_section_analysis.len(), 1);
    assert_eq!(report.sub_section_analysis[0].document, "travel.pdf");
}

#[test]
fn test_parallel_and_sequential_agree() {
    let docs = paths(&["history.pdf", "travel.pdf"]);
    let parallel = RelevanceExtractor::new().extract(&source(), &docs, PERSONA, JOB);
    let sequential = RelevanceExtractor::new()
        .with_parallel(false)
        .extract(&source(), &docs, PERSONA, JOB);
    assert_eq!(parallel.extracted_sections, sequential.extracted_sections);
    assert_eq!(parallel.sub_section_analysis, sequential.sub_section_analysis);
}

#[test]
fn test_embedding_scores_with_per_call_fallback() {
    let extractor = RelevanceExtractor::new().with_embedder(Arc::new(VocabularyEmbedder));
    assert!(extractor.scorer().is_semantic());

    let report = extractor.extract(
        &source(),
        &paths(&["history.pdf", "travel.pdf"]),
        PERSONA,
        JOB,
    );
    // The history page falls back to keyword scoring (0.0) and keeps its
    // input position ahead of the zero-cosine restaurant section.
    let titles: Vec<_> = report
        .extracted_sections
        .iter()
        .map(|s| s.section_title.as_str())
        .collect();
    assert_eq!(titles, vec!["Coastal Adventures", "Page 1", "Restaurants"]);
}

#[test]
fn test_relevance_batch_writes_report() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    touch_all(input.path(), &["travel.pdf", "history.pdf"]);

    let (report, path) = run_relevance_batch(
        &source(),
        &RelevanceExtractor::new(),
        input.path(),
        output.path(),
        PERSONA,
        JOB,
        &|_| {},
    )
    .unwrap()
    .expect("input directory holds PDFs");

    assert_eq!(path, output.path().join(RELEVANCE_REPORT_FILE));
    assert_eq!(report.metadata.documents, vec!["history.pdf", "travel.pdf"]);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["metadata"]["persona"], PERSONA);
    assert!(json["metadata"]["timestamp"].is_string());
    assert_eq!(json["extracted_sections"][0]["section_title"], "Coastal Adventures");
    assert_eq!(json["extracted_sections"][0]["importance_rank"], 1);
    assert_eq!(json["sub_section_analysis"][0]["document"], "travel.pdf");
    assert!(json.get("failures").is_none());
}
