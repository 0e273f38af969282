//! Relevance scoring between a persona/job query and section text.
//!
//! Two strategies share one entry point: cosine similarity of sentence
//! embeddings when an [`Embedder`] is configured, and keyword Jaccard
//! overlap otherwise. An embedding failure only downgrades the call that
//! hit it.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::{ScoredSection, Section};
use crate::text::keyword_set;

/// A sentence-embedding backend: text in, fixed-length vector out.
pub trait Embedder: Send + Sync {
    /// Encode a single text.
    fn encode(&self, text: &str) -> Result<Vec<f32>>;

    /// Encode several texts; the default encodes them one by one.
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.encode(t)).collect()
    }

    /// Vector length, when known up front.
    fn dimension(&self) -> Option<usize> {
        None
    }
}

/// Build the ranking query from persona and job.
pub fn build_query(persona: &str, job_to_be_done: &str) -> String {
    format!("{} {}", persona, job_to_be_done)
}

/// Jaccard similarity of the keyword sets of `query` and `text`.
///
/// 0.0 when either side has no keywords; 1.0 for identical keyword sets.
pub fn keyword_score(query: &str, text: &str) -> f32 {
    if query.is_empty() || text.is_empty() {
        return 0.0;
    }

    let query_keywords = keyword_set(&query.to_lowercase());
    let text_keywords = keyword_set(&text.to_lowercase());
    if query_keywords.is_empty() {
        return 0.0;
    }

    let intersection = query_keywords.intersection(&text_keywords).count();
    let union = query_keywords.union(&text_keywords).count();
    if union == 0 {
        0.0
    } else {
        intersection as f32 / union as f32
    }
}

/// Cosine similarity of two vectors.
///
/// Mismatched lengths, zero vectors and non-finite results are errors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(Error::Embedding(format!(
            "dimension mismatch: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let (dot, norm_a, norm_b) = a.iter().zip(b).fold(
        (0.0f64, 0.0f64, 0.0f64),
        |(dot, na, nb), (&x, &y)| {
            let (x, y) = (f64::from(x), f64::from(y));
            (dot + x * y, na + x * x, nb + y * y)
        },
    );

    let denominator = norm_a.sqrt() * norm_b.sqrt();
    let similarity = dot / denominator;
    if denominator == 0.0 || !similarity.is_finite() {
        return Err(Error::Embedding("zero or non-finite embedding".to_string()));
    }

    Ok(similarity as f32)
}

#[derive(Clone)]
enum Strategy {
    Keyword,
    Embedding(Arc<dyn Embedder>),
}

/// Scores sections against a query with the strategy chosen at construction.
#[derive(Clone)]
pub struct RelevanceScorer {
    strategy: Strategy,
}

impl RelevanceScorer {
    /// Keyword-overlap scoring only.
    pub fn keyword() -> Self {
        Self {
            strategy: Strategy::Keyword,
        }
    }

    /// Embedding scoring, with keyword fallback per failed call.
    pub fn with_embedder(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            strategy: Strategy::Embedding(embedder),
        }
    }

    /// Embedding scoring when a backend is available, keyword otherwise.
    pub fn from_optional(embedder: Option<Arc<dyn Embedder>>) -> Self {
        match embedder {
            Some(embedder) => Self::with_embedder(embedder),
            None => Self::keyword(),
        }
    }

    /// Whether an embedding backend is configured.
    pub fn is_semantic(&self) -> bool {
        matches!(self.strategy, Strategy::Embedding(_))
    }

    /// Relevance of `text` to `query`.
    ///
    /// Keyword scores lie in [0, 1], cosine scores in [-1, 1].
    pub fn score(&self, query: &str, text: &str) -> f32 {
        match &self.strategy {
            Strategy::Keyword => keyword_score(query, text),
            Strategy::Embedding(embedder) => match semantic_score(embedder.as_ref(), query, text) {
                Ok(score) => score,
                Err(e) => {
                    log::warn!("Error in semantic relevance calculation: {}", e);
                    keyword_score(query, text)
                }
            },
        }
    }

    /// Relevance of each of `texts` to `query`, in input order.
    ///
    /// With an embedding backend the query is encoded once and the texts in
    /// one batch. If the batch fails, texts are encoded one at a time so a
    /// single bad text only downgrades its own score.
    pub fn score_texts(&self, query: &str, texts: &[String]) -> Vec<f32> {
        let embedder = match &self.strategy {
            Strategy::Keyword => {
                return texts.iter().map(|text| keyword_score(query, text)).collect()
            }
            Strategy::Embedding(embedder) => embedder.as_ref(),
        };

        let query_vec = match encode_checked(embedder, query) {
            Ok(vec) => vec,
            Err(e) => {
                log::warn!("Error in semantic relevance calculation: {}", e);
                return texts.iter().map(|text| keyword_score(query, text)).collect();
            }
        };

        match encode_batch_checked(embedder, texts) {
            Ok(vectors) => texts
                .iter()
                .zip(vectors)
                .map(|(text, vec)| cosine_or_keyword(&query_vec, Ok(vec), query, text))
                .collect(),
            Err(e) => {
                log::debug!("Batch encoding failed, encoding one by one: {}", e);
                texts
                    .iter()
                    .map(|text| {
                        let vec = encode_checked(embedder, text);
                        cosine_or_keyword(&query_vec, vec, query, text)
                    })
                    .collect()
            }
        }
    }

    /// Score every section against the persona/job query, keeping input order.
    pub fn score_sections(
        &self,
        sections: Vec<Section>,
        persona: &str,
        job_to_be_done: &str,
    ) -> Vec<ScoredSection> {
        let query = build_query(persona, job_to_be_done);
        let texts: Vec<String> = sections.iter().map(Section::scoring_text).collect();
        let scores = self.score_texts(&query, &texts);

        sections
            .into_iter()
            .zip(scores)
            .map(|(section, relevance_score)| ScoredSection {
                section,
                relevance_score,
            })
            .collect()
    }
}

impl Default for RelevanceScorer {
    fn default() -> Self {
        Self::keyword()
    }
}

impl fmt::Debug for RelevanceScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strategy = if self.is_semantic() { "embedding" } else { "keyword" };
        f.debug_struct("RelevanceScorer")
            .field("strategy", &strategy)
            .finish()
    }
}

fn semantic_score(embedder: &dyn Embedder, query: &str, text: &str) -> Result<f32> {
    let query_vec = encode_checked(embedder, query)?;
    let text_vec = encode_checked(embedder, text)?;
    cosine_similarity(&query_vec, &text_vec)
}

fn check_dimension(embedder: &dyn Embedder, vec: &[f32]) -> Result<()> {
    match embedder.dimension() {
        Some(dimension) if dimension != vec.len() => Err(Error::Embedding(format!(
            "expected {} dimensions, got {}",
            dimension,
            vec.len()
        ))),
        _ => Ok(()),
    }
}

fn encode_checked(embedder: &dyn Embedder, text: &str) -> Result<Vec<f32>> {
    let vec = embedder.encode(text)?;
    check_dimension(embedder, &vec)?;
    Ok(vec)
}

fn encode_batch_checked(embedder: &dyn Embedder, texts: &[String]) -> Result<Vec<Vec<f32>>> {
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let vectors = embedder.encode_batch(&refs)?;
    if vectors.len() != texts.len() {
        return Err(Error::Embedding(format!(
            "batch returned {} vectors for {} texts",
            vectors.len(),
            texts.len()
        )));
    }
    for vec in &vectors {
        check_dimension(embedder, vec)?;
    }
    Ok(vectors)
}

fn cosine_or_keyword(
    query_vec: &[f32],
    text_vec: Result<Vec<f32>>,
    query: &str,
    text: &str,
) -> f32 {
    match text_vec.and_then(|vec| cosine_similarity(query_vec, &vec)) {
        Ok(score) => score,
        Err(e) => {
            log::warn!("Error in semantic relevance calculation: {}", e);
            keyword_score(query, text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SectionLevel;
    use std::sync::Mutex;

    /// Counts a few fixed words; fails on texts containing "explode".
    struct WordCountEmbedder;

    impl Embedder for WordCountEmbedder {
        fn encode(&self, text: &str) -> Result<Vec<f32>> {
            let lower = text.to_lowercase();
            if lower.contains("explode") {
                return Err(Error::Embedding("backend failure".to_string()));
            }
            Ok(["revenue", "growth", "weather"]
                .iter()
                .map(|w| lower.matches(w).count() as f32)
                .collect())
        }

        fn dimension(&self) -> Option<usize> {
            Some(3)
        }
    }

    /// Records every text it encodes and whether batches were used.
    #[derive(Default)]
    struct RecordingEmbedder {
        encoded: Mutex<Vec<String>>,
        batches: Mutex<usize>,
    }

    impl Embedder for RecordingEmbedder {
        fn encode(&self, text: &str) -> Result<Vec<f32>> {
            self.encoded.lock().unwrap().push(text.to_string());
            WordCountEmbedder.encode(text)
        }

        fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            *self.batches.lock().unwrap() += 1;
            texts.iter().map(|t| WordCountEmbedder.encode(t)).collect()
        }
    }

    /// Claims a dimension its vectors do not have.
    struct WrongDimensionEmbedder;

    impl Embedder for WrongDimensionEmbedder {
        fn encode(&self, text: &str) -> Result<Vec<f32>> {
            WordCountEmbedder.encode(text)
        }

        fn dimension(&self) -> Option<usize> {
            Some(4)
        }
    }

    fn section(title: &str) -> Section {
        Section {
            document: "a.pdf".to_string(),
            page: 1,
            title: title.to_string(),
            content: String::new(),
            heading_level: SectionLevel::H2,
        }
    }

    #[test]
    fn test_keyword_overlap() {
        let score = keyword_score(
            "financial analysis revenue growth",
            "The company showed strong revenue growth in Q3 with financial metrics improving",
        );
        assert!(score > 0.0 && score <= 1.0);
    }

    #[test]
    fn test_keyword_disjoint_is_zero() {
        let score = keyword_score(
            "machine learning algorithms",
            "The weather was sunny and bright today",
        );
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_keyword_identical_is_one() {
        let text = "quarterly revenue forecast";
        assert_eq!(keyword_score(text, text), 1.0);
    }

    #[test]
    fn test_keyword_empty_inputs() {
        assert_eq!(keyword_score("", "revenue"), 0.0);
        assert_eq!(keyword_score("revenue", ""), 0.0);
        assert_eq!(keyword_score("the of and", "the of and"), 0.0);
    }

    #[test]
    fn test_keyword_exact_value() {
        // {revenue, growth} vs {revenue, decline}: 1 shared of 3.
        let score = keyword_score("revenue growth", "revenue decline");
        assert!((score - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap() - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-2.0, 0.0]).unwrap() + 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).is_err());
        assert!(cosine_similarity(&[1.0], &[1.0, 0.0]).is_err());
    }

    #[test]
    fn test_embedding_strategy() {
        let scorer = RelevanceScorer::with_embedder(Arc::new(WordCountEmbedder));
        assert!(scorer.is_semantic());
        let score = scorer.score("revenue growth", "revenue growth revenue growth");
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_embedding_failure_falls_back_per_call() {
        let scorer = RelevanceScorer::with_embedder(Arc::new(WordCountEmbedder));
        // Embedding fails, keyword overlap {revenue} of {revenue, explode} = 0.5
        let score = scorer.score("revenue", "revenue explode");
        assert!((score - 0.5).abs() < 1e-6);
        // Strategy unchanged for the next call.
        assert!(scorer.is_semantic());
        let score = scorer.score("weather", "weather");
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_falls_back() {
        let scorer = RelevanceScorer::with_embedder(Arc::new(WordCountEmbedder));
        // No tracked words: zero vectors, keyword score instead.
        assert_eq!(scorer.score("machine learning", "sunny today"), 0.0);
    }

    #[test]
    fn test_score_sections_keeps_order() {
        let scored = RelevanceScorer::keyword().score_sections(
            vec![section("Weather Report"), section("Revenue Analysis")],
            "Analyst",
            "review revenue",
        );
        assert_eq!(scored[0].section.title, "Weather Report");
        assert_eq!(scored[0].relevance_score, 0.0);
        assert!(scored[1].relevance_score > 0.0);
    }

    #[test]
    fn test_query_encoded_once_per_call() {
        let embedder = Arc::new(RecordingEmbedder::default());
        let scorer = RelevanceScorer::with_embedder(embedder.clone());
        let scored = scorer.score_sections(
            vec![section("Revenue"), section("Growth"), section("Weather")],
            "Analyst",
            "revenue growth",
        );
        assert_eq!(scored.len(), 3);
        assert_eq!(
            *embedder.encoded.lock().unwrap(),
            vec!["Analyst revenue growth".to_string()]
        );
        assert_eq!(*embedder.batches.lock().unwrap(), 1);
        assert!(scored[0].relevance_score > 0.0);
        assert!(scored[2].relevance_score.abs() < 1e-6);
    }

    #[test]
    fn test_failed_batch_falls_back_per_section() {
        let scorer = RelevanceScorer::with_embedder(Arc::new(WordCountEmbedder));
        let scored = scorer.score_sections(
            vec![section("revenue growth"), section("explode revenue")],
            "Analyst",
            "review revenue growth",
        );
        // Cosine of [1, 1, 0] with itself.
        assert!((scored[0].relevance_score - 1.0).abs() < 1e-6);
        // Keyword overlap {revenue} of {analyst, review, revenue, growth, explode}.
        assert!((scored[1].relevance_score - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_dimension_mismatch_falls_back_to_keywords() {
        let scorer = RelevanceScorer::with_embedder(Arc::new(WrongDimensionEmbedder));
        assert_eq!(
            scorer.score("revenue growth", "revenue decline"),
            keyword_score("revenue growth", "revenue decline")
        );
        let texts = vec!["revenue".to_string(), "weather".to_string()];
        let scores = scorer.score_texts("revenue", &texts);
        assert_eq!(scores, vec![1.0, 0.0]);
    }

    #[test]
    fn test_default_is_keyword() {
        assert!(!RelevanceScorer::default().is_semantic());
        assert!(!RelevanceScorer::from_optional(None).is_semantic());
    }
}
