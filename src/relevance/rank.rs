//! Global ordering of scored sections.

use crate::model::ScoredSection;

/// Order sections by descending relevance.
///
/// The sort is stable: sections with equal scores keep their input order.
pub fn rank(mut sections: Vec<ScoredSection>) -> Vec<ScoredSection> {
    sections.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
    sections
}
