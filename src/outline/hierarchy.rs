//! Heading level assignment from the font-size distribution.

use crate::model::{HeadingCandidate, HeadingLevel, OutlineEntry};

/// Most entries kept in a document outline.
pub const MAX_OUTLINE_ENTRIES: usize = 50;

/// Distinct font sizes among `candidates`, largest first.
pub fn distinct_sizes(candidates: &[HeadingCandidate]) -> Vec<f32> {
    let mut sizes: Vec<f32> = candidates.iter().map(|c| c.font_size).collect();
    sizes.sort_by(|a, b| b.total_cmp(a));
    sizes.dedup();
    sizes
}

/// Level for a font size given the distinct sizes, largest first.
///
/// The largest size is H1, the second H2, anything else H3.
pub fn level_for_size(font_size: f32, ranked_sizes: &[f32]) -> HeadingLevel {
    ranked_sizes
        .iter()
        .take(3)
        .position(|&size| size == font_size)
        .map(HeadingLevel::from_size_rank)
        .unwrap_or(HeadingLevel::H3)
}

/// Assign outline levels to heading candidates.
///
/// Entries come back ordered by page (detection order within a page) and
/// capped at [`MAX_OUTLINE_ENTRIES`]. Font sizes are dropped.
pub fn assign_levels(candidates: &[HeadingCandidate]) -> Vec<OutlineEntry> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let ranked = distinct_sizes(candidates);

    let mut entries: Vec<OutlineEntry> = candidates
        .iter()
        .map(|c| OutlineEntry {
            level: level_for_size(c.font_size, &ranked),
            text: c.text.clone(),
            page: c.page,
        })
        .collect();

    entries.sort_by_key(|e| e.page);
    entries.truncate(MAX_OUTLINE_ENTRIES);
    entries
}
