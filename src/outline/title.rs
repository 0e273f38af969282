//! Document title heuristic.

use crate::model::Span;

/// Title used when no span qualifies.
pub const UNTITLED: &str = "Untitled Document";

/// Guess a document title from the spans of its first page.
///
/// The spans set in the largest font win; the first two of them are joined.
/// Returns `None` when the page has no spans at all.
pub fn detect_title(first_page: &[Span]) -> Option<String> {
    if first_page.is_empty() {
        return None;
    }

    let max_size = first_page
        .iter()
        .map(|s| s.font_size)
        .fold(f32::NEG_INFINITY, f32::max);

    let largest: Vec<&str> = first_page
        .iter()
        .filter(|s| s.font_size == max_size)
        .map(|s| s.text.as_str())
        .take(2)
        .collect();

    if !largest.is_empty() {
        return Some(largest.join(" "));
    }

    let fallback = first_page
        .iter()
        .find(|s| s.text.chars().count() > 10)
        .map(|s| s.text.clone())
        .unwrap_or_else(|| UNTITLED.to_string());
    Some(fallback)
}
