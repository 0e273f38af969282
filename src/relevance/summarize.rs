//! Extractive summaries of top-ranked sections.

/// Longest summary kept before the ellipsis is appended.
pub const MAX_SUMMARY_CHARS: usize = 300;

/// Fragments of the content inspected for persona/job mentions.
const INSPECTED_FRAGMENTS: usize = 5;
/// Fragments used when nothing mentions the persona or job.
const FALLBACK_FRAGMENTS: usize = 2;
/// Fragments joined into the summary.
const JOINED_FRAGMENTS: usize = 3;
/// Fragments this short or shorter are ignored.
const MIN_FRAGMENT_CHARS: usize = 20;

/// Summarize section content for a persona and job.
///
/// The content is split on `.`; fragments among the first five that
/// mention the persona or the job (case-insensitive) are kept. When none
/// do, the first two fragments are used. At most three fragments are
/// joined with `". "` and the result is cut at [`MAX_SUMMARY_CHARS`]
/// characters, followed by `"..."` when cut.
pub fn summarize(content: &str, persona: &str, job_to_be_done: &str) -> String {
    if content.is_empty() {
        return String::new();
    }

    let fragments: Vec<&str> = content.split('.').collect();
    let persona = persona.to_lowercase();
    let job = job_to_be_done.to_lowercase();

    let mut kept: Vec<&str> = fragments
        .iter()
        .take(INSPECTED_FRAGMENTS)
        .map(|f| f.trim())
        .filter(|f| is_substantial(f))
        .filter(|f| {
            let lower = f.to_lowercase();
            lower.contains(&persona) || lower.contains(&job)
        })
        .collect();

    if kept.is_empty() {
        kept = fragments
            .iter()
            .take(FALLBACK_FRAGMENTS)
            .map(|f| f.trim())
            .filter(|f| is_substantial(f))
            .collect();
    }

    let joined = kept
        .into_iter()
        .take(JOINED_FRAGMENTS)
        .collect::<Vec<_>>()
        .join(". ");

    truncate_chars(&joined, MAX_SUMMARY_CHARS)
}

fn is_substantial(fragment: &str) -> bool {
    fragment.chars().count() > MIN_FRAGMENT_CHARS
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
