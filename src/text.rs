//! Text helpers shared by the classifier and the scorers.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// English function words ignored by keyword matching.
const STOPWORDS: &[&str] = &[
    "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "among", "amongst", "amount",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "back", "became", "because", "become", "becomes", "becoming", "been", "before",
    "beforehand", "behind", "being", "below", "beside", "besides", "between", "beyond", "both",
    "bottom", "but", "call", "can", "cannot", "could", "did", "does", "doing", "done", "down",
    "due", "during", "each", "eight", "either", "eleven", "else", "elsewhere", "empty", "enough",
    "even", "ever", "every", "everyone", "everything", "everywhere", "except", "few", "fifteen",
    "fifty", "first", "five", "for", "former", "formerly", "forty", "four", "from", "front",
    "full", "further", "get", "give", "had", "has", "have", "hence", "her", "here", "hereafter",
    "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his", "how", "however",
    "hundred", "indeed", "into", "its", "itself", "just", "keep", "last", "latter", "latterly",
    "least", "less", "made", "make", "many", "may", "meanwhile", "might", "mine", "more",
    "moreover", "most", "mostly", "move", "much", "must", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "nobody", "none", "noone", "nor", "not", "nothing",
    "now", "nowhere", "off", "often", "once", "one", "only", "onto", "other", "others",
    "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part", "per", "perhaps",
    "please", "put", "quite", "rather", "really", "regarding", "same", "say", "see", "seem",
    "seemed", "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
    "six", "sixty", "some", "somehow", "someone", "something", "sometime", "sometimes",
    "somewhere", "still", "such", "take", "ten", "than", "that", "the", "their", "them",
    "themselves", "then", "thence", "there", "thereafter", "thereby", "therefore", "therein",
    "thereupon", "these", "they", "third", "this", "those", "though", "three", "through",
    "throughout", "thru", "thus", "together", "too", "top", "toward", "towards", "twelve",
    "twenty", "two", "under", "unless", "until", "upon", "used", "using", "various", "very",
    "via", "was", "well", "were", "what", "whatever", "when", "whence", "whenever", "where",
    "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever", "whether", "which",
    "while", "whither", "who", "whoever", "whole", "whom", "whose", "why", "will", "with",
    "within", "without", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

fn stopwords() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOPWORDS.iter().copied().collect())
}

/// Whether `word` (lower-case) is a stopword.
pub fn is_stopword(word: &str) -> bool {
    stopwords().contains(word)
}

/// Collapse whitespace and replace unusual symbols with spaces.
///
/// Word characters, whitespace and `. , ! ? : ; - ( )` survive.
pub fn clean_text(text: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    static SYMBOLS: OnceLock<Regex> = OnceLock::new();

    if text.is_empty() {
        return String::new();
    }

    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("static pattern"));
    let symbols =
        SYMBOLS.get_or_init(|| Regex::new(r"[^\w\s.,!?:;\-()]").expect("static pattern"));

    let collapsed = whitespace.replace_all(text, " ");
    symbols.replace_all(&collapsed, " ").trim().to_string()
}

/// Whether the text has cased characters and none of them is lower-case.
pub fn is_all_upper(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// Whether every cased word starts upper-case and continues lower-case.
///
/// Any uncased character (space, digit, punctuation) starts a new word,
/// so "Chapter 1: Getting Started" qualifies and "iPhone Guide" does not.
pub fn is_title_case(text: &str) -> bool {
    let mut cased = false;
    let mut previous_cased = false;

    for c in text.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else {
            previous_cased = false;
        }
    }

    cased
}

/// Content keywords of `text`, de-duplicated in first-seen order.
///
/// Tokens are maximal alphanumeric runs; a token is kept when it is purely
/// alphabetic, longer than two characters and not a stopword.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();

    for token in text.split(|c: char| !c.is_alphanumeric()) {
        if token.chars().count() <= 2 || !token.chars().all(char::is_alphabetic) {
            continue;
        }
        let word = token.to_lowercase();
        if is_stopword(&word) {
            continue;
        }
        if seen.insert(word.clone()) {
            keywords.push(word);
        }
    }

    keywords
}

/// Keyword set of `text`, as used for overlap scoring.
pub fn keyword_set(text: &str) -> HashSet<String> {
    extract_keywords(text).into_iter().collect()
}

/// Coarse script detection: "ja" when kana or CJK ideographs make up more
/// than a tenth of the characters, "en" otherwise, "unknown" when empty.
pub fn detect_language(text: &str) -> &'static str {
    if text.is_empty() {
        return "unknown";
    }

    let total = text.chars().count();
    let japanese = text
        .chars()
        .filter(|&c| {
            matches!(c,
                '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}' | '\u{4E00}'..='\u{9FAF}')
        })
        .count();

    if japanese as f64 > total as f64 * 0.1 {
        "ja"
    } else {
        "en"
    }
}

/// A blank-line separated block of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextParagraph {
    /// Position among all blocks, including discarded short ones
    pub index: usize,
    pub text: String,
    pub word_count: usize,
    pub char_count: usize,
}

/// Split text on blank lines, keeping blocks longer than 20 characters.
pub fn split_paragraphs(text: &str) -> Vec<TextParagraph> {
    static BREAKS: OnceLock<Regex> = OnceLock::new();
    let breaks = BREAKS.get_or_init(|| Regex::new(r"\n\n+").expect("static pattern"));

    breaks
        .split(text)
        .enumerate()
        .filter_map(|(index, block)| {
            let block = block.trim();
            let char_count = block.chars().count();
            (char_count > 20).then(|| TextParagraph {
                index,
                text: block.to_string(),
                word_count: block.split_whitespace().count(),
                char_count,
            })
        })
        .collect()
}
