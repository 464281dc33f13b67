use crate::models::{ContentLength, ContentStats, KeywordDensity};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("body selector should be valid"));
static PARAGRAPH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("p selector should be valid"));
static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("sentence regex should be valid"));

/// Elements whose text never counts as page content
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Number of keywords reported in the density table
pub const KEYWORD_LIMIT: usize = 10;
/// Keywords must be longer than this many characters
pub const KEYWORD_MIN_LEN: usize = 3;
/// Words must be longer than this many characters to be counted
pub const WORD_MIN_LEN: usize = 2;
/// Fixed syllables-per-word ratio used instead of a real syllable counter
pub const SYLLABLES_PER_WORD: f64 = 1.5;

/// Words excluded from keyword density
pub const STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "also", "been", "before", "being", "below",
    "between", "both", "could", "does", "doing", "down", "during", "each", "even", "every",
    "from", "further", "have", "having", "here", "hers", "herself", "himself", "into", "itself",
    "just", "like", "made", "make", "many", "more", "most", "much", "must", "myself", "never",
    "only", "other", "ought", "ours", "ourselves", "over", "same", "should", "some", "such",
    "than", "that", "their", "theirs", "them", "themselves", "then", "there", "these", "they",
    "this", "those", "through", "under", "until", "upon", "very", "want", "well", "were",
    "what", "when", "where", "which", "while", "whom", "will", "with", "within", "without",
    "would", "your", "yours", "yourself", "yourselves",
];

/// Visible text of `root`, one space between text nodes.
fn visible_text(root: ElementRef) -> String {
    let mut text = String::new();

    for node in root.descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if !hidden {
            text.push_str(fragment);
            text.push(' ');
        }
    }

    text
}

/// Body text of the document; the whole document when there is no `<body>`.
pub fn body_text(document: &Html) -> String {
    match document.select(&BODY_SELECTOR).next() {
        Some(body) => visible_text(body),
        None => visible_text(document.root_element()),
    }
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace()
        .filter(|token| token.chars().count() > WORD_MIN_LEN)
        .count()
}

pub fn count_sentences(text: &str) -> usize {
    SENTENCE_BREAK
        .split(text)
        .filter(|sentence| !sentence.trim().is_empty())
        .count()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Flesch Reading Ease with a fixed syllable ratio, clamped to [0, 100].
/// Degenerate input (no words or no sentences) scores 0.
pub fn readability_score(text: &str) -> f64 {
    let words = text.split_whitespace().count();
    let sentences = count_sentences(text);
    if words == 0 || sentences == 0 {
        return 0.0;
    }

    let words = words as f64;
    let syllables = words * SYLLABLES_PER_WORD;
    let score = 206.835 - 1.015 * (words / sentences as f64) - 84.6 * (syllables / words);

    if score.is_finite() {
        round1(score.clamp(0.0, 100.0))
    } else {
        0.0
    }
}

/// Top keywords by frequency, each as a percentage of all whitespace tokens.
///
/// Ties keep the order in which the keywords were first seen.
pub fn keyword_density(text: &str) -> Vec<KeywordDensity> {
    let mut total_tokens = 0usize;
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for token in text.split_whitespace() {
        total_tokens += 1;

        let word: String = token
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        if word.chars().count() <= KEYWORD_MIN_LEN || STOPWORDS.contains(&word.as_str()) {
            continue;
        }

        match positions.get(&word) {
            Some(&index) => order[index].1 += 1,
            None => {
                positions.insert(word.clone(), order.len());
                order.push((word, 1));
            }
        }
    }

    if total_tokens == 0 {
        return Vec::new();
    }

    // Stable sort preserves first-seen order among equal counts
    order.sort_by(|a, b| b.1.cmp(&a.1));

    order
        .into_iter()
        .take(KEYWORD_LIMIT)
        .map(|(keyword, count)| KeywordDensity {
            keyword,
            percentage: count as f64 / total_tokens as f64 * 100.0,
        })
        .collect()
}

pub fn extract_content_stats(document: &Html) -> ContentStats {
    let text = body_text(document);
    let word_count = count_words(&text);

    ContentStats {
        word_count,
        paragraph_count: document.select(&PARAGRAPH_SELECTOR).count(),
        readability_score: readability_score(&text),
        keyword_density: keyword_density(&text),
        content_length: ContentLength::from_word_count(word_count),
    }
}
