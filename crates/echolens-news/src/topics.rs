//! Keyword-based topic classifier.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{Topic, TopicSet};

/// Topic keyword dictionary.
///
/// Keywords are matched as whole words, case-insensitively. A topic is
/// assigned as soon as any one of its keywords matches.
pub(crate) const TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (
        Topic::Finance,
        &[
            "finance",
            "stock",
            "investment",
            "market",
            "bank",
            "economy",
            "profit",
            "revenue",
            "earnings",
        ],
    ),
    (
        Topic::Technology,
        &[
            "technology",
            "tech",
            "software",
            "hardware",
            "AI",
            "machine learning",
            "innovation",
            "gadget",
        ],
    ),
    (
        Topic::Science,
        &[
            "science",
            "research",
            "study",
            "discovery",
            "biology",
            "physics",
            "chemistry",
        ],
    ),
    (
        Topic::Healthcare,
        &[
            "healthcare",
            "medicine",
            "medical",
            "health",
            "pharma",
            "hospital",
        ],
    ),
    (
        Topic::Energy,
        &["energy", "oil", "gas", "renewable", "solar", "wind"],
    ),
    (
        Topic::Entertainment,
        &["entertainment", "movie", "music", "streaming", "tv"],
    ),
    (
        Topic::Automotive,
        &["automotive", "car", "vehicle", "electric vehicle", "EV"],
    ),
];

/// Compiled keyword matchers, one `\bkeyword\b` pattern per keyword.
static TOPIC_MATCHERS: LazyLock<Vec<(Topic, Vec<Regex>)>> = LazyLock::new(|| {
    TOPIC_KEYWORDS
        .iter()
        .map(|&(topic, keywords)| {
            let patterns = keywords
                .iter()
                .map(|kw| {
                    let pattern = format!(r"\b{}\b", regex::escape(&kw.to_lowercase()));
                    Regex::new(&pattern).expect("valid keyword regex")
                })
                .collect();
            (topic, patterns)
        })
        .collect()
});

/// Classify text into topics.
///
/// Returns every topic with at least one whole-word keyword hit. Text with no
/// hits, including the empty string, yields `{General}`.
#[must_use]
pub fn classify(text: &str) -> TopicSet {
    let lowered = text.to_lowercase();
    TopicSet::from_matches(
        TOPIC_MATCHERS
            .iter()
            .filter(|(_, patterns)| patterns.iter().any(|re| re.is_match(&lowered)))
            .map(|(topic, _)| *topic),
    )
}
