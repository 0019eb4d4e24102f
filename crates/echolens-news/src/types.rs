use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// Placeholder used when the upstream article has no title.
pub const TITLE_PLACEHOLDER: &str = "No Title";
/// Placeholder used when the upstream article has no description.
pub const SUMMARY_PLACEHOLDER: &str = "No Description";

/// An article as returned by a news source, before enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArticle {
    pub title: String,
    /// The upstream description.
    pub summary: String,
}

impl RawArticle {
    /// Builds an article, substituting placeholders for missing or empty fields.
    #[must_use]
    pub fn new(title: Option<String>, summary: Option<String>) -> Self {
        Self {
            title: title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| TITLE_PLACEHOLDER.to_string()),
            summary: summary
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| SUMMARY_PLACEHOLDER.to_string()),
        }
    }

    /// Title and summary joined by a space, the text topics are classified from.
    #[must_use]
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.summary)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Topic {
    Finance,
    Technology,
    Science,
    Healthcare,
    Energy,
    Entertainment,
    Automotive,
    /// Fallback when no keyword matches.
    General,
}

impl Topic {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Finance => "Finance",
            Topic::Technology => "Technology",
            Topic::Science => "Science",
            Topic::Healthcare => "Healthcare",
            Topic::Energy => "Energy",
            Topic::Entertainment => "Entertainment",
            Topic::Automotive => "Automotive",
            Topic::General => "General",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-empty set of topics assigned to one article.
///
/// Serializes as a JSON array of labels. Iteration follows the [`Topic`]
/// declaration order, but consumers should treat it as a set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TopicSet(BTreeSet<Topic>);

impl TopicSet {
    /// The `{General}` set.
    #[must_use]
    pub fn general() -> Self {
        Self(BTreeSet::from([Topic::General]))
    }

    /// Collects matched topics, falling back to `{General}` when there are none.
    #[must_use]
    pub fn from_matches<I: IntoIterator<Item = Topic>>(topics: I) -> Self {
        let set: BTreeSet<Topic> = topics.into_iter().collect();
        if set.is_empty() {
            Self::general()
        } else {
            Self(set)
        }
    }

    #[must_use]
    pub fn contains(&self, topic: Topic) -> bool {
        self.0.contains(&topic)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Topic> + '_ {
        self.0.iter().copied()
    }

    /// Comma-separated labels, as shown in terminal output.
    #[must_use]
    pub fn joined(&self) -> String {
        self.iter()
            .map(Topic::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
    /// Scoring failed or produced no verdict.
    Unknown,
}

impl SentimentLabel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categorical sentiment plus model confidence in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentVerdict {
    pub label: SentimentLabel,
    pub score: f32,
}

impl SentimentVerdict {
    #[must_use]
    pub fn new(label: SentimentLabel, score: f32) -> Self {
        Self {
            label,
            score: score.clamp(0.0, 1.0),
        }
    }

    /// Sentinel verdict for articles whose scoring failed.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            label: SentimentLabel::Unknown,
            score: 0.0,
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.label == SentimentLabel::Unknown
    }
}

/// A raw article with its topics and sentiment attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedArticle {
    pub title: String,
    pub summary: String,
    pub topics: TopicSet,
    pub sentiment: SentimentVerdict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_article_substitutes_placeholders() {
        let article = RawArticle::new(None, Some(String::new()));
        assert_eq!(article.title, TITLE_PLACEHOLDER);
        assert_eq!(article.summary, SUMMARY_PLACEHOLDER);
    }

    #[test]
    fn raw_article_keeps_present_fields() {
        let article = RawArticle::new(Some("Title".into()), Some("Body".into()));
        assert_eq!(article.combined_text(), "Title Body");
    }

    #[test]
    fn topic_set_from_no_matches_is_general() {
        let set = TopicSet::from_matches(std::iter::empty());
        assert_eq!(set, TopicSet::general());
        assert_eq!(set.len(), 1);
        assert!(!set.is_empty());
    }

    #[test]
    fn topic_set_serializes_as_label_array() {
        let set = TopicSet::from_matches([Topic::Finance, Topic::Automotive]);
        let json = serde_json::to_value(&set).expect("serialize");
        assert_eq!(json, serde_json::json!(["Finance", "Automotive"]));
    }

    #[test]
    fn verdict_clamps_score() {
        let high = SentimentVerdict::new(SentimentLabel::Positive, 1.5);
        let low = SentimentVerdict::new(SentimentLabel::Negative, -0.2);
        assert_eq!(high.score, 1.0);
        assert_eq!(low.score, 0.0);
    }

    #[test]
    fn enriched_article_serializes_expected_shape() {
        let article = EnrichedArticle {
            title: "Tesla unveils new EV".to_string(),
            summary: "Tesla stock surges".to_string(),
            topics: TopicSet::from_matches([Topic::Automotive]),
            sentiment: SentimentVerdict::unknown(),
        };
        let json = serde_json::to_value(&article).expect("serialize");
        assert_eq!(json["title"], "Tesla unveils new EV");
        assert_eq!(json["topics"], serde_json::json!(["Automotive"]));
        assert_eq!(json["sentiment"]["label"], "Unknown");
        assert_eq!(json["sentiment"]["score"].as_f64(), Some(0.0));
    }
}
