//! Comparative coverage summary across a set of enriched articles.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::types::{EnrichedArticle, SentimentLabel, Topic};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    pub article_count: usize,
    /// Articles per sentiment label. Labels with no articles are omitted.
    pub sentiment_distribution: BTreeMap<SentimentLabel, usize>,
    /// Articles tagged with each topic.
    pub topic_counts: BTreeMap<Topic, usize>,
    pub unique_topics: Vec<Topic>,
}

impl CoverageReport {
    #[must_use]
    pub fn from_articles(articles: &[EnrichedArticle]) -> Self {
        let mut sentiment_distribution = BTreeMap::new();
        let mut topic_counts = BTreeMap::new();
        let mut unique = BTreeSet::new();

        for article in articles {
            *sentiment_distribution
                .entry(article.sentiment.label)
                .or_insert(0) += 1;
            for topic in article.topics.iter() {
                *topic_counts.entry(topic).or_insert(0) += 1;
                unique.insert(topic);
            }
        }

        Self {
            article_count: articles.len(),
            sentiment_distribution,
            topic_counts,
            unique_topics: unique.into_iter().collect(),
        }
    }

    /// The sentiment label with the most articles, ties broken by label order.
    #[must_use]
    pub fn dominant_sentiment(&self) -> Option<SentimentLabel> {
        self.sentiment_distribution
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(label, _)| *label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SentimentVerdict, TopicSet};

    fn enriched(topics: &[Topic], label: SentimentLabel) -> EnrichedArticle {
        EnrichedArticle {
            title: "t".to_string(),
            summary: "s".to_string(),
            topics: TopicSet::from_matches(topics.iter().copied()),
            sentiment: SentimentVerdict::new(label, 0.8),
        }
    }

    #[test]
    fn empty_input_gives_zero_report() {
        let report = CoverageReport::from_articles(&[]);
        assert_eq!(report.article_count, 0);
        assert!(report.sentiment_distribution.is_empty());
        assert!(report.unique_topics.is_empty());
        assert_eq!(report.dominant_sentiment(), None);
    }

    #[test]
    fn counts_sentiments_and_topics() {
        let articles = vec![
            enriched(
                &[Topic::Finance, Topic::Technology],
                SentimentLabel::Positive,
            ),
            enriched(&[Topic::Finance], SentimentLabel::Negative),
            enriched(&[], SentimentLabel::Positive),
        ];
        let report = CoverageReport::from_articles(&articles);

        assert_eq!(report.article_count, 3);
        assert_eq!(report.sentiment_distribution[&SentimentLabel::Positive], 2);
        assert_eq!(report.sentiment_distribution[&SentimentLabel::Negative], 1);
        assert!(!report
            .sentiment_distribution
            .contains_key(&SentimentLabel::Neutral));
        assert_eq!(report.topic_counts[&Topic::Finance], 2);
        assert_eq!(report.topic_counts[&Topic::General], 1);
        assert_eq!(
            report.unique_topics,
            vec![Topic::Finance, Topic::Technology, Topic::General]
        );
        assert_eq!(report.dominant_sentiment(), Some(SentimentLabel::Positive));
    }

    #[test]
    fn dominant_sentiment_tie_prefers_earlier_label() {
        let articles = vec![
            enriched(&[], SentimentLabel::Positive),
            enriched(&[], SentimentLabel::Negative),
        ];
        let report = CoverageReport::from_articles(&articles);
        assert_eq!(report.dominant_sentiment(), Some(SentimentLabel::Negative));
    }

    #[test]
    fn report_serializes_label_keys() {
        let report =
            CoverageReport::from_articles(&[enriched(&[Topic::Energy], SentimentLabel::Neutral)]);
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["sentiment_distribution"]["Neutral"], 1);
        assert_eq!(json["topic_counts"]["Energy"], 1);
        assert_eq!(json["unique_topics"], serde_json::json!(["Energy"]));
    }
}
