// Headline statistics for the dashboard's insight cards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::growth::{trending_topics, GrowthThresholds, TrendingTopic};
use super::{counts_by_topic, ensure_nonempty, percentage, ranked_topics, round1, topic_index};
use crate::error::TrendsError;
use crate::models::Post;
use crate::topics::taxonomy::Taxonomy;

/// Number of topics listed under "most discussed".
const MOST_DISCUSSED_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    /// YYYY-MM-DD
    pub start: String,
    /// YYYY-MM-DD
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopTopic {
    pub name: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscussedTopic {
    pub topic: String,
    pub total_comments: u64,
}

/// Corpus-wide summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub total_posts: u64,
    pub date_range: DateRange,
    pub years_analyzed: u64,
    pub topics_tracked: u64,
    pub top_topic: TopTopic,
    pub trending_topics: Vec<TrendingTopic>,
    /// Year -> post count, years ascending
    pub posts_per_year: BTreeMap<i32, u64>,
    pub average_score: f64,
    pub average_comments: f64,
    pub most_discussed: Vec<DiscussedTopic>,
}

/// Compute all headline statistics.
pub fn insights(
    posts: &[Post],
    taxonomy: &Taxonomy,
    thresholds: &GrowthThresholds,
) -> Result<Insights, TrendsError> {
    const REPORT: &str = "summary statistics";
    ensure_nonempty(posts, REPORT)?;

    let total = posts.len() as u64;

    // ensure_nonempty guarantees min/max exist
    let start = posts.iter().map(|p| p.created_at).min().unwrap_or_default();
    let end = posts.iter().map(|p| p.created_at).max().unwrap_or_default();

    let mut posts_per_year: BTreeMap<i32, u64> = BTreeMap::new();
    for post in posts {
        *posts_per_year.entry(post.year()).or_insert(0) += 1;
    }

    let counts = counts_by_topic(posts, taxonomy, REPORT)?;
    let ranked = ranked_topics(&counts);
    let (top_idx, top_count) = ranked
        .first()
        .copied()
        .ok_or(TrendsError::EmptyCorpus { report: REPORT })?;
    let top_name = &taxonomy.topics()[top_idx].name;

    let mut comments_by_topic = vec![0u64; taxonomy.len()];
    for post in posts {
        comments_by_topic[topic_index(post, taxonomy, REPORT)?] += post.num_comments;
    }
    let mut discussed: Vec<(usize, u64)> = ranked
        .iter()
        .map(|(idx, _)| (*idx, comments_by_topic[*idx]))
        .collect();
    discussed.sort_by(|a, b| b.1.cmp(&a.1));
    discussed.truncate(MOST_DISCUSSED_LIMIT);

    let score_sum: i64 = posts.iter().map(|p| p.score).sum();
    let comment_sum: u64 = posts.iter().map(|p| p.num_comments).sum();

    let summary = Insights {
        total_posts: total,
        date_range: DateRange {
            start: start.format("%Y-%m-%d").to_string(),
            end: end.format("%Y-%m-%d").to_string(),
        },
        years_analyzed: posts_per_year.len() as u64,
        topics_tracked: ranked.len() as u64,
        top_topic: TopTopic {
            name: taxonomy.label_for(top_name),
            count: top_count,
            percentage: percentage(top_count, total),
        },
        trending_topics: trending_topics(posts, taxonomy, thresholds)?,
        posts_per_year,
        average_score: round1(score_sum as f64 / total as f64),
        average_comments: round1(comment_sum as f64 / total as f64),
        most_discussed: discussed
            .into_iter()
            .map(|(idx, total_comments)| DiscussedTopic {
                topic: taxonomy.label_for(&taxonomy.topics()[idx].name),
                total_comments,
            })
            .collect(),
    };

    info!(
        total_posts = summary.total_posts,
        years = summary.years_analyzed,
        topics = summary.topics_tracked,
        "Generated insights"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topics::taxonomy::TopicDef;
    use chrono::{TimeZone, Utc};

    fn post(id: &str, ymd: (i32, u32, u32), score: i64, comments: u64, topic: &str) -> Post {
        Post {
            id: id.to_string(),
            title: String::new(),
            body: String::new(),
            author: "a".to_string(),
            score,
            num_comments: comments,
            created_at: Utc.with_ymd_and_hms(ymd.0, ymd.1, ymd.2, 9, 0, 0).unwrap(),
            topic: Some(topic.to_string()),
        }
    }

    #[test]
    fn test_insights_basic_reductions() {
        let taxonomy = Taxonomy::new(
            vec![
                TopicDef::new("Traffic", &["traffic"]),
                TopicDef::new("Food_Drink", &["food"]),
                TopicDef::new("Other", &[]),
            ],
            "Other",
        )
        .unwrap();
        let posts = vec![
            post("1", (2020, 3, 4), 10, 1, "Traffic"),
            post("2", (2019, 1, 2), -4, 30, "Food_Drink"),
            post("3", (2021, 12, 31), 3, 2, "Traffic"),
        ];

        let s = insights(&posts, &taxonomy, &GrowthThresholds::default()).unwrap();
        assert_eq!(s.total_posts, 3);
        assert_eq!(s.date_range.start, "2019-01-02");
        assert_eq!(s.date_range.end, "2021-12-31");
        assert_eq!(s.years_analyzed, 3);
        assert_eq!(s.topics_tracked, 2);
        assert_eq!(s.top_topic.name, "Traffic");
        assert_eq!(s.top_topic.percentage, 66.7);
        assert_eq!(s.average_score, 3.0);
        assert_eq!(s.average_comments, 11.0);
        assert_eq!(s.most_discussed[0].topic, "Food & Drink");
        assert_eq!(s.most_discussed[0].total_comments, 30);
        assert!(s.trending_topics.is_empty());
        assert_eq!(s.posts_per_year.values().sum::<u64>(), 3);
    }

    #[test]
    fn test_empty_corpus_is_an_error() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let err = insights(&[], &taxonomy, &GrowthThresholds::default()).unwrap_err();
        assert!(matches!(err, TrendsError::EmptyCorpus { .. }));
    }
}
