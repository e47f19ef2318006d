// Overall topic distribution: how the corpus splits across topics.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{counts_by_topic, ensure_nonempty, percentage, ranked_topics};
use crate::error::TrendsError;
use crate::models::Post;
use crate::topics::taxonomy::Taxonomy;

/// One slice of the distribution chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicShare {
    /// Display name ("Housing & Rent")
    pub name: String,
    /// Number of posts in the topic
    pub value: u64,
    /// Share of the whole corpus, one decimal place
    pub percentage: f64,
    pub color: String,
    /// Taxonomy name, kept for lookups but not part of the dashboard schema
    #[serde(skip)]
    pub topic: String,
}

/// Topics with at least one post, most posts first (ties in taxonomy order).
pub fn topic_distribution(
    posts: &[Post],
    taxonomy: &Taxonomy,
) -> Result<Vec<TopicShare>, TrendsError> {
    const REPORT: &str = "topic distribution";
    ensure_nonempty(posts, REPORT)?;

    let counts = counts_by_topic(posts, taxonomy, REPORT)?;
    let total = posts.len() as u64;

    let shares: Vec<TopicShare> = ranked_topics(&counts)
        .into_iter()
        .map(|(idx, count)| {
            let name = &taxonomy.topics()[idx].name;
            TopicShare {
                name: taxonomy.label_for(name),
                value: count,
                percentage: percentage(count, total),
                color: taxonomy.color_for(name).to_string(),
                topic: name.clone(),
            }
        })
        .collect();

    info!(topics = shares.len(), "Generated topic distribution");
    Ok(shares)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topics::taxonomy::{TopicDef, DEFAULT_TOPIC_COLOR};
    use chrono::{TimeZone, Utc};

    fn post(id: &str, topic: &str) -> Post {
        Post {
            id: id.to_string(),
            title: String::new(),
            body: String::new(),
            author: "a".to_string(),
            score: 0,
            num_comments: 0,
            created_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            topic: Some(topic.to_string()),
        }
    }

    #[test]
    fn test_distribution_orders_and_colors() {
        let mut traffic = TopicDef::new("Traffic", &["traffic"]);
        traffic.color = Some("#ef4444".to_string());
        let taxonomy = Taxonomy::new(
            vec![
                traffic,
                TopicDef::new("Housing_Rent", &["rent"]),
                TopicDef::new("Weather", &["rain"]),
                TopicDef::new("Other", &[]),
            ],
            "Other",
        )
        .unwrap();

        let posts = vec![
            post("1", "Housing_Rent"),
            post("2", "Traffic"),
            post("3", "Housing_Rent"),
            post("4", "Other"),
        ];
        let shares = topic_distribution(&posts, &taxonomy).unwrap();

        let names: Vec<&str> = shares.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Housing & Rent", "Traffic", "Other"]);
        assert_eq!(shares[0].percentage, 50.0);
        assert_eq!(shares[1].color, "#ef4444");
        assert_eq!(shares[0].color, DEFAULT_TOPIC_COLOR);
        assert_eq!(shares.iter().map(|s| s.value).sum::<u64>(), 4);
    }
}
