// Data models: the post record that flows through the pipeline.
//
// A Post is created once by ingestion, gains its topic once via the
// classifier, and is read-only after that. Every report reads posts and
// builds fresh aggregate structures; nothing downstream mutates a post.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TrendsError;

/// Author sentinel used when the source record has no author.
pub const DELETED_AUTHOR: &str = "[deleted]";

/// A single forum post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    /// Self-text of the post. Link posts have an empty body.
    pub body: String,
    pub author: String,
    /// Net score. Can be negative.
    pub score: i64,
    pub num_comments: u64,
    pub created_at: DateTime<Utc>,
    /// Assigned by the classifier. `None` until then.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl Post {
    /// Consume the post and return it labeled with `topic`.
    pub fn with_topic(self, topic: impl Into<String>) -> Self {
        Self {
            topic: Some(topic.into()),
            ..self
        }
    }

    /// Calendar year bucket.
    pub fn year(&self) -> i32 {
        self.created_at.year()
    }

    /// Year-month bucket, zero padded so it sorts lexicographically ("2021-03").
    pub fn year_month(&self) -> String {
        self.created_at.format("%Y-%m").to_string()
    }

    /// The assigned topic, or an `Unclassified` error naming the report that needed it.
    pub fn topic_for(&self, report: &'static str) -> Result<&str, TrendsError> {
        self.topic
            .as_deref()
            .ok_or_else(|| TrendsError::Unclassified {
                report,
                post_id: self.id.clone(),
            })
    }
}
