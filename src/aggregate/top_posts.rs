// Top posts: the highest-scoring posts drawn from the busiest topics.
//
// Sampling per topic first keeps one runaway topic from filling the whole
// list: each of the busiest topics contributes at most a few posts, then the
// pool is ranked by score and cut to the requested length.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{counts_by_topic, ensure_nonempty, ranked_topics, topic_index};
use crate::error::TrendsError;
use crate::models::Post;
use crate::output::truncate_chars;
use crate::topics::taxonomy::Taxonomy;

/// Titles longer than this are cut and suffixed with "...".
pub const TITLE_MAX_CHARS: usize = 100;

/// How the top-post pool is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopPostSettings {
    /// Number of busiest topics to sample from (default 8)
    pub top_topics: usize,
    /// Posts taken from each sampled topic (default 3)
    pub per_topic: usize,
    /// Final list length, N (default 15)
    pub limit: usize,
}

impl Default for TopPostSettings {
    fn default() -> Self {
        Self {
            top_topics: 8,
            per_topic: 3,
            limit: 15,
        }
    }
}

/// A post as shown in the dashboard's top-post list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPost {
    pub topic: String,
    pub title: String,
    pub year: i32,
    pub score: i64,
    pub num_comments: u64,
}

/// Highest-score posts from the busiest topics, best first.
///
/// Equal scores keep ingestion order, both within a topic and in the pool.
pub fn top_posts(
    posts: &[Post],
    taxonomy: &Taxonomy,
    settings: &TopPostSettings,
) -> Result<Vec<TopPost>, TrendsError> {
    const REPORT: &str = "top posts";
    ensure_nonempty(posts, REPORT)?;

    let counts = counts_by_topic(posts, taxonomy, REPORT)?;
    let busiest: Vec<usize> = ranked_topics(&counts)
        .into_iter()
        .take(settings.top_topics)
        .map(|(idx, _)| idx)
        .collect();

    let mut pool: Vec<&Post> = Vec::new();
    for idx in busiest {
        let mut in_topic: Vec<&Post> = Vec::new();
        for post in posts {
            if topic_index(post, taxonomy, REPORT)? == idx {
                in_topic.push(post);
            }
        }
        in_topic.sort_by(|a, b| b.score.cmp(&a.score));
        pool.extend(in_topic.into_iter().take(settings.per_topic));
    }

    pool.sort_by(|a, b| b.score.cmp(&a.score));
    pool.truncate(settings.limit);

    let top: Vec<TopPost> = pool
        .into_iter()
        .map(|post| TopPost {
            topic: post.topic.clone().unwrap_or_default(),
            title: truncate_chars(&post.title, TITLE_MAX_CHARS),
            year: post.year(),
            score: post.score,
            num_comments: post.num_comments,
        })
        .collect();

    info!(posts = top.len(), "Generated top posts");
    Ok(top)
}
