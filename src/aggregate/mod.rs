// Aggregate reports over a classified corpus.
//
// Every report is a pure function of the posts and the taxonomy. Each one
// refuses an empty corpus and unlabeled posts up front, so no report ever
// divides by zero or silently skips a post.

pub mod distribution;
pub mod growth;
pub mod summary;
pub mod top_posts;
pub mod trends;

use crate::error::TrendsError;
use crate::models::Post;
use crate::topics::taxonomy::Taxonomy;

/// Fail with `EmptyCorpus` when there is nothing to aggregate.
pub(crate) fn ensure_nonempty(posts: &[Post], report: &'static str) -> Result<(), TrendsError> {
    if posts.is_empty() {
        return Err(TrendsError::EmptyCorpus { report });
    }
    Ok(())
}

/// Taxonomy index of a post's topic. Errors for unlabeled posts and for labels
/// the taxonomy doesn't declare.
pub(crate) fn topic_index(
    post: &Post,
    taxonomy: &Taxonomy,
    report: &'static str,
) -> Result<usize, TrendsError> {
    let topic = post.topic_for(report)?;
    taxonomy
        .position(topic)
        .ok_or_else(|| TrendsError::UnknownTopic {
            post_id: post.id.clone(),
            topic: topic.to_string(),
        })
}

/// Post count per topic, indexed like `taxonomy.topics()`.
pub(crate) fn counts_by_topic(
    posts: &[Post],
    taxonomy: &Taxonomy,
    report: &'static str,
) -> Result<Vec<u64>, TrendsError> {
    let mut counts = vec![0u64; taxonomy.len()];
    for post in posts {
        counts[topic_index(post, taxonomy, report)?] += 1;
    }
    Ok(counts)
}

/// Topics with at least one post, most posts first. Equal counts keep
/// taxonomy order.
pub(crate) fn ranked_topics(counts: &[u64]) -> Vec<(usize, u64)> {
    let mut ranked: Vec<(usize, u64)> = counts
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, count)| *count > 0)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Share of `total` as a percentage rounded to one decimal place.
pub(crate) fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(count as f64 / total as f64 * 100.0)
}

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
