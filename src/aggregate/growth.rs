// Growth detection: which topics grew or shrank between two halves of the corpus.
//
// The corpus is split at the median post year: posts from years at or
// before the median are the first half, everything later is the second.
// A topic's growth rate is the percentage change in post count between the
// halves.
//
// Only topics with a meaningful first-half baseline are considered, which
// keeps small denominators from producing absurd percentages. The flip side
// is that a topic with no early posts can never show up as trending, however
// large it grows later.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ensure_nonempty, round1, topic_index};
use crate::error::TrendsError;
use crate::models::Post;
use crate::topics::taxonomy::Taxonomy;

/// Significance thresholds for trend detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthThresholds {
    /// Minimum first-half posts for a topic to be considered (default 6)
    pub min_baseline_posts: u64,
    /// Growth must exceed this many percent in either direction (default 30.0)
    pub min_abs_growth_pct: f64,
    /// Maximum number of trending topics reported (default 5)
    pub max_topics: usize,
}

impl Default for GrowthThresholds {
    fn default() -> Self {
        Self {
            min_baseline_posts: 6,
            min_abs_growth_pct: 30.0,
            max_topics: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// A topic whose volume changed significantly between the two halves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingTopic {
    /// Display name
    pub topic: String,
    /// Percentage change, one decimal place
    pub growth_rate: f64,
    pub trend: Direction,
    #[serde(skip)]
    pub first_half: u64,
    #[serde(skip)]
    pub second_half: u64,
}

/// Median of the post years. Even-sized corpora average the two middle years,
/// so the split point can fall between two years.
pub fn median_year(posts: &[Post]) -> Result<f64, TrendsError> {
    ensure_nonempty(posts, "median year")?;
    let mut years: Vec<i32> = posts.iter().map(Post::year).collect();
    years.sort_unstable();
    let mid = years.len() / 2;
    Ok(if years.len() % 2 == 0 {
        (years[mid - 1] as f64 + years[mid] as f64) / 2.0
    } else {
        years[mid] as f64
    })
}

/// Topics with significant growth, largest absolute change first.
pub fn trending_topics(
    posts: &[Post],
    taxonomy: &Taxonomy,
    thresholds: &GrowthThresholds,
) -> Result<Vec<TrendingTopic>, TrendsError> {
    const REPORT: &str = "trending topics";
    ensure_nonempty(posts, REPORT)?;

    let split = median_year(posts)?;
    let mut first = vec![0u64; taxonomy.len()];
    let mut second = vec![0u64; taxonomy.len()];
    for post in posts {
        let idx = topic_index(post, taxonomy, REPORT)?;
        if post.year() as f64 <= split {
            first[idx] += 1;
        } else {
            second[idx] += 1;
        }
    }

    let mut trending: Vec<(TrendingTopic, f64)> = Vec::new();
    for (idx, topic) in taxonomy.topics().iter().enumerate() {
        let (before, after) = (first[idx], second[idx]);
        if before == 0 || before < thresholds.min_baseline_posts {
            continue;
        }

        let growth = (after as f64 - before as f64) / before as f64 * 100.0;
        if growth.abs() <= thresholds.min_abs_growth_pct {
            debug!(topic = %topic.name, growth, "Change below significance threshold");
            continue;
        }

        trending.push((
            TrendingTopic {
                topic: taxonomy.label_for(&topic.name),
                growth_rate: round1(growth),
                trend: if growth > 0.0 {
                    Direction::Up
                } else {
                    Direction::Down
                },
                first_half: before,
                second_half: after,
            },
            growth.abs(),
        ));
    }

    // Stable sort: equal magnitudes keep taxonomy order.
    trending.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    trending.truncate(thresholds.max_topics);

    info!(
        split_year = split,
        trending = trending.len(),
        "Computed topic growth between corpus halves"
    );
    Ok(trending.into_iter().map(|(t, _)| t).collect())
}
