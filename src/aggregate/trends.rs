// Time-bucketed topic counts (yearly and monthly).
//
// Each row carries a bucket key and one count per taxonomy topic, in
// taxonomy order, zero-filled. Rows serialize as flat JSON objects whose
// key order is the bucket key followed by the topic columns, so consumers
// can rely on a stable column order.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::info;

use super::{ensure_nonempty, topic_index};
use crate::error::TrendsError;
use crate::models::Post;
use crate::topics::taxonomy::Taxonomy;

/// The time bucket a trend row describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bucket {
    Year(i32),
    /// "YYYY-MM", zero padded
    Month(String),
}

/// Topic counts for one time bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendRow {
    pub bucket: Bucket,
    /// (topic name, count) in taxonomy order
    pub counts: Vec<(String, u64)>,
}

impl TrendRow {
    /// Count for a single topic (0 if the topic isn't a column).
    pub fn count(&self, topic: &str) -> u64 {
        self.counts
            .iter()
            .find(|(name, _)| name == topic)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    /// Posts in this bucket across all topics.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|(_, c)| c).sum()
    }
}

impl Serialize for TrendRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len() + 1))?;
        match &self.bucket {
            Bucket::Year(year) => map.serialize_entry("year", year)?,
            Bucket::Month(month) => map.serialize_entry("month", month)?,
        }
        for (topic, count) in &self.counts {
            map.serialize_entry(topic, count)?;
        }
        map.end()
    }
}

/// Group posts into ordered buckets and count topics per bucket.
fn bucketed<K: Ord>(
    posts: &[Post],
    taxonomy: &Taxonomy,
    report: &'static str,
    key: impl Fn(&Post) -> K,
    bucket: impl Fn(K) -> Bucket,
) -> Result<Vec<TrendRow>, TrendsError> {
    ensure_nonempty(posts, report)?;

    let mut grid: BTreeMap<K, Vec<u64>> = BTreeMap::new();
    for post in posts {
        let idx = topic_index(post, taxonomy, report)?;
        grid.entry(key(post))
            .or_insert_with(|| vec![0; taxonomy.len()])[idx] += 1;
    }

    Ok(grid
        .into_iter()
        .map(|(k, counts)| TrendRow {
            bucket: bucket(k),
            counts: taxonomy
                .topics()
                .iter()
                .zip(counts)
                .map(|(topic, count)| (topic.name.clone(), count))
                .collect(),
        })
        .collect())
}

/// Per-year topic counts, years ascending.
pub fn yearly_trends(posts: &[Post], taxonomy: &Taxonomy) -> Result<Vec<TrendRow>, TrendsError> {
    let rows = bucketed(posts, taxonomy, "yearly topic trend", Post::year, Bucket::Year)?;
    info!(years = rows.len(), "Generated yearly topic trends");
    Ok(rows)
}

/// Per-month topic counts. "YYYY-MM" keys sort chronologically as strings.
pub fn monthly_trends(posts: &[Post], taxonomy: &Taxonomy) -> Result<Vec<TrendRow>, TrendsError> {
    let rows = bucketed(
        posts,
        taxonomy,
        "monthly topic trend",
        Post::year_month,
        Bucket::Month,
    )?;
    info!(months = rows.len(), "Generated monthly topic trends");
    Ok(rows)
}

/// The `k` busiest topics of each year, most posts first.
pub fn top_topics_per_year(
    posts: &[Post],
    taxonomy: &Taxonomy,
    k: usize,
) -> Result<Vec<(i32, Vec<(String, u64)>)>, TrendsError> {
    let rows = bucketed(posts, taxonomy, "top topics per year", Post::year, Bucket::Year)?;
    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let Bucket::Year(year) = row.bucket else {
                return None;
            };
            let mut counts: Vec<(String, u64)> =
                row.counts.into_iter().filter(|(_, c)| *c > 0).collect();
            counts.sort_by(|a, b| b.1.cmp(&a.1));
            counts.truncate(k);
            Some((year, counts))
        })
        .collect())
}
