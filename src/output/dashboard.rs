// Dashboard document: the single JSON file the presentation layer reads.
//
// Top-level keys are fixed and always emitted in this order:
//   metadata, insights, topic_trends, topic_distribution, top_posts,
//   monthly_trends, topic_keywords
//
// The whole document is assembled and rendered in memory before anything
// touches the filesystem.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregate::distribution::{topic_distribution, TopicShare};
use crate::aggregate::growth::GrowthThresholds;
use crate::aggregate::summary::{insights, Insights};
use crate::aggregate::top_posts::{top_posts, TopPost, TopPostSettings};
use crate::aggregate::trends::{monthly_trends, yearly_trends, TrendRow};
use crate::error::TrendsError;
use crate::models::Post;
use crate::topics::keywords::keywords_by_topic;
use crate::topics::taxonomy::Taxonomy;

/// Knobs for the reports that feed the dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardSettings {
    pub top_posts: TopPostSettings,
    pub growth: GrowthThresholds,
    /// Keywords listed per topic (default 5)
    pub keywords_per_topic: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            top_posts: TopPostSettings::default(),
            growth: GrowthThresholds::default(),
            keywords_per_topic: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// RFC 3339, UTC
    pub generated_at: String,
    pub source_file: String,
}

/// Topic -> keywords, serialized as a JSON object in taxonomy order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopicKeywords(pub Vec<(String, Vec<String>)>);

impl TopicKeywords {
    pub fn get(&self, topic: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(name, _)| name == topic)
            .map(|(_, words)| words.as_slice())
    }
}

impl Serialize for TopicKeywords {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (topic, words) in &self.0 {
            map.serialize_entry(topic, words)?;
        }
        map.end()
    }
}

/// The complete dashboard dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardDocument {
    pub metadata: Metadata,
    pub insights: Insights,
    pub topic_trends: Vec<TrendRow>,
    pub topic_distribution: Vec<TopicShare>,
    pub top_posts: Vec<TopPost>,
    pub monthly_trends: Vec<TrendRow>,
    pub topic_keywords: TopicKeywords,
}

/// Run every report over a classified corpus and assemble the document.
pub fn build_dashboard(
    posts: &[Post],
    taxonomy: &Taxonomy,
    stop_words: &HashSet<String>,
    settings: &DashboardSettings,
    source_file: &str,
    generated_at: DateTime<Utc>,
) -> Result<DashboardDocument, TrendsError> {
    let document = DashboardDocument {
        metadata: Metadata {
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            source_file: source_file.to_string(),
        },
        insights: insights(posts, taxonomy, &settings.growth)?,
        topic_trends: yearly_trends(posts, taxonomy)?,
        topic_distribution: topic_distribution(posts, taxonomy)?,
        top_posts: top_posts(posts, taxonomy, &settings.top_posts)?,
        monthly_trends: monthly_trends(posts, taxonomy)?,
        topic_keywords: TopicKeywords(keywords_by_topic(
            posts,
            taxonomy,
            settings.keywords_per_topic,
            stop_words,
        )),
    };

    info!(
        years = document.topic_trends.len(),
        months = document.monthly_trends.len(),
        topics = document.topic_distribution.len(),
        "Assembled dashboard document"
    );
    Ok(document)
}

/// Render the document as pretty-printed JSON.
pub fn render(document: &DashboardDocument) -> Result<String> {
    serde_json::to_string_pretty(document).context("Failed to serialize dashboard document")
}

/// Render and write the document in one step.
pub fn write_dashboard(path: &Path, document: &DashboardDocument) -> Result<()> {
    let json = render(document)?;
    super::write_atomic(path, &json)?;
    info!(path = %path.display(), bytes = json.len(), "Wrote dashboard data");
    Ok(())
}

/// Render a topic -> keywords map (the classifier-tuning output) as JSON.
pub fn render_keywords(keywords: &TopicKeywords) -> Result<String> {
    serde_json::to_string_pretty(keywords).context("Failed to serialize topic keywords")
}
