// Topic taxonomy: the ordered keyword configuration the classifier runs on.
//
// Declaration order matters twice: it breaks classifier score ties (first
// declared wins) and it fixes the column order of every per-bucket trend
// record. So the taxonomy is a Vec of topics, never a map.
//
// Exactly one topic is the fallback. It has no keywords and catches every
// post that matches nothing else.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::TrendsError;
use crate::text::normalize;

/// Keys trend records already use for their bucket. A topic with one of these
/// names would collide with it as a JSON column.
pub const RESERVED_TOPIC_NAMES: [&str; 2] = ["year", "month"];

/// Color used for topics the taxonomy doesn't assign one to.
pub const DEFAULT_TOPIC_COLOR: &str = "#6b7280";

/// The taxonomy that ships with the binary, used when no file is configured.
const BUILTIN_TAXONOMY: &str = include_str!("../../config/taxonomy.json");

/// A single topic definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicDef {
    /// Stable identifier written onto posts (e.g. "Housing_Rent")
    pub name: String,
    /// Lowercase keywords, matched as substrings of normalized text
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Display color for the dashboard (hex string)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Display name. Defaults to the name with '_' rendered as " & ".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl TopicDef {
    pub fn new(name: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            color: None,
            label: None,
        }
    }
}

/// On-disk shape of a taxonomy file.
#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    fallback: String,
    topics: Vec<TopicDef>,
}

/// A validated, ordered taxonomy.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    topics: Vec<TopicDef>,
    fallback: usize,
}

impl Taxonomy {
    /// Build a taxonomy from topics in declaration order.
    ///
    /// Rejects an empty taxonomy, a fallback that isn't declared, a fallback
    /// with keywords, duplicate or reserved topic names, and keywords that
    /// normalize to nothing. Keywords are normalized and deduplicated within each topic.
    pub fn new(topics: Vec<TopicDef>, fallback: &str) -> Result<Self, TrendsError> {
        if topics.is_empty() {
            return Err(TrendsError::config("taxonomy declares no topics"));
        }

        let mut seen_names = HashSet::new();
        let mut cleaned = Vec::with_capacity(topics.len());

        for topic in topics {
            let name = topic.name.trim().to_string();
            if name.is_empty() {
                return Err(TrendsError::config("taxonomy contains a topic with an empty name"));
            }
            if RESERVED_TOPIC_NAMES.contains(&name.as_str()) {
                return Err(TrendsError::config(format!(
                    "topic name '{name}' is reserved for trend buckets"
                )));
            }
            if !seen_names.insert(name.clone()) {
                return Err(TrendsError::config(format!("topic '{name}' is declared twice")));
            }

            let mut keywords = Vec::with_capacity(topic.keywords.len());
            for raw in &topic.keywords {
                let keyword = normalize(raw);
                if keyword.is_empty() {
                    return Err(TrendsError::config(format!(
                        "topic '{name}' has keyword {raw:?} which contains no letters"
                    )));
                }
                if keyword != raw.as_str() {
                    warn!(topic = %name, raw = %raw, normalized = %keyword, "Keyword rewritten by normalization");
                }
                if keywords.contains(&keyword) {
                    debug!(topic = %name, keyword = %keyword, "Dropping duplicate keyword");
                    continue;
                }
                keywords.push(keyword);
            }

            cleaned.push(TopicDef {
                name,
                keywords,
                ..topic
            });
        }

        let fallback_idx = cleaned
            .iter()
            .position(|t| t.name == fallback.trim())
            .ok_or_else(|| {
                TrendsError::config(format!(
                    "fallback topic '{fallback}' is not declared in the taxonomy"
                ))
            })?;

        if !cleaned[fallback_idx].keywords.is_empty() {
            return Err(TrendsError::config(format!(
                "fallback topic '{fallback}' must have an empty keyword set"
            )));
        }

        if cleaned.len() == 1 {
            warn!("Taxonomy only declares the fallback topic; every post will land there");
        }

        Ok(Self {
            topics: cleaned,
            fallback: fallback_idx,
        })
    }

    /// Parse a taxonomy from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, TrendsError> {
        let file: TaxonomyFile = serde_json::from_str(json)
            .map_err(|e| TrendsError::config(format!("invalid taxonomy JSON: {e}")))?;
        Self::new(file.topics, &file.fallback)
    }

    /// Load a taxonomy file from disk.
    pub fn load(path: &Path) -> Result<Self, TrendsError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            TrendsError::config(format!("cannot read taxonomy {}: {e}", path.display()))
        })?;
        let taxonomy = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            topics = taxonomy.len(),
            fallback = taxonomy.fallback(),
            "Loaded taxonomy"
        );
        Ok(taxonomy)
    }

    /// The taxonomy bundled with the binary.
    pub fn builtin() -> Result<Self, TrendsError> {
        Self::from_json(BUILTIN_TAXONOMY)
    }

    /// All topics, in declaration order, fallback included.
    pub fn topics(&self) -> &[TopicDef] {
        &self.topics
    }

    /// Topics that take part in scoring (everything except the fallback).
    pub fn scored_topics(&self) -> impl Iterator<Item = &TopicDef> {
        let fallback = self.fallback;
        self.topics
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != fallback)
            .map(|(_, t)| t)
    }

    pub fn fallback(&self) -> &str {
        &self.topics[self.fallback].name
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TopicDef> {
        self.topics.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Declaration index of a topic, used to order ties deterministically.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.topics.iter().position(|t| t.name == name)
    }

    /// Dashboard color for a topic, falling back to the default gray.
    pub fn color_for(&self, name: &str) -> &str {
        self.get(name)
            .and_then(|t| t.color.as_deref())
            .unwrap_or(DEFAULT_TOPIC_COLOR)
    }

    /// Human-readable topic name ("Housing_Rent" -> "Housing & Rent").
    pub fn label_for(&self, name: &str) -> String {
        match self.get(name).and_then(|t| t.label.as_deref()) {
            Some(label) => label.to_string(),
            None => name.replace('_', " & "),
        }
    }

    /// Every keyword of every topic, used to filter out already-known terms.
    pub fn all_keywords(&self) -> HashSet<&str> {
        self.topics
            .iter()
            .flat_map(|t| t.keywords.iter().map(String::as_str))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_taxonomy_is_valid() {
        let taxonomy = Taxonomy::builtin().unwrap();
        assert_eq!(taxonomy.fallback(), "General_Discussion");
        assert_eq!(taxonomy.len(), 15);
        assert_eq!(taxonomy.topics()[0].name, "Traffic");
        assert_eq!(taxonomy.scored_topics().count(), 14);
        assert_eq!(taxonomy.color_for("Traffic"), "#ef4444");
    }

    #[test]
    fn test_rejects_empty_taxonomy() {
        let err = Taxonomy::new(vec![], "Other").unwrap_err();
        assert!(matches!(err, TrendsError::Configuration(_)));
    }

    #[test]
    fn test_rejects_missing_fallback() {
        let topics = vec![TopicDef::new("Traffic", &["traffic"])];
        let err = Taxonomy::new(topics, "Other").unwrap_err();
        assert!(err.to_string().contains("not declared"));
    }

    #[test]
    fn test_rejects_fallback_with_keywords() {
        let topics = vec![
            TopicDef::new("Traffic", &["traffic"]),
            TopicDef::new("Other", &["misc"]),
        ];
        assert!(Taxonomy::new(topics, "Other").is_err());
    }

    #[test]
    fn test_rejects_duplicate_names_and_blank_keywords() {
        let dupes = vec![
            TopicDef::new("Traffic", &["traffic"]),
            TopicDef::new("Traffic", &["jam"]),
            TopicDef::new("Other", &[]),
        ];
        assert!(Taxonomy::new(dupes, "Other").is_err());

        let blank = vec![TopicDef::new("Traffic", &["123"]), TopicDef::new("Other", &[])];
        assert!(Taxonomy::new(blank, "Other").is_err());
    }

    #[test]
    fn test_rejects_bucket_key_names() {
        for reserved in ["year", "month", " year "] {
            let topics = vec![
                TopicDef::new(reserved, &["calendar"]),
                TopicDef::new("Other", &[]),
            ];
            let err = Taxonomy::new(topics, "Other").unwrap_err();
            assert!(matches!(err, TrendsError::Configuration(_)), "{reserved:?}");
        }

        let json = r#"{"fallback": "month", "topics": [{"name": "month"}]}"#;
        assert!(matches!(
            Taxonomy::from_json(json),
            Err(TrendsError::Configuration(_))
        ));

        // Only the exact bucket keys collide
        let topics = vec![TopicDef::new("Year", &["calendar"]), TopicDef::new("Other", &[])];
        assert!(Taxonomy::new(topics, "Other").is_ok());
    }

    #[test]
    fn test_keywords_normalized_and_deduped() {
        let topics = vec![
            TopicDef::new("Traffic", &["Traffic", "traffic", "Wi-Fi"]),
            TopicDef::new("Other", &[]),
        ];
        let taxonomy = Taxonomy::new(topics, "Other").unwrap();
        assert_eq!(taxonomy.topics()[0].keywords, vec!["traffic", "wi fi"]);
    }

    #[test]
    fn test_labels_and_default_color() {
        let mut pets = TopicDef::new("Pets_Animals", &["dog"]);
        pets.label = Some("Pets".to_string());
        let topics = vec![
            TopicDef::new("Housing_Rent", &["rent"]),
            pets,
            TopicDef::new("Other", &[]),
        ];
        let taxonomy = Taxonomy::new(topics, "Other").unwrap();
        assert_eq!(taxonomy.label_for("Housing_Rent"), "Housing & Rent");
        assert_eq!(taxonomy.label_for("Pets_Animals"), "Pets");
        assert_eq!(taxonomy.color_for("Housing_Rent"), DEFAULT_TOPIC_COLOR);
    }
}
