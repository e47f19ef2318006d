// Corpus ingestion: reads scraped post records and produces unique Posts.
//
// Accepts JSON Lines (one object per line) or a single JSON array. Records
// are repaired rather than rejected, and a repeated id keeps only its first
// occurrence.

pub mod records;

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::TrendsError;
use crate::models::Post;
use records::RawRecord;

/// What happened while reading a corpus.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestStats {
    pub records: usize,
    pub duplicates_dropped: usize,
    pub repaired: usize,
}

/// Read and repair every record in a file.
pub fn read_posts(path: &Path) -> Result<(Vec<Post>, IngestStats)> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus {}", path.display()))?;
    let (posts, stats) = parse_posts(&contents)
        .with_context(|| format!("Failed to parse corpus {}", path.display()))?;

    info!(
        path = %path.display(),
        records = stats.records,
        unique = posts.len(),
        duplicates = stats.duplicates_dropped,
        repaired = stats.repaired,
        "Loaded corpus"
    );
    Ok((posts, stats))
}

/// Parse a corpus held in memory. See `read_posts`.
///
/// Error line numbers are 1-based: file lines for JSON Lines, element
/// positions for a JSON array.
pub fn parse_posts(contents: &str) -> Result<(Vec<Post>, IngestStats), TrendsError> {
    let values = if contents.trim_start().starts_with('[') {
        parse_array(contents)?
    } else {
        parse_lines(contents)?
    };

    let mut stats = IngestStats::default();
    let mut seen = HashSet::new();
    let mut posts = Vec::with_capacity(values.len());

    for (line, value) in values {
        stats.records += 1;
        if !value.is_object() {
            return Err(TrendsError::MalformedInput {
                line,
                reason: "record is not a JSON object".to_string(),
            });
        }
        let raw: RawRecord =
            serde_json::from_value(value).map_err(|e| TrendsError::MalformedInput {
                line,
                reason: e.to_string(),
            })?;
        let (post, repairs) = raw.into_post(line)?;
        if repairs.any() {
            stats.repaired += 1;
        }

        if !seen.insert(post.id.clone()) {
            debug!(id = %post.id, line, "Dropping duplicate post id");
            stats.duplicates_dropped += 1;
            continue;
        }
        posts.push(post);
    }

    Ok((posts, stats))
}

fn parse_array(contents: &str) -> Result<Vec<(usize, Value)>, TrendsError> {
    let values: Vec<Value> =
        serde_json::from_str(contents).map_err(|e| TrendsError::MalformedInput {
            line: e.line(),
            reason: e.to_string(),
        })?;
    Ok(values
        .into_iter()
        .enumerate()
        .map(|(i, v)| (i + 1, v))
        .collect())
}

fn parse_lines(contents: &str) -> Result<Vec<(usize, Value)>, TrendsError> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str::<Value>(line)
                .map(|v| (i + 1, v))
                .map_err(|e| TrendsError::MalformedInput {
                    line: i + 1,
                    reason: e.to_string(),
                })
        })
        .collect()
}

/// Write posts as JSON Lines, one post per line.
pub fn write_posts(path: &Path, posts: &[Post]) -> Result<()> {
    let mut out = String::new();
    for post in posts {
        out.push_str(&serde_json::to_string(post)?);
        out.push('\n');
    }
    crate::output::write_atomic(path, &out)?;
    info!(path = %path.display(), posts = posts.len(), "Wrote labeled corpus");
    Ok(())
}
