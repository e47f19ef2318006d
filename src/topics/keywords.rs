// Per-topic keyword extraction by word frequency.
//
// All normalized title+body text of a topic's posts is tokenized on
// whitespace; stop words and tokens of three letters or fewer are dropped.
// The counter remembers first-seen order, and the ranking sort is stable, so
// equal counts always come out in the order the words first appeared.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use stop_words::{get, LANGUAGE};

use super::taxonomy::Taxonomy;
use crate::models::Post;
use crate::text::normalize;

/// Tokens at or below this length are never keywords.
const MIN_TOKEN_LEN_EXCLUSIVE: usize = 3;

/// The short stop list the dashboard has always used.
pub const BASIC_STOP_WORDS: &[&str] = &[
    "the", "is", "in", "and", "to", "a", "of", "for", "on", "with", "this", "that", "it", "from",
    "are", "was", "be", "have", "has", "been", "my", "i", "you", "me", "we", "they",
];

/// Where the stop-word set comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum StopWordSource {
    /// `BASIC_STOP_WORDS` only
    Basic,
    /// The stop-words crate's English list plus `BASIC_STOP_WORDS`
    English,
    /// Newline-separated file, one word per line
    File(std::path::PathBuf),
}

impl StopWordSource {
    /// Parse the config value: "basic", "english", or anything else as a path.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "" | "basic" => StopWordSource::Basic,
            "english" => StopWordSource::English,
            _ => StopWordSource::File(value.trim().into()),
        }
    }

    /// Materialize the stop-word set.
    pub fn load(&self) -> Result<HashSet<String>> {
        let mut words: HashSet<String> = BASIC_STOP_WORDS.iter().map(|w| w.to_string()).collect();
        match self {
            StopWordSource::Basic => {}
            StopWordSource::English => {
                let english: Vec<String> = get(LANGUAGE::English);
                words.extend(english.into_iter().map(|w| w.to_lowercase()));
            }
            StopWordSource::File(path) => {
                words = read_stop_word_file(path)?;
            }
        }
        Ok(words)
    }
}

fn read_stop_word_file(path: &Path) -> Result<HashSet<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read stop-word file {}", path.display()))?;
    Ok(contents
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect())
}

/// Insertion-ordered word counter.
#[derive(Debug, Default)]
struct OrderedCounter<'a> {
    index: HashMap<&'a str, usize>,
    counts: Vec<(&'a str, usize)>,
}

impl<'a> OrderedCounter<'a> {
    fn add(&mut self, word: &'a str) {
        match self.index.get(word) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.index.insert(word, self.counts.len());
                self.counts.push((word, 1));
            }
        }
    }

    /// The `n` most common words. Stable sort, so first-seen wins ties.
    fn most_common(mut self, n: usize) -> Vec<(&'a str, usize)> {
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts.truncate(n);
        self.counts
    }
}

/// Top `n` keywords for posts labeled `topic`, most frequent first.
pub fn extract_keywords(
    posts: &[Post],
    topic: &str,
    n: usize,
    stop_words: &HashSet<String>,
) -> Vec<String> {
    let texts: Vec<String> = posts
        .iter()
        .filter(|p| p.topic.as_deref() == Some(topic))
        .map(|p| normalize(&format!("{} {}", p.title, p.body)))
        .collect();

    let mut counter = OrderedCounter::default();
    for token in texts.iter().flat_map(|t| t.split_whitespace()) {
        if token.len() <= MIN_TOKEN_LEN_EXCLUSIVE || stop_words.contains(token) {
            continue;
        }
        counter.add(token);
    }

    counter
        .most_common(n)
        .into_iter()
        .map(|(word, _)| word.to_string())
        .collect()
}

/// Top keywords for every topic that has at least one post, in taxonomy order.
pub fn keywords_by_topic(
    posts: &[Post],
    taxonomy: &Taxonomy,
    n: usize,
    stop_words: &HashSet<String>,
) -> Vec<(String, Vec<String>)> {
    taxonomy
        .topics()
        .iter()
        .filter(|t| posts.iter().any(|p| p.topic.as_deref() == Some(t.name.as_str())))
        .map(|t| (t.name.clone(), extract_keywords(posts, &t.name, n, stop_words)))
        .collect()
}
