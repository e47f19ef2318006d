// Keyword-frequency topic classifier.
//
// Title and body are joined and normalized, then every non-fallback topic is
// scored by counting non-overlapping substring occurrences of each of its
// keywords. The highest score wins. Ties go to the topic declared first in
// the taxonomy, and a best score of zero means the fallback topic.
//
// Substring matching is deliberate: "pg" also matches inside "upgrade" and
// "rent" inside "current". Keyword lists are tuned with that in mind.

use super::taxonomy::Taxonomy;
use super::traits::TopicClassifier;
use crate::text::normalize;

/// Per-topic scores for a post, in taxonomy order, fallback excluded.
pub fn topic_scores<'t>(title: &str, body: &str, taxonomy: &'t Taxonomy) -> Vec<(&'t str, usize)> {
    let text = normalize(&format!("{title} {body}"));
    score_normalized(&text, taxonomy)
}

fn score_normalized<'t>(text: &str, taxonomy: &'t Taxonomy) -> Vec<(&'t str, usize)> {
    taxonomy
        .scored_topics()
        .map(|topic| {
            let score = topic
                .keywords
                .iter()
                .map(|keyword| text.matches(keyword.as_str()).count())
                .sum();
            (topic.name.as_str(), score)
        })
        .collect()
}

/// Assign a topic to a post. Always returns a topic declared in `taxonomy`.
pub fn classify<'t>(title: &str, body: &str, taxonomy: &'t Taxonomy) -> &'t str {
    let scores = topic_scores(title, body, taxonomy);

    // Strict `>` keeps the earliest-declared topic on ties.
    let mut best: Option<(&str, usize)> = None;
    for (name, score) in scores {
        if score == 0 {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((name, score)),
        }
    }

    best.map(|(name, _)| name).unwrap_or_else(|| taxonomy.fallback())
}

/// The keyword classifier behind the `TopicClassifier` seam.
pub struct KeywordClassifier<'t> {
    taxonomy: &'t Taxonomy,
}

impl<'t> KeywordClassifier<'t> {
    pub fn new(taxonomy: &'t Taxonomy) -> Self {
        Self { taxonomy }
    }
}

impl TopicClassifier for KeywordClassifier<'_> {
    fn classify(&self, title: &str, body: &str) -> String {
        classify(title, body, self.taxonomy).to_string()
    }

    fn taxonomy(&self) -> &Taxonomy {
        self.taxonomy
    }
}
