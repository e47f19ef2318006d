// TF-IDF keyword suggestions for taxonomy tuning.
//
// Runs TF-IDF over the posts that fell through to the fallback topic, treating
// each post as its own document. Terms that are frequent in a few posts but not
// spread across all of them score highest. Those are the best candidates to
// add to an existing topic's keyword list. Terms the taxonomy already knows
// are filtered out.

use std::collections::HashSet;

use anyhow::Result;
use keyword_extraction::tf_idf::{TfIdf, TfIdfParams};
use serde::Serialize;
use tracing::info;

use super::taxonomy::Taxonomy;
use crate::models::Post;
use crate::text::normalize;

/// A candidate keyword for the taxonomy.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordSuggestion {
    pub keyword: String,
    pub score: f32,
    /// How many fallback posts contain the keyword
    pub post_count: usize,
}

/// Suggest up to `count` new keywords from the fallback topic's posts.
pub fn suggest_keywords(
    posts: &[Post],
    taxonomy: &Taxonomy,
    stop_words: &HashSet<String>,
    count: usize,
) -> Result<Vec<KeywordSuggestion>> {
    let fallback = taxonomy.fallback();
    let documents: Vec<String> = posts
        .iter()
        .filter(|p| p.topic.as_deref() == Some(fallback))
        .map(|p| normalize(&format!("{} {}", p.title, p.body)))
        .filter(|text| !text.is_empty())
        .collect();

    if documents.is_empty() {
        anyhow::bail!("No posts in the fallback topic '{fallback}': nothing to suggest from");
    }

    let stop_list: Vec<String> = stop_words.iter().cloned().collect();
    let params = TfIdfParams::UnprocessedDocuments(&documents, &stop_list, None);
    let tfidf = TfIdf::new(params);

    let known = taxonomy.all_keywords();

    // Rank the whole score map ourselves: highest score first, ties broken
    // alphabetically, so equal scores never reorder between runs.
    let mut ranked: Vec<(String, f32)> = tfidf
        .get_word_scores_map()
        .iter()
        .map(|(word, score)| (word.clone(), *score))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    let suggestions: Vec<KeywordSuggestion> = ranked
        .into_iter()
        .filter(|(word, _)| word.len() > 3 && !known.contains(word.as_str()))
        .take(count)
        .map(|(keyword, score)| {
            let post_count = documents
                .iter()
                .filter(|doc| doc.split_whitespace().any(|w| w == keyword))
                .count();
            KeywordSuggestion {
                keyword,
                score,
                post_count,
            }
        })
        .collect();

    info!(
        fallback_posts = documents.len(),
        suggestions = suggestions.len(),
        "Computed TF-IDF keyword suggestions"
    );

    Ok(suggestions)
}
