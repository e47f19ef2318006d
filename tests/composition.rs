// Composition tests: verifying that the pipeline stages chain together.
//
// These tests exercise the data flow between modules:
//   Ingest -> Classify -> Aggregate/Keywords -> Dashboard JSON
// without touching the network. Only the labeled-corpus round trip writes
// to the temp directory.

use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use serde_json::Value;

use trendscope::ingest::{parse_posts, read_posts, write_posts};
use trendscope::output::dashboard::{build_dashboard, render, DashboardSettings};
use trendscope::pipeline::{classify_posts, ClassifyOptions};
use trendscope::topics::classifier::KeywordClassifier;
use trendscope::topics::keywords::{keywords_by_topic, StopWordSource};
use trendscope::topics::suggest::suggest_keywords;
use trendscope::topics::taxonomy::Taxonomy;

const CORPUS: &str = r#"
{"id": "p1", "title": "Traffic on ORR is unbearable", "selftext": "Two hours from Marathahalli, the signal timing is broken", "author": "commuter", "score": 120, "num_comments": 45, "created_utc": 1546300800}
{"id": "p2", "title": "Best dosa near Malleshwaram?", "selftext": "Looking for crispy dosa and filter coffee", "author": "foodie", "score": 80, "num_comments": 30, "created_utc": 1561939200}
{"id": "p3", "title": "Landlord refusing to return deposit", "selftext": "Rent agreement says two months notice", "author": "tenant", "score": 64, "num_comments": 52, "created_utc": 1577836800}
{"id": "p4", "title": "Random thoughts on a Sunday", "selftext": "", "author": "[deleted]", "score": 3, "num_comments": 1, "created_utc": 1593561600}
{"id": "p5", "title": "Metro purple line extension opens", "selftext": "Commute to Whitefield finally sorted", "author": "metrofan", "score": 300, "num_comments": 88, "created_utc": 1625097600}
{"id": "p6", "title": "Heavy rain floods Silk Board junction", "selftext": "Monsoon traffic chaos again", "author": "wet", "score": 150, "num_comments": 60, "created_utc": "2022-07-01 10:00:00"}
{"id": "p6", "title": "duplicate id, dropped", "created_utc": 1656669600}
{"id": "p7", "title": "Anyone up for a weekend meetup?", "selftext": "Looking to make friends", "score": 12, "created_utc": "2023-01-15"}
{"id": "p8", "title": "Random musings on cricket", "selftext": "Chinnaswamy crowd was electric", "score": 40, "num_comments": 9, "created_utc": 1688169600}
"#;

fn classified() -> (Taxonomy, Vec<trendscope::models::Post>) {
    let taxonomy = Taxonomy::builtin().unwrap();
    let (posts, stats) = parse_posts(CORPUS).unwrap();
    assert_eq!(stats.records, 9);
    assert_eq!(stats.duplicates_dropped, 1);

    let classifier = KeywordClassifier::new(&taxonomy);
    let (posts, _) = classify_posts(posts, &classifier, ClassifyOptions::default()).unwrap();
    (taxonomy, posts)
}

fn stop_words() -> HashSet<String> {
    StopWordSource::Basic.load().unwrap()
}

// ============================================================
// Ingest -> Classify
// ============================================================

#[test]
fn ingested_posts_are_unique_and_all_labeled() {
    let (taxonomy, posts) = classified();
    assert_eq!(posts.len(), 8);

    let ids: HashSet<&str> = posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids.len(), posts.len());
    assert!(posts
        .iter()
        .all(|p| p.topic.as_deref().is_some_and(|t| taxonomy.contains(t))));

    let topic_of = |id: &str| {
        posts
            .iter()
            .find(|p| p.id == id)
            .and_then(|p| p.topic.as_deref())
            .unwrap()
            .to_string()
    };
    assert_eq!(topic_of("p1"), "Traffic");
    assert_eq!(topic_of("p2"), "Food");
    assert_eq!(topic_of("p3"), "Housing_Rent");
    assert_eq!(topic_of("p4"), taxonomy.fallback());
    // Repaired defaults survive into the labeled post
    let p7 = posts.iter().find(|p| p.id == "p7").unwrap();
    assert_eq!(p7.author, "[deleted]");
    assert_eq!(p7.num_comments, 0);
}

#[test]
fn labeled_corpus_round_trips_through_jsonl() {
    let (taxonomy, posts) = classified();
    let dir = std::env::temp_dir().join(format!("trendscope-compose-{}", std::process::id()));
    let path = dir.join("labeled.jsonl");

    write_posts(&path, &posts).unwrap();
    let (reread, stats) = read_posts(&path).unwrap();
    assert_eq!(stats.duplicates_dropped, 0);
    assert_eq!(reread, posts);

    // Labels from the file are kept as-is on a second pass
    let classifier = KeywordClassifier::new(&taxonomy);
    let (again, pass) = classify_posts(reread, &classifier, ClassifyOptions::default()).unwrap();
    assert_eq!(pass.kept_labels, posts.len());
    assert_eq!(again, posts);

    let _ = std::fs::remove_dir_all(&dir);
}

// ============================================================
// Classify -> Dashboard
// ============================================================

#[test]
fn dashboard_has_fixed_top_level_key_order() {
    let (taxonomy, posts) = classified();
    let generated = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let doc = build_dashboard(
        &posts,
        &taxonomy,
        &stop_words(),
        &DashboardSettings::default(),
        "bangalore_posts.jsonl",
        generated,
    )
    .unwrap();

    let value: Value = serde_json::from_str(&render(&doc).unwrap()).unwrap();
    let keys: Vec<&str> = value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        keys,
        vec![
            "metadata",
            "insights",
            "topic_trends",
            "topic_distribution",
            "top_posts",
            "monthly_trends",
            "topic_keywords",
        ]
    );
    assert_eq!(value["metadata"]["generated_at"], "2024-05-01T12:00:00Z");
    assert_eq!(value["metadata"]["source_file"], "bangalore_posts.jsonl");
    assert_eq!(value["insights"]["total_posts"], 8);

    // Trend rows lead with their bucket key, then taxonomy columns
    let first_row: Vec<&String> = value["topic_trends"][0].as_object().unwrap().keys().collect();
    assert_eq!(first_row[0], "year");
    assert_eq!(first_row[1], "Traffic");
    assert_eq!(first_row.len(), taxonomy.len() + 1);
    assert_eq!(value["monthly_trends"][0]["month"], "2019-01");
}

#[test]
fn dashboard_reports_agree_with_each_other() {
    let (taxonomy, posts) = classified();
    let doc = build_dashboard(
        &posts,
        &taxonomy,
        &stop_words(),
        &DashboardSettings::default(),
        "corpus.jsonl",
        Utc::now(),
    )
    .unwrap();

    let n = posts.len() as u64;
    assert_eq!(doc.insights.total_posts, n);
    assert_eq!(doc.topic_distribution.iter().map(|s| s.value).sum::<u64>(), n);
    assert_eq!(doc.topic_trends.iter().map(|r| r.total()).sum::<u64>(), n);
    assert_eq!(doc.monthly_trends.iter().map(|r| r.total()).sum::<u64>(), n);
    assert_eq!(doc.insights.posts_per_year.values().sum::<u64>(), n);
    assert!(doc.top_posts.len() <= 15);
    assert_eq!(doc.top_posts[0].score, 300);

    // Keywords only for topics that have posts, and never more than asked for
    for (topic, words) in &doc.topic_keywords.0 {
        assert!(posts.iter().any(|p| p.topic.as_deref() == Some(topic.as_str())));
        assert!(words.len() <= 5);
        assert!(words.iter().all(|w| w.len() > 3));
    }
}

#[test]
fn dashboard_json_round_trip_is_byte_identical() {
    let (taxonomy, posts) = classified();
    let generated = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let doc = build_dashboard(
        &posts,
        &taxonomy,
        &stop_words(),
        &DashboardSettings::default(),
        "corpus.jsonl",
        generated,
    )
    .unwrap();

    let first = render(&doc).unwrap();
    let parsed: Value = serde_json::from_str(&first).unwrap();
    let second = serde_json::to_string_pretty(&parsed).unwrap();
    assert_eq!(first, second);

    // Same input, same configuration, same bytes
    let rebuilt = build_dashboard(
        &posts,
        &taxonomy,
        &stop_words(),
        &DashboardSettings::default(),
        "corpus.jsonl",
        generated,
    )
    .unwrap();
    assert_eq!(render(&rebuilt).unwrap(), first);
}

// ============================================================
// Classify -> Keywords / Suggestions
// ============================================================

#[test]
fn tuning_keywords_follow_taxonomy_order() {
    let (taxonomy, posts) = classified();
    let keywords = keywords_by_topic(&posts, &taxonomy, 10, &stop_words());

    let order: Vec<usize> = keywords
        .iter()
        .map(|(topic, _)| taxonomy.position(topic).unwrap())
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]));

    let traffic = &keywords.iter().find(|(t, _)| t == "Traffic").unwrap().1;
    assert_eq!(traffic[0], "traffic");
}

#[test]
fn suggestions_come_from_fallback_posts_only() {
    let (taxonomy, posts) = classified();
    let suggestions = suggest_keywords(&posts, &taxonomy, &stop_words(), 10).unwrap();
    assert!(!suggestions.is_empty());

    let known = taxonomy.all_keywords();
    for s in &suggestions {
        assert!(!known.contains(s.keyword.as_str()));
        assert!(s.keyword.len() > 3);
        assert!(s.post_count >= 1);
    }
}
