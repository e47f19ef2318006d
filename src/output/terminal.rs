// Colored terminal output for classification summaries and trends.
//
// This module handles all terminal-specific formatting: colors, bars,
// tables. main.rs delegates here after the reports are computed.

use colored::Colorize;

use crate::aggregate::distribution::TopicShare;
use crate::aggregate::growth::{Direction, TrendingTopic};
use crate::aggregate::summary::Insights;
use crate::ingest::IngestStats;
use crate::topics::suggest::KeywordSuggestion;
use crate::topics::taxonomy::Taxonomy;

/// Display the topic distribution as a bar chart.
pub fn display_distribution(shares: &[TopicShare]) {
    let total: u64 = shares.iter().map(|s| s.value).sum();
    println!(
        "\n{}",
        format!("=== Topic Distribution ({total} posts) ===").bold()
    );
    println!();

    let bar_width: usize = 20;

    for share in shares {
        let filled = ((share.percentage / 100.0) * bar_width as f64).round() as usize;
        let empty = bar_width.saturating_sub(filled);
        let bar = format!("[{}{}]", "=".repeat(filled), " ".repeat(empty));

        let colored_bar = if share.percentage >= 25.0 {
            bar.bright_green()
        } else if share.percentage >= 10.0 {
            bar.bright_yellow()
        } else {
            bar.bright_blue()
        };

        println!(
            "  {:<28} {} {:>5} posts ({:>5.1}%)",
            share.name.bold(),
            colored_bar,
            share.value,
            share.percentage
        );
    }
}

/// Display the busiest topics of each year.
pub fn display_top_topics_per_year(per_year: &[(i32, Vec<(String, u64)>)]) {
    println!("\n{}", "=== Top Topics Per Year ===".bold());
    for (year, topics) in per_year {
        println!("\n  {}", year.to_string().bold());
        for (topic, count) in topics {
            println!("    {:<24} {count} posts", topic);
        }
    }
}

/// Display trending topics with direction markers.
pub fn display_trending(trending: &[TrendingTopic], split_year: f64) {
    println!(
        "\n{}",
        format!("=== Topic Trends (through {split_year} vs after) ===").bold()
    );
    if trending.is_empty() {
        println!("  {}", "No topic changed significantly between the two halves.".dimmed());
        return;
    }
    for t in trending {
        let marker = match t.trend {
            Direction::Up => format!("UP   {:>+7.1}%", t.growth_rate).green(),
            Direction::Down => format!("DOWN {:>+7.1}%", t.growth_rate).red(),
        };
        println!(
            "  {:<28} {}  {}",
            t.topic,
            marker,
            format!("({} -> {} posts)", t.first_half, t.second_half).dimmed()
        );
    }
}

/// Display the per-topic keyword lists.
pub fn display_keywords(keywords: &[(String, Vec<String>)], shown: usize) {
    println!("\n{}", "=== Top Keywords Per Topic ===".bold());
    for (topic, words) in keywords {
        let preview: Vec<&str> = words.iter().take(shown).map(String::as_str).collect();
        println!("  {:<24} {}", topic.bold(), preview.join(", ").dimmed());
    }
}

/// Display the headline statistics of a dashboard run.
pub fn display_insights(insights: &Insights) {
    println!("\n{}", "=== Dashboard Summary ===".bold());
    println!("  Posts analyzed:   {}", insights.total_posts);
    println!(
        "  Date range:       {} to {}",
        insights.date_range.start, insights.date_range.end
    );
    println!("  Years of data:    {}", insights.years_analyzed);
    println!("  Topics tracked:   {}", insights.topics_tracked);
    println!(
        "  Top topic:        {} ({} posts, {:.1}%)",
        insights.top_topic.name.bold(),
        insights.top_topic.count,
        insights.top_topic.percentage
    );
    println!(
        "  Avg score:        {:.1}  |  Avg comments: {:.1}",
        insights.average_score, insights.average_comments
    );
}

/// Display how ingestion went.
pub fn display_ingest_stats(stats: &IngestStats, unique: usize) {
    println!(
        "Loaded {} records ({} unique)",
        stats.records,
        unique.to_string().bold()
    );
    if stats.duplicates_dropped > 0 {
        println!(
            "  {} {} duplicate ids dropped",
            "~".yellow(),
            stats.duplicates_dropped
        );
    }
    if stats.repaired > 0 {
        println!(
            "  {} {} records had missing fields filled with defaults",
            "~".yellow(),
            stats.repaired
        );
    }
}

/// Display keyword suggestions for the fallback topic.
pub fn display_suggestions(suggestions: &[KeywordSuggestion], fallback: &str) {
    println!(
        "\n{}",
        format!("=== Keyword Candidates from '{fallback}' ===").bold()
    );
    println!(
        "  {:>4}  {:<24} {:>8}  {:>6}",
        "Rank".dimmed(),
        "Keyword".dimmed(),
        "TF-IDF".dimmed(),
        "Posts".dimmed()
    );
    println!("  {}", "-".repeat(48).dimmed());
    for (i, s) in suggestions.iter().enumerate() {
        println!(
            "  {:>4}. {:<24} {:>8.3}  {:>6}",
            i + 1,
            s.keyword,
            s.score,
            s.post_count
        );
    }
}

/// Display the configured taxonomy.
pub fn display_taxonomy(taxonomy: &Taxonomy) {
    println!(
        "\n{}",
        format!("=== Taxonomy ({} topics) ===", taxonomy.len()).bold()
    );
    for topic in taxonomy.topics() {
        if topic.name == taxonomy.fallback() {
            println!(
                "  {:<24} {}",
                topic.name.bold(),
                "(fallback)".dimmed()
            );
            continue;
        }
        println!(
            "  {:<24} {} {}",
            topic.name.bold(),
            taxonomy.color_for(&topic.name).dimmed(),
            topic.keywords.join(", ")
        );
    }
}
