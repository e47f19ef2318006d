use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use trendscope::aggregate::distribution::topic_distribution;
use trendscope::aggregate::growth::{median_year, trending_topics};
use trendscope::aggregate::trends::top_topics_per_year;
use trendscope::config::Config;
use trendscope::ingest::{read_posts, write_posts};
use trendscope::models::Post;
use trendscope::output::dashboard::{build_dashboard, render_keywords, write_dashboard, TopicKeywords};
use trendscope::output::terminal;
use trendscope::output::write_atomic;
use trendscope::pipeline::{classify_posts, ClassifyOptions};
use trendscope::topics::classifier::KeywordClassifier;
use trendscope::topics::keywords::keywords_by_topic;
use trendscope::topics::suggest::suggest_keywords;
use trendscope::topics::taxonomy::Taxonomy;

/// Trendscope: topic classification and trend analytics for forum corpora.
///
/// Labels every post with one topic from a keyword taxonomy, then turns the
/// labeled corpus into the JSON dataset behind the trends dashboard.
#[derive(Parser)]
#[command(name = "trendscope", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a corpus and write the labeled posts plus per-topic keywords
    Classify {
        /// Corpus file (JSON Lines or a JSON array)
        input: PathBuf,

        /// Labeled corpus output (default: <input>.labeled.jsonl)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Topic keyword file for tuning the taxonomy (default: topic_keywords.json next to the input)
        #[arg(long)]
        keywords_output: Option<PathBuf>,

        /// Ignore topics already present in the input
        #[arg(long)]
        reclassify: bool,
    },

    /// Build the dashboard dataset from a corpus
    Dashboard {
        /// Corpus file, labeled or not
        input: PathBuf,

        /// Where to write the dashboard JSON
        #[arg(long, default_value = "dashboard_data.json")]
        output: PathBuf,

        /// Number of top posts to include (overrides TRENDSCOPE_TOP_POSTS)
        #[arg(long)]
        top_posts: Option<usize>,

        /// Ignore topics already present in the input
        #[arg(long)]
        reclassify: bool,
    },

    /// Propose new taxonomy keywords from posts that fell through to the fallback topic
    Suggest {
        /// Corpus file
        input: PathBuf,

        /// Number of candidates to list (default: 20)
        #[arg(long, default_value = "20")]
        count: usize,
    },

    /// Show the configured taxonomy
    Taxonomy,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("trendscope=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let taxonomy = config.load_taxonomy()?;

    match cli.command {
        Commands::Classify {
            input,
            output,
            keywords_output,
            reclassify,
        } => {
            let stop_words = config.stop_words.load()?;
            let posts = load_and_classify(&input, &taxonomy, reclassify)?;

            let output = output.unwrap_or_else(|| input.with_extension("labeled.jsonl"));
            write_posts(&output, &posts)?;

            let keywords = TopicKeywords(keywords_by_topic(
                &posts,
                &taxonomy,
                config.tuning_keywords,
                &stop_words,
            ));
            let keywords_output =
                keywords_output.unwrap_or_else(|| input.with_file_name("topic_keywords.json"));
            write_atomic(&keywords_output, &render_keywords(&keywords)?)?;
            info!(path = %keywords_output.display(), "Wrote topic keywords");

            terminal::display_distribution(&topic_distribution(&posts, &taxonomy)?);
            terminal::display_top_topics_per_year(&top_topics_per_year(&posts, &taxonomy, 3)?);
            terminal::display_trending(
                &trending_topics(&posts, &taxonomy, &config.dashboard.growth)?,
                median_year(&posts)?,
            );
            terminal::display_keywords(&keywords.0, 5);

            println!("\n{}", "Classification complete.".bold());
            println!("  Labeled corpus: {}", output.display());
            println!("  Topic keywords: {}", keywords_output.display());
        }

        Commands::Dashboard {
            input,
            output,
            top_posts,
            reclassify,
        } => {
            let stop_words = config.stop_words.load()?;
            let posts = load_and_classify(&input, &taxonomy, reclassify)?;

            let mut settings = config.dashboard;
            if let Some(limit) = top_posts {
                settings.top_posts.limit = limit;
            }

            let document = build_dashboard(
                &posts,
                &taxonomy,
                &stop_words,
                &settings,
                &source_name(&input),
                Utc::now(),
            )?;
            write_dashboard(&output, &document)?;

            terminal::display_insights(&document.insights);
            terminal::display_distribution(&document.topic_distribution);
            terminal::display_trending(&document.insights.trending_topics, median_year(&posts)?);

            println!("\n{}", "Dashboard data written.".bold());
            println!("  Output: {}", output.display());
        }

        Commands::Suggest { input, count } => {
            let stop_words: HashSet<String> = config.stop_words.load()?;
            let posts = load_and_classify(&input, &taxonomy, false)?;

            let suggestions = suggest_keywords(&posts, &taxonomy, &stop_words, count)?;
            if suggestions.is_empty() {
                println!("No keyword candidates found.");
                return Ok(());
            }
            terminal::display_suggestions(&suggestions, taxonomy.fallback());
            println!(
                "\n{}",
                "Add the relevant ones to a topic's keywords and rerun classify.".dimmed()
            );
        }

        Commands::Taxonomy => {
            terminal::display_taxonomy(&taxonomy);
            match &config.taxonomy_path {
                Some(path) => println!("\n  Source: {}", path.display()),
                None => println!(
                    "\n  Source: {} {}",
                    "built-in".bold(),
                    "(set TRENDSCOPE_TAXONOMY to use your own)".dimmed()
                ),
            }
        }
    }

    Ok(())
}

/// Read a corpus and run it through the keyword classifier.
fn load_and_classify(input: &Path, taxonomy: &Taxonomy, reclassify: bool) -> Result<Vec<Post>> {
    let (posts, stats) = read_posts(input)?;
    terminal::display_ingest_stats(&stats, posts.len());

    let classifier = KeywordClassifier::new(taxonomy);
    let options = ClassifyOptions {
        reclassify,
        progress: true,
    };
    let (posts, _) = classify_posts(posts, &classifier, options)
        .with_context(|| format!("Failed to classify {}", input.display()))?;
    Ok(posts)
}

/// File name recorded in the dashboard metadata.
fn source_name(input: &Path) -> String {
    input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string())
}
