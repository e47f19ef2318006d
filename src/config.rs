use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::debug;

use crate::aggregate::growth::GrowthThresholds;
use crate::aggregate::top_posts::TopPostSettings;
use crate::error::TrendsError;
use crate::output::dashboard::DashboardSettings;
use crate::topics::keywords::StopWordSource;
use crate::topics::taxonomy::Taxonomy;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// setting has a default, so an empty environment is a valid configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Taxonomy JSON file (TRENDSCOPE_TAXONOMY). None means the built-in taxonomy.
    pub taxonomy_path: Option<PathBuf>,
    /// Stop words for keyword extraction (TRENDSCOPE_STOP_WORDS)
    pub stop_words: StopWordSource,
    /// Report knobs for the dashboard
    pub dashboard: DashboardSettings,
    /// Keywords per topic in the classifier-tuning file (TRENDSCOPE_TUNING_KEYWORDS)
    pub tuning_keywords: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            taxonomy_path: None,
            stop_words: StopWordSource::Basic,
            dashboard: DashboardSettings::default(),
            tuning_keywords: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A variable that is set but doesn't parse is a configuration error,
    /// never silently replaced by its default.
    pub fn load() -> Result<Self, TrendsError> {
        let defaults = Self::default();
        let top = defaults.dashboard.top_posts;
        let growth = defaults.dashboard.growth;

        let config = Self {
            taxonomy_path: env::var("TRENDSCOPE_TAXONOMY")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            stop_words: env::var("TRENDSCOPE_STOP_WORDS")
                .map(|v| StopWordSource::parse(&v))
                .unwrap_or(StopWordSource::Basic),
            dashboard: DashboardSettings {
                top_posts: TopPostSettings {
                    limit: env_parse("TRENDSCOPE_TOP_POSTS", top.limit)?,
                    top_topics: env_parse("TRENDSCOPE_TOP_TOPICS", top.top_topics)?,
                    per_topic: env_parse("TRENDSCOPE_POSTS_PER_TOPIC", top.per_topic)?,
                },
                growth: GrowthThresholds {
                    min_baseline_posts: env_parse(
                        "TRENDSCOPE_MIN_BASELINE_POSTS",
                        growth.min_baseline_posts,
                    )?,
                    min_abs_growth_pct: env_parse(
                        "TRENDSCOPE_MIN_GROWTH_PCT",
                        growth.min_abs_growth_pct,
                    )?,
                    max_topics: env_parse("TRENDSCOPE_MAX_TRENDING", growth.max_topics)?,
                },
                keywords_per_topic: env_parse(
                    "TRENDSCOPE_DASHBOARD_KEYWORDS",
                    defaults.dashboard.keywords_per_topic,
                )?,
            },
            tuning_keywords: env_parse("TRENDSCOPE_TUNING_KEYWORDS", defaults.tuning_keywords)?,
        };

        config.validate()?;
        debug!(?config, "Loaded configuration");
        Ok(config)
    }

    /// Reject settings no report can run with.
    pub fn validate(&self) -> Result<(), TrendsError> {
        let growth = &self.dashboard.growth;
        if !growth.min_abs_growth_pct.is_finite() || growth.min_abs_growth_pct < 0.0 {
            return Err(TrendsError::config(format!(
                "TRENDSCOPE_MIN_GROWTH_PCT must be a non-negative number, got {}",
                growth.min_abs_growth_pct
            )));
        }
        if growth.min_baseline_posts == 0 {
            return Err(TrendsError::config(
                "TRENDSCOPE_MIN_BASELINE_POSTS must be at least 1",
            ));
        }
        Ok(())
    }

    /// The configured taxonomy, or the built-in one.
    pub fn load_taxonomy(&self) -> Result<Taxonomy, TrendsError> {
        match &self.taxonomy_path {
            Some(path) => Taxonomy::load(path),
            None => Taxonomy::builtin(),
        }
    }
}

/// Parse an optional environment variable, using `default` when unset.
fn env_parse<T>(name: &str, default: T) -> Result<T, TrendsError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|e| {
            TrendsError::config(format!("{name}={raw:?} is not a valid value: {e}"))
        }),
        _ => Ok(default),
    }
}
