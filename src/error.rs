// Error taxonomy for the analysis pipeline.
//
// Normalization and classification never fail. Everything that can fail
// (reading records, validating configuration, running a report) reports
// through TrendsError so callers can tell which report or record broke.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrendsError {
    /// A record could not be parsed at all. Missing fields are repaired with
    /// defaults instead of producing this error.
    #[error("Malformed input on line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    /// An aggregate report was asked to summarize zero posts.
    #[error("Cannot compute {report}: corpus is empty")]
    EmptyCorpus { report: &'static str },

    /// An aggregate report was handed a post that never went through the classifier.
    #[error("Cannot compute {report}: post {post_id} has no topic assigned")]
    Unclassified {
        report: &'static str,
        post_id: String,
    },

    /// A pre-labeled post carries a topic that the taxonomy doesn't declare.
    #[error("Post {post_id} is labeled with unknown topic '{topic}'")]
    UnknownTopic { post_id: String, topic: String },

    /// The taxonomy or a numeric setting is unusable. Raised before any processing.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl TrendsError {
    pub fn config(message: impl Into<String>) -> Self {
        TrendsError::Configuration(message.into())
    }
}
