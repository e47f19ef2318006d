// Topic classifier trait: swap-ready abstraction.
//
// The pipeline only talks to this trait, so the keyword classifier could be
// replaced (or wrapped, e.g. with manual overrides) without touching
// ingestion or the reports.

use super::taxonomy::Taxonomy;

/// Trait for assigning exactly one taxonomy topic to a post.
pub trait TopicClassifier {
    /// Pick a topic for the given title and body. Never fails.
    fn classify(&self, title: &str, body: &str) -> String;

    /// The taxonomy every returned topic belongs to.
    fn taxonomy(&self) -> &Taxonomy;
}
