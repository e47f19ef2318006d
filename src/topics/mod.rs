// Topic assignment: taxonomy, keyword classifier, and keyword extraction.

pub mod classifier;
pub mod keywords;
pub mod suggest;
pub mod taxonomy;
pub mod traits;
