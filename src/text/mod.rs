// Text normalization shared by the classifier and keyword extractor.

pub mod normalize;

pub use normalize::{normalize, normalize_opt};
