// Trendscope: topic classification and trend analytics for forum corpora
//
// This is the library root. Each module corresponds to a stage of the
// ingest -> classify -> aggregate -> serialize pipeline.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod text;
pub mod topics;
