// Job matching: term normalization, query building, formatting, ranking,
// and the request handlers that run the pipeline.

pub mod format;
pub mod handlers;
pub mod matcher;
pub mod normalize;
pub mod query;
pub mod ranking;
