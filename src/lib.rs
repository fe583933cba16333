//! Tubepulse - Sentiment scoring and aggregation for YouTube comments and captions
//!
//! Tubepulse turns fetched comment threads and caption transcripts into a
//! render-ready sentiment report through a deterministic pipeline:
//! source adaptation → polarity scoring → classification → aggregation
//! → report encoding.
//!
//! ## Modules
//!
//! - **Adapters**: Decode comment, caption and video metadata payloads
//! - **Scoring**: Pluggable polarity scorers with a built-in lexicon analyzer
//! - **Aggregation**: Distribution, rolling timeline and top-K views
//! - **Export**: JSON, NDJSON, CSV and plain-text renderings

pub mod adapters;
pub mod aggregate;
pub mod classifier;
pub mod config;
pub mod encoder;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod scorer;
pub mod types;
pub mod video_id;

pub use classifier::{classify, SentimentThresholds};
pub use config::AnalysisConfig;
pub use error::ComputeError;
pub use pipeline::{captions_to_report, comments_to_report, SentimentProcessor};
pub use scorer::{LexiconScorer, PolarityScorer, ScoringFailure};
pub use types::{Sentiment, SentimentReport, SourceKind, TextUnit};
pub use video_id::extract_video_id;

/// Tubepulse version embedded in all reports
pub const PULSE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "tubepulse";
