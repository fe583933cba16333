//! Pipeline orchestration
//!
//! This module provides the public API for tubepulse.
//! It orchestrates the full pipeline from raw source JSON to a sentiment report.

use tracing::debug;

use crate::adapters::{adapter_for, CommentThreadsAdapter, TextUnitAdapter, TranscriptAdapter};
use crate::aggregate::SentimentAggregator;
use crate::config::AnalysisConfig;
use crate::encoder::ReportEncoder;
use crate::error::ComputeError;
use crate::scorer::{LexiconScorer, PolarityScorer};
use crate::types::{SentimentReport, SourceKind, TextBatch};
use crate::video_id::extract_video_id;

/// Convert a raw comment payload to a JSON sentiment report.
///
/// # Arguments
/// * `raw_json` - Comment thread API response JSON (or an array of strings)
/// * `video_id` - Video URL or identifier
///
/// # Example
/// ```ignore
/// let report_json = comments_to_report(comments_json, "dQw4w9WgXcQ".to_string())?;
/// ```
pub fn comments_to_report(raw_json: String, video_id: String) -> Result<String, ComputeError> {
    let processor = SentimentProcessor::new();
    let report =
        processor.process_with_adapter(&CommentThreadsAdapter, &raw_json, Some(&video_id))?;
    ReportEncoder::to_json(&report)
}

/// Convert a raw caption transcript to a JSON sentiment report.
///
/// # Arguments
/// * `raw_json` - Transcript records JSON (`[{start, duration, text}]`)
/// * `video_id` - Video URL or identifier
///
/// # Example
/// ```ignore
/// let report_json = captions_to_report(transcript_json, "dQw4w9WgXcQ".to_string())?;
/// ```
pub fn captions_to_report(raw_json: String, video_id: String) -> Result<String, ComputeError> {
    let processor = SentimentProcessor::new();
    let report = processor.process_with_adapter(&TranscriptAdapter, &raw_json, Some(&video_id))?;
    ReportEncoder::to_json(&report)
}

/// Configured analyzer: each call is an independent request/response.
pub struct SentimentProcessor {
    config: AnalysisConfig,
    scorer: Box<dyn PolarityScorer>,
    encoder: ReportEncoder,
}

impl Default for SentimentProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentProcessor {
    /// Create a processor with default settings and the built-in lexicon scorer
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
            scorer: Box::new(LexiconScorer::new()),
            encoder: ReportEncoder::new(),
        }
    }

    /// Create a processor with a validated configuration
    pub fn with_config(config: AnalysisConfig) -> Result<Self, ComputeError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Replace the polarity scorer
    pub fn with_scorer(mut self, scorer: impl PolarityScorer + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    /// Pin the report instance ID
    pub fn with_instance_id(mut self, instance_id: String) -> Self {
        self.encoder = ReportEncoder::with_instance_id(instance_id);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze a comment thread payload
    pub fn analyze_comments(
        &self,
        raw_json: &str,
        video_id: Option<&str>,
    ) -> Result<SentimentReport, ComputeError> {
        self.process_with_adapter(&CommentThreadsAdapter, raw_json, video_id)
    }

    /// Analyze a caption transcript payload
    pub fn analyze_captions(
        &self,
        raw_json: &str,
        video_id: Option<&str>,
    ) -> Result<SentimentReport, ComputeError> {
        self.process_with_adapter(&TranscriptAdapter, raw_json, video_id)
    }

    /// Analyze a payload of the given source kind
    pub fn analyze_json(
        &self,
        source: SourceKind,
        raw_json: &str,
        video_id: Option<&str>,
    ) -> Result<SentimentReport, ComputeError> {
        let adapter = adapter_for(source);
        self.process_with_adapter(adapter.as_ref(), raw_json, video_id)
    }

    /// Score, aggregate and encode an already decoded batch.
    ///
    /// Pipeline stages:
    /// 1. PolarityScorer + SentimentThresholds - Score and label each unit
    /// 2. SentimentAggregator - Distribution, timeline, top-K
    /// 3. ReportEncoder - Assemble the report envelope
    pub fn analyze(
        &self,
        video_id: Option<&str>,
        batch: TextBatch,
    ) -> Result<SentimentReport, ComputeError> {
        let video_id = video_id.map(extract_video_id).transpose()?;

        // Stage 1: Score units
        let units = SentimentAggregator::score_units(
            &batch.units,
            self.scorer.as_ref(),
            &self.config.thresholds,
        );

        // Stage 2: Aggregate
        let aggregates = SentimentAggregator::aggregate(&units, &self.config);

        debug!(
            source = batch.source.as_str(),
            units = units.len(),
            skipped = batch.skipped.len(),
            "analysis complete"
        );

        // Stage 3: Encode
        Ok(self.encoder.encode(
            video_id,
            batch.source,
            &self.config,
            units,
            batch.skipped,
            aggregates,
        ))
    }

    fn process_with_adapter(
        &self,
        adapter: &dyn TextUnitAdapter,
        raw_json: &str,
        video_id: Option<&str>,
    ) -> Result<SentimentReport, ComputeError> {
        // Stage 0: Decode source payload
        let batch = adapter.parse(raw_json)?;
        self.analyze(video_id, batch)
    }
}
