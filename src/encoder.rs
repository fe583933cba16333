//! Report encoding
//!
//! This module assembles scored units and their aggregates into a render-ready
//! [`SentimentReport`] and serializes it to JSON.

use chrono::Utc;
use uuid::Uuid;

use crate::config::AnalysisConfig;
use crate::error::ComputeError;
use crate::types::{Aggregates, ReportProducer, ScoredUnit, SentimentReport, SkippedUnit, SourceKind};
use crate::{PRODUCER_NAME, PULSE_VERSION};

/// Encoder for producing report envelopes
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Build a report from a scored batch and its aggregates
    pub fn encode(
        &self,
        video_id: Option<String>,
        source: SourceKind,
        config: &AnalysisConfig,
        units: Vec<ScoredUnit>,
        skipped: Vec<SkippedUnit>,
        aggregates: Aggregates,
    ) -> SentimentReport {
        let producer = ReportProducer {
            name: PRODUCER_NAME.to_string(),
            version: PULSE_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        SentimentReport {
            video_id,
            source,
            config: *config,
            producer,
            computed_at_utc: Utc::now().to_rfc3339(),
            units,
            skipped,
            distribution: aggregates.distribution,
            timeline: aggregates.timeline,
            most_positive: aggregates.most_positive,
            most_negative: aggregates.most_negative,
            mean_polarity: aggregates.mean_polarity,
        }
    }

    /// Encode a report to a compact JSON string
    pub fn to_json(report: &SentimentReport) -> Result<String, ComputeError> {
        serde_json::to_string(report).map_err(ComputeError::JsonError)
    }

    /// Encode a report to a pretty JSON string
    pub fn to_json_pretty(report: &SentimentReport) -> Result<String, ComputeError> {
        serde_json::to_string_pretty(report).map_err(ComputeError::JsonError)
    }
}
