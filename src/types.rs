//! Core types for the tubepulse pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: raw text units, scored units, aggregate views and the report envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;

/// Kind of text source a batch was decoded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Video comments (unordered, untimed)
    Comments,
    /// Caption transcript (ordered by start time, timed)
    Captions,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Comments => "comments",
            SourceKind::Captions => "captions",
        }
    }

    /// Whether units from this source carry timing
    pub fn is_timed(&self) -> bool {
        matches!(self, SourceKind::Captions)
    }
}

/// Three-way sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// All labels in display order
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }

    /// Chart color used for this label in the distribution bar chart
    pub fn color(&self) -> &'static str {
        match self {
            Sentiment::Positive => "green",
            Sentiment::Neutral => "gray",
            Sentiment::Negative => "red",
        }
    }
}

/// One discrete piece of text to score: a comment or a caption line
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextUnit {
    pub text: String,
    /// Caption start offset (seconds)
    pub start_seconds: Option<f64>,
    /// Caption duration (seconds)
    pub duration_seconds: Option<f64>,
    /// Comment author display name
    pub author: Option<String>,
    /// Comment like count
    pub like_count: Option<u64>,
    /// Comment publication time
    pub published_at: Option<DateTime<Utc>>,
}

impl TextUnit {
    /// Untimed unit holding only text
    pub fn comment(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Timed caption unit
    pub fn caption(text: impl Into<String>, start_seconds: f64, duration_seconds: f64) -> Self {
        Self {
            text: text.into(),
            start_seconds: Some(start_seconds),
            duration_seconds: Some(duration_seconds),
            ..Default::default()
        }
    }
}

/// A source record rejected as malformed, kept for reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedUnit {
    /// Position of the record in the source payload
    pub index: usize,
    pub reason: String,
}

/// Units decoded from one source payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBatch {
    pub source: SourceKind,
    pub units: Vec<TextUnit>,
    pub skipped: Vec<SkippedUnit>,
}

impl TextBatch {
    pub fn new(source: SourceKind, units: Vec<TextUnit>) -> Self {
        Self {
            source,
            units,
            skipped: Vec::new(),
        }
    }
}

/// A text unit with its polarity and sentiment label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredUnit {
    pub text: String,
    /// Polarity in [-1, 1]
    pub polarity: f64,
    pub sentiment: Sentiment,
    /// Start offset (minutes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_offset: Option<f64>,
    /// Duration (seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl ScoredUnit {
    /// Position of this unit's polarity on a red (0) to green (1) color map
    pub fn gradient_position(&self) -> f64 {
        gradient_position(self.polarity)
    }
}

/// Map a polarity in [-1, 1] onto [0, 1]
pub fn gradient_position(polarity: f64) -> f64 {
    ((polarity + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Count of units per sentiment label, zero-filled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    #[serde(rename = "Positive")]
    pub positive: usize,
    #[serde(rename = "Neutral")]
    pub neutral: usize,
    #[serde(rename = "Negative")]
    pub negative: usize,
}

impl SentimentCounts {
    pub fn get(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }

    pub fn increment(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

/// One equal-width polarity histogram bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub center: f64,
    pub count: usize,
}

/// Label counts and polarity histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub total: usize,
    pub counts: SentimentCounts,
    pub histogram: Vec<HistogramBin>,
}

/// One point of the smoothed polarity timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// Start offset (minutes)
    pub time_minutes: f64,
    pub polarity: f64,
    pub rolling_polarity: f64,
}

/// Derived views over a scored batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregates {
    pub distribution: DistributionSummary,
    pub timeline: Vec<TimelinePoint>,
    pub most_positive: Vec<ScoredUnit>,
    pub most_negative: Vec<ScoredUnit>,
    pub mean_polarity: Option<f64>,
}

/// Producer metadata embedded in every report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Render-ready result of one analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentReport {
    pub video_id: Option<String>,
    pub source: SourceKind,
    pub config: AnalysisConfig,
    pub producer: ReportProducer,
    pub computed_at_utc: String,
    pub units: Vec<ScoredUnit>,
    pub skipped: Vec<SkippedUnit>,
    pub distribution: DistributionSummary,
    pub timeline: Vec<TimelinePoint>,
    pub most_positive: Vec<ScoredUnit>,
    pub most_negative: Vec<ScoredUnit>,
    pub mean_polarity: Option<f64>,
}

impl SentimentReport {
    /// True when no unit survived decoding
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Video metadata decoded from the videos API
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub video_id: String,
    pub title: Option<String>,
    pub channel_title: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
    pub thumbnail_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_position() {
        assert_eq!(gradient_position(-1.0), 0.0);
        assert_eq!(gradient_position(0.0), 0.5);
        assert_eq!(gradient_position(1.0), 1.0);
        assert_eq!(gradient_position(3.0), 1.0);
    }

    #[test]
    fn test_sentiment_counts() {
        let mut counts = SentimentCounts::default();
        counts.increment(Sentiment::Positive);
        counts.increment(Sentiment::Negative);
        counts.increment(Sentiment::Negative);

        assert_eq!(counts.get(Sentiment::Negative), 2);
        assert_eq!(counts.get(Sentiment::Neutral), 0);
        assert_eq!(counts.total(), 3);

        let json = serde_json::to_value(counts).unwrap();
        assert_eq!(json["Neutral"], 0);
    }

    #[test]
    fn test_labels_and_colors() {
        let colors: Vec<&str> = Sentiment::ALL.iter().map(|s| s.color()).collect();
        assert_eq!(colors, vec!["green", "gray", "red"]);
        assert!(SourceKind::Captions.is_timed());
        assert!(!SourceKind::Comments.is_timed());
        assert_eq!(
            serde_json::to_string(&SourceKind::Captions).unwrap(),
            "\"captions\""
        );
    }
}
