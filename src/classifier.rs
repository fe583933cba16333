//! Sentiment classification
//!
//! Maps a polarity score to a three-way label using a fixed threshold pair.
//! There is no hysteresis: the label depends only on the instantaneous value.

use serde::{Deserialize, Serialize};

use crate::error::ComputeError;
use crate::types::Sentiment;

/// Default lower bound (exclusive) for a positive label
pub const DEFAULT_POSITIVE_THRESHOLD: f64 = 0.05;

/// Default upper bound (exclusive) for a negative label
pub const DEFAULT_NEGATIVE_THRESHOLD: f64 = -0.05;

/// Threshold pair for sentiment classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentThresholds {
    pub positive_threshold: f64,
    pub negative_threshold: f64,
}

impl Default for SentimentThresholds {
    fn default() -> Self {
        Self {
            positive_threshold: DEFAULT_POSITIVE_THRESHOLD,
            negative_threshold: DEFAULT_NEGATIVE_THRESHOLD,
        }
    }
}

impl SentimentThresholds {
    /// Classify a polarity. Values exactly on a threshold are Neutral.
    pub fn classify(&self, polarity: f64) -> Sentiment {
        if polarity > self.positive_threshold {
            Sentiment::Positive
        } else if polarity < self.negative_threshold {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn validate(&self) -> Result<(), ComputeError> {
        if !self.positive_threshold.is_finite() || !self.negative_threshold.is_finite() {
            return Err(ComputeError::InvalidConfig(
                "sentiment thresholds must be finite".to_string(),
            ));
        }
        if self.negative_threshold > self.positive_threshold {
            return Err(ComputeError::InvalidConfig(format!(
                "negative_threshold ({}) must not exceed positive_threshold ({})",
                self.negative_threshold, self.positive_threshold
            )));
        }
        Ok(())
    }
}

/// Classify with the default thresholds
pub fn classify(polarity: f64) -> Sentiment {
    SentimentThresholds::default().classify(polarity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_neutral() {
        assert_eq!(classify(0.05), Sentiment::Neutral);
        assert_eq!(classify(-0.05), Sentiment::Neutral);
        assert_eq!(classify(0.0), Sentiment::Neutral);
    }

    #[test]
    fn test_just_past_boundaries() {
        assert_eq!(classify(0.050_001), Sentiment::Positive);
        assert_eq!(classify(-0.050_001), Sentiment::Negative);
        assert_eq!(classify(1.0), Sentiment::Positive);
        assert_eq!(classify(-1.0), Sentiment::Negative);
    }

    #[test]
    fn test_reference_polarities() {
        let polarities = [0.8, -0.9, 0.0, 0.06, -0.06, 0.05, -0.05];
        let labels: Vec<Sentiment> = polarities.iter().map(|&p| classify(p)).collect();

        assert_eq!(
            labels,
            vec![
                Sentiment::Positive,
                Sentiment::Negative,
                Sentiment::Neutral,
                Sentiment::Positive,
                Sentiment::Negative,
                Sentiment::Neutral,
                Sentiment::Neutral,
            ]
        );
    }

    #[test]
    fn test_sweep_matches_threshold_rule() {
        for step in -100..=100 {
            let p = step as f64 / 100.0;
            let expected = if p > 0.05 {
                Sentiment::Positive
            } else if p < -0.05 {
                Sentiment::Negative
            } else {
                Sentiment::Neutral
            };
            assert_eq!(classify(p), expected, "polarity {p}");
        }
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = SentimentThresholds {
            positive_threshold: 0.3,
            negative_threshold: -0.1,
        };
        assert_eq!(thresholds.classify(0.2), Sentiment::Neutral);
        assert_eq!(thresholds.classify(0.31), Sentiment::Positive);
        assert_eq!(thresholds.classify(-0.2), Sentiment::Negative);
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let thresholds = SentimentThresholds {
            positive_threshold: -0.1,
            negative_threshold: 0.1,
        };
        assert!(thresholds.validate().is_err());

        let nan = SentimentThresholds {
            positive_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
        assert!(SentimentThresholds::default().validate().is_ok());
    }
}
