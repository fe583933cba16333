//! Analysis configuration
//!
//! All knobs of the aggregation stage live here. The struct is serde-friendly so
//! callers can persist it next to a report or load it from a JSON file.

use serde::{Deserialize, Serialize};

use crate::classifier::SentimentThresholds;
use crate::error::ComputeError;

/// Default number of polarity histogram bins
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// Default rolling-average window (units)
pub const DEFAULT_ROLLING_WINDOW: usize = 10;

/// Default size of each top-K list
pub const DEFAULT_TOP_K: usize = 10;

/// Configuration for one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub thresholds: SentimentThresholds,
    pub histogram_bins: usize,
    pub rolling_window: usize,
    pub top_k: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            thresholds: SentimentThresholds::default(),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            rolling_window: DEFAULT_ROLLING_WINDOW,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl AnalysisConfig {
    pub fn with_histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = bins;
        self
    }

    pub fn with_rolling_window(mut self, window: usize) -> Self {
        self.rolling_window = window;
        self
    }

    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    pub fn with_thresholds(mut self, thresholds: SentimentThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Check that the configuration can drive an aggregation
    pub fn validate(&self) -> Result<(), ComputeError> {
        self.thresholds.validate()?;

        if self.histogram_bins == 0 {
            return Err(ComputeError::InvalidConfig(
                "histogram_bins must be at least 1".to_string(),
            ));
        }
        if self.rolling_window == 0 {
            return Err(ComputeError::InvalidConfig(
                "rolling_window must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load and validate a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        let config: AnalysisConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to pretty JSON
    pub fn to_json(&self) -> Result<String, ComputeError> {
        serde_json::to_string_pretty(self).map_err(ComputeError::JsonError)
    }
}
