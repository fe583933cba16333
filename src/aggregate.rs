//! Scoring and aggregation
//!
//! This module turns text units into scored units and derives the views the
//! presentation layer consumes:
//! - Label counts and a fixed-range polarity histogram
//! - Trailing rolling-average polarity timeline (timed sources only)
//! - Top-K most positive and most negative units
//!
//! Everything here is a pure function of its input batch.

use std::cmp::Ordering;

use tracing::debug;

use crate::classifier::SentimentThresholds;
use crate::config::AnalysisConfig;
use crate::scorer::{score_or_neutral, PolarityScorer};
use crate::types::{
    Aggregates, DistributionSummary, HistogramBin, ScoredUnit, SentimentCounts, TextUnit,
    TimelinePoint,
};

/// Lower edge of the polarity histogram
pub const POLARITY_MIN: f64 = -1.0;

/// Upper edge of the polarity histogram
pub const POLARITY_MAX: f64 = 1.0;

/// Aggregation engine for scored batches
pub struct SentimentAggregator;

impl SentimentAggregator {
    /// Score and label every unit, preserving input order
    pub fn score_units(
        units: &[TextUnit],
        scorer: &dyn PolarityScorer,
        thresholds: &SentimentThresholds,
    ) -> Vec<ScoredUnit> {
        units
            .iter()
            .map(|unit| {
                let polarity = score_or_neutral(scorer, &unit.text);
                ScoredUnit {
                    text: unit.text.clone(),
                    polarity,
                    sentiment: thresholds.classify(polarity),
                    time_offset: unit.start_seconds.map(|s| s / 60.0),
                    duration: unit.duration_seconds,
                    author: unit.author.clone(),
                    like_count: unit.like_count,
                    published_at: unit.published_at,
                }
            })
            .collect()
    }

    /// Derive all views from a scored batch
    pub fn aggregate(units: &[ScoredUnit], config: &AnalysisConfig) -> Aggregates {
        if units.is_empty() {
            debug!("empty batch; returning zero-valued aggregates");
        }

        Aggregates {
            distribution: distribution(units, config.histogram_bins),
            timeline: timeline(units, config.rolling_window),
            most_positive: top_k_positive(units, config.top_k),
            most_negative: top_k_negative(units, config.top_k),
            mean_polarity: mean_polarity(units),
        }
    }
}

/// Label counts plus a polarity histogram over [-1, 1]
pub fn distribution(units: &[ScoredUnit], bins: usize) -> DistributionSummary {
    let mut counts = SentimentCounts::default();
    for unit in units {
        counts.increment(unit.sentiment);
    }

    let polarities: Vec<f64> = units.iter().map(|u| u.polarity).collect();

    DistributionSummary {
        total: units.len(),
        counts,
        histogram: histogram(&polarities, bins),
    }
}

/// Equal-width histogram over [-1, 1].
///
/// A value `v` lands in bin `i` when `edges[i] <= v < edges[i + 1]`; the last
/// bin also holds `v == 1.0`. Out-of-range values are clamped, NaN counts as 0.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if bins == 0 {
        return Vec::new();
    }

    let edges = bin_edges(bins);
    let mut counts = vec![0usize; bins];

    for &value in values {
        counts[bin_index(value, &edges)] += 1;
    }

    edges
        .windows(2)
        .zip(counts)
        .map(|(edge, count)| HistogramBin {
            lower: edge[0],
            upper: edge[1],
            center: (edge[0] + edge[1]) / 2.0,
            count,
        })
        .collect()
}

fn bin_edges(bins: usize) -> Vec<f64> {
    let width = (POLARITY_MAX - POLARITY_MIN) / bins as f64;
    let mut edges: Vec<f64> = (0..bins)
        .map(|i| POLARITY_MIN + i as f64 * width)
        .collect();
    edges.push(POLARITY_MAX);
    edges
}

fn bin_index(value: f64, edges: &[f64]) -> usize {
    let bins = edges.len() - 1;
    let value = if value.is_nan() {
        0.0
    } else {
        value.clamp(POLARITY_MIN, POLARITY_MAX)
    };

    let width = (POLARITY_MAX - POLARITY_MIN) / bins as f64;
    let mut index = (((value - POLARITY_MIN) / width).floor() as usize).min(bins - 1);

    // Settle float rounding against the reported edges.
    while index > 0 && value < edges[index] {
        index -= 1;
    }
    while index < bins - 1 && value >= edges[index + 1] {
        index += 1;
    }
    index
}

/// Trailing mean over at most `window` values ending at each position.
///
/// Leading positions average the available prefix; no value looks ahead.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Rolling polarity timeline. Empty unless every unit carries a time offset.
pub fn timeline(units: &[ScoredUnit], window: usize) -> Vec<TimelinePoint> {
    let Some(times) = units
        .iter()
        .map(|u| u.time_offset)
        .collect::<Option<Vec<f64>>>()
    else {
        return Vec::new();
    };

    let polarities: Vec<f64> = units.iter().map(|u| u.polarity).collect();
    let rolling = rolling_mean(&polarities, window);

    times
        .into_iter()
        .zip(polarities)
        .zip(rolling)
        .map(|((time_minutes, polarity), rolling_polarity)| TimelinePoint {
            time_minutes,
            polarity,
            rolling_polarity,
        })
        .collect()
}

/// The `k` highest-polarity units, descending; ties keep source order.
///
/// Ordering follows `f64::total_cmp`, so NaN polarities get a fixed position.
pub fn top_k_positive(units: &[ScoredUnit], k: usize) -> Vec<ScoredUnit> {
    ranked(units, k, |a, b| b.total_cmp(&a))
}

/// The `k` lowest-polarity units, ascending; ties keep source order.
///
/// Ordering follows `f64::total_cmp`, so NaN polarities get a fixed position.
pub fn top_k_negative(units: &[ScoredUnit], k: usize) -> Vec<ScoredUnit> {
    ranked(units, k, |a, b| a.total_cmp(&b))
}

fn ranked<F>(units: &[ScoredUnit], k: usize, cmp: F) -> Vec<ScoredUnit>
where
    F: Fn(f64, f64) -> Ordering,
{
    let mut sorted: Vec<&ScoredUnit> = units.iter().collect();
    // Stable sort: equal polarities stay in source order.
    sorted.sort_by(|a, b| cmp(rank_key(a.polarity), rank_key(b.polarity)));
    sorted.into_iter().take(k).cloned().collect()
}

/// Signed zeros tie under `total_cmp` only once folded together
fn rank_key(polarity: f64) -> f64 {
    if polarity == 0.0 {
        0.0
    } else {
        polarity
    }
}

/// Arithmetic mean polarity, `None` for an empty batch
pub fn mean_polarity(units: &[ScoredUnit]) -> Option<f64> {
    if units.is_empty() {
        return None;
    }
    Some(units.iter().map(|u| u.polarity).sum::<f64>() / units.len() as f64)
}
