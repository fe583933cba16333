//! Tabular and text exports
//!
//! Flat CSV export of scored units, NDJSON unit streams, top-K projections and
//! a plain-text summary for terminals.

use std::io::Write;

use serde::Serialize;

use crate::error::ComputeError;
use crate::types::{ScoredUnit, Sentiment, SentimentReport, SourceKind};

/// CSV header for untimed sources
pub const COMMENT_COLUMNS: [&str; 3] = ["text", "polarity", "sentiment"];

/// CSV header for timed sources
pub const CAPTION_COLUMNS: [&str; 5] = ["time", "duration", "text", "polarity", "sentiment"];

/// Write one CSV row per unit, with a header row
pub fn write_csv<W: Write>(
    writer: W,
    source: SourceKind,
    units: &[ScoredUnit],
) -> Result<(), ComputeError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    match source {
        SourceKind::Comments => {
            csv_writer.write_record(COMMENT_COLUMNS)?;
            for unit in units {
                let polarity = format_polarity(unit.polarity);
                csv_writer.write_record([
                    unit.text.as_str(),
                    polarity.as_str(),
                    unit.sentiment.as_str(),
                ])?;
            }
        }
        SourceKind::Captions => {
            csv_writer.write_record(CAPTION_COLUMNS)?;
            for unit in units {
                let time = unit.time_offset.map(format_minutes).unwrap_or_default();
                let duration = unit.duration.map(|d| d.to_string()).unwrap_or_default();
                let polarity = format_polarity(unit.polarity);
                csv_writer.write_record([
                    time.as_str(),
                    duration.as_str(),
                    unit.text.as_str(),
                    polarity.as_str(),
                    unit.sentiment.as_str(),
                ])?;
            }
        }
    }

    csv_writer
        .flush()
        .map_err(|e| ComputeError::EncodingError(e.to_string()))
}

/// Render the CSV export into a string
pub fn to_csv_string(source: SourceKind, units: &[ScoredUnit]) -> Result<String, ComputeError> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, source, units)?;
    String::from_utf8(buffer).map_err(|e| ComputeError::EncodingError(e.to_string()))
}

/// One JSON object per line per unit
pub fn to_ndjson(units: &[ScoredUnit]) -> Result<String, ComputeError> {
    let mut lines = Vec::with_capacity(units.len());
    for unit in units {
        lines.push(serde_json::to_string(unit)?);
    }
    Ok(lines.join("\n") + "\n")
}

/// Top-K entry projected for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    pub polarity: f64,
    pub text: String,
}

/// Project ranked units to `{time, polarity, text}`
pub fn project_top(units: &[ScoredUnit]) -> Vec<TopEntry> {
    units
        .iter()
        .map(|u| TopEntry {
            time: u.time_offset,
            polarity: u.polarity,
            text: u.text.clone(),
        })
        .collect()
}

/// Plain-text summary of a report
pub fn summary_text(report: &SentimentReport) -> String {
    let mut out = String::new();

    out.push_str("Sentiment Report\n");
    out.push_str("================\n");
    if let Some(video_id) = &report.video_id {
        out.push_str(&format!("Video:   {video_id}\n"));
    }
    out.push_str(&format!("Source:  {}\n", report.source.as_str()));
    out.push_str(&format!("Units:   {}\n", report.distribution.total));
    if !report.skipped.is_empty() {
        out.push_str(&format!("Skipped: {}\n", report.skipped.len()));
    }

    if report.is_empty() {
        out.push_str("\nNo data to analyze.\n");
        return out;
    }

    if let Some(mean) = report.mean_polarity {
        out.push_str(&format!("Mean polarity: {}\n", format_polarity(mean)));
    }

    out.push_str("\nDistribution:\n");
    let total = report.distribution.total as f64;
    for sentiment in Sentiment::ALL {
        let count = report.distribution.counts.get(sentiment);
        out.push_str(&format!(
            "  {:<9} {:>6}  ({:.1}%)\n",
            sentiment.as_str(),
            count,
            count as f64 / total * 100.0
        ));
    }

    write_top(&mut out, "Most positive", &report.most_positive);
    write_top(&mut out, "Most negative", &report.most_negative);

    if let Some(last) = report.timeline.last() {
        out.push_str(&format!(
            "\nTimeline: {} points over {} min, final rolling polarity {}\n",
            report.timeline.len(),
            format_minutes(last.time_minutes),
            format_polarity(last.rolling_polarity)
        ));
    }

    out
}

fn write_top(out: &mut String, title: &str, units: &[ScoredUnit]) {
    if units.is_empty() {
        return;
    }
    out.push_str(&format!("\n{title}:\n"));
    for entry in project_top(units) {
        let time = entry
            .time
            .map(|t| format!("[{}] ", format_minutes(t)))
            .unwrap_or_default();
        out.push_str(&format!(
            "  {:>7}  {}{}\n",
            format_polarity(entry.polarity),
            time,
            entry.text
        ));
    }
}

fn format_polarity(polarity: f64) -> String {
    format!("{polarity:.4}")
}

fn format_minutes(minutes: f64) -> String {
    format!("{minutes:.2}")
}
