//! Caption transcript adapter
//!
//! Decodes transcript records (`{start, duration, text}`, seconds) into timed
//! text units. Source order is preserved; records are not re-sorted.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{clean_text, skip, TextUnitAdapter};
use crate::error::{ComputeError, UnitError};
use crate::types::{SourceKind, TextBatch, TextUnit};

/// Caption transcript adapter
pub struct TranscriptAdapter;

impl TextUnitAdapter for TranscriptAdapter {
    fn source(&self) -> SourceKind {
        SourceKind::Captions
    }

    fn parse(&self, raw_json: &str) -> Result<TextBatch, ComputeError> {
        let payload: Value = serde_json::from_str(raw_json)?;

        let records = match payload {
            Value::Array(records) => records,
            Value::Object(mut map) => {
                if let Some(reason) = map.remove("unavailable") {
                    let reason = match reason {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    return Err(ComputeError::CaptionsUnavailable(reason));
                }
                match map.remove("transcript") {
                    Some(Value::Array(records)) => records,
                    _ => {
                        return Err(ComputeError::MalformedInput(
                            "caption payload has no 'transcript' array".to_string(),
                        ))
                    }
                }
            }
            _ => {
                return Err(ComputeError::MalformedInput(
                    "caption payload must be an array of records".to_string(),
                ))
            }
        };

        let mut batch = TextBatch::new(SourceKind::Captions, Vec::with_capacity(records.len()));

        for (index, record) in records.into_iter().enumerate() {
            match decode_caption(record) {
                Ok(unit) => batch.units.push(unit),
                Err(reason) => batch.skipped.push(skip(SourceKind::Captions, index, reason)),
            }
        }

        debug!(
            units = batch.units.len(),
            skipped = batch.skipped.len(),
            "decoded caption payload"
        );
        Ok(batch)
    }
}

fn decode_caption(record: Value) -> Result<TextUnit, UnitError> {
    let record: CaptionRecord =
        serde_json::from_value(record).map_err(|e| UnitError::UnexpectedShape(e.to_string()))?;

    let start = record.start.ok_or(UnitError::MissingStart)?;
    if !start.is_finite() || start < 0.0 {
        return Err(UnitError::InvalidStart(start));
    }

    let duration = record.duration.unwrap_or(0.0);
    if !duration.is_finite() || duration < 0.0 {
        return Err(UnitError::InvalidDuration(duration));
    }

    let text = clean_text(&record.text.ok_or(UnitError::MissingText)?);
    if text.is_empty() {
        return Err(UnitError::BlankText);
    }

    Ok(TextUnit::caption(text, start, duration))
}

// Transcript record structure

#[derive(Debug, Deserialize)]
struct CaptionRecord {
    start: Option<f64>,
    #[serde(alias = "dur")]
    duration: Option<f64>,
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transcript() {
        let json = r#"[
            {"start": 0.0, "duration": 2.5, "text": "welcome back everyone"},
            {"start": 2.5, "duration": 3.0, "text": "today&#39;s topic is great"},
            {"start": 5.5, "dur": 1.5, "text": "let&amp;s go"}
        ]"#;

        let batch = TranscriptAdapter.parse(json).unwrap();
        assert_eq!(batch.source, SourceKind::Captions);
        assert_eq!(batch.units.len(), 3);
        assert!(batch.skipped.is_empty());

        assert_eq!(batch.units[1].text, "today's topic is great");
        assert_eq!(batch.units[1].start_seconds, Some(2.5));
        assert_eq!(batch.units[2].duration_seconds, Some(1.5));
        assert_eq!(batch.units[2].text, "let&s go");
    }

    #[test]
    fn test_preserves_source_order() {
        let json = r#"[
            {"start": 10.0, "duration": 1.0, "text": "second"},
            {"start": 1.0, "duration": 1.0, "text": "first"}
        ]"#;
        let batch = TranscriptAdapter.parse(json).unwrap();
        assert_eq!(batch.units[0].text, "second");
        assert_eq!(batch.units[1].text, "first");
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let json = r#"[
            {"duration": 1.0, "text": "no start"},
            {"start": -1.0, "duration": 1.0, "text": "negative start"},
            {"start": 1.0, "duration": -2.0, "text": "negative duration"},
            {"start": 2.0, "duration": 1.0},
            {"start": "3.0", "duration": 1.0, "text": "string start"},
            {"start": 4.0, "text": "no duration is fine"}
        ]"#;

        let batch = TranscriptAdapter.parse(json).unwrap();
        assert_eq!(batch.units.len(), 1);
        assert_eq!(batch.units[0].duration_seconds, Some(0.0));

        let reasons: Vec<&str> = batch.skipped.iter().map(|s| s.reason.as_str()).collect();
        assert_eq!(reasons[0], "missing start offset");
        assert_eq!(reasons[1], "invalid start offset: -1");
        assert_eq!(reasons[2], "invalid duration: -2");
        assert_eq!(reasons[3], "missing text");
        assert!(reasons[4].starts_with("unexpected record shape"));
    }

    #[test]
    fn test_wrapped_transcript() {
        let json = r#"{"transcript": [{"start": 0.0, "duration": 1.0, "text": "hi"}]}"#;
        let batch = TranscriptAdapter.parse(json).unwrap();
        assert_eq!(batch.units.len(), 1);
    }

    #[test]
    fn test_captions_unavailable() {
        let result = TranscriptAdapter.parse(r#"{"unavailable": "Subtitles are disabled"}"#);
        match result {
            Err(ComputeError::CaptionsUnavailable(reason)) => {
                assert_eq!(reason, "Subtitles are disabled")
            }
            other => panic!("expected CaptionsUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(
            TranscriptAdapter.parse(r#""just a string""#),
            Err(ComputeError::MalformedInput(_))
        ));
        assert!(matches!(
            TranscriptAdapter.parse(r#"{"segments": []}"#),
            Err(ComputeError::MalformedInput(_))
        ));
    }
}
