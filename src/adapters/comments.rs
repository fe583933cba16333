//! Comment thread adapter
//!
//! Decodes YouTube `commentThreads` responses (or a bare array of comment
//! strings) into untimed text units.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{clean_text, skip, TextUnitAdapter};
use crate::error::{ComputeError, UnitError};
use crate::types::{SourceKind, TextBatch, TextUnit};

/// Comment thread payload adapter
pub struct CommentThreadsAdapter;

impl TextUnitAdapter for CommentThreadsAdapter {
    fn source(&self) -> SourceKind {
        SourceKind::Comments
    }

    fn parse(&self, raw_json: &str) -> Result<TextBatch, ComputeError> {
        let payload: Value = serde_json::from_str(raw_json)?;

        let records = match payload {
            Value::Array(records) => records,
            Value::Object(mut map) => match map.remove("items") {
                Some(Value::Array(items)) => items,
                Some(other) => {
                    return Err(ComputeError::MalformedInput(format!(
                        "comment 'items' must be an array, got {}",
                        json_type(&other)
                    )))
                }
                None => {
                    return Err(ComputeError::MalformedInput(
                        "comment payload has no 'items' array".to_string(),
                    ))
                }
            },
            other => {
                return Err(ComputeError::MalformedInput(format!(
                    "comment payload must be an array or object, got {}",
                    json_type(&other)
                )))
            }
        };

        let mut batch = TextBatch::new(SourceKind::Comments, Vec::with_capacity(records.len()));

        for (index, record) in records.into_iter().enumerate() {
            match decode_comment(record) {
                Ok(unit) => batch.units.push(unit),
                Err(reason) => batch.skipped.push(skip(SourceKind::Comments, index, reason)),
            }
        }

        debug!(
            units = batch.units.len(),
            skipped = batch.skipped.len(),
            "decoded comment payload"
        );
        Ok(batch)
    }
}

fn decode_comment(record: Value) -> Result<TextUnit, UnitError> {
    match record {
        Value::String(text) => {
            let text = clean_text(&text);
            if text.is_empty() {
                return Err(UnitError::BlankText);
            }
            Ok(TextUnit::comment(text))
        }
        Value::Object(_) => {
            let thread: CommentRecord = serde_json::from_value(record)
                .map_err(|e| UnitError::UnexpectedShape(e.to_string()))?;
            thread.into_unit()
        }
        other => Err(UnitError::UnexpectedShape(format!(
            "expected comment object or string, got {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// Comment API response structures

/// Either a `commentThread` resource or a flat `{text, author}` record
#[derive(Debug, Deserialize)]
struct CommentRecord {
    snippet: Option<ThreadSnippet>,
    text: Option<String>,
    author: Option<String>,
}

impl CommentRecord {
    fn into_unit(self) -> Result<TextUnit, UnitError> {
        if let Some(text) = self.text {
            return unit_from_parts(Some(text), self.author, None, None);
        }

        let comment = self
            .snippet
            .and_then(|s| s.top_level_comment)
            .and_then(|c| c.snippet)
            .ok_or(UnitError::MissingText)?;

        let published_at = comment
            .published_at
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|dt| dt.with_timezone(&Utc));

        unit_from_parts(
            comment.text_original.or(comment.text_display),
            comment.author_display_name,
            comment.like_count,
            published_at,
        )
    }
}

fn unit_from_parts(
    text: Option<String>,
    author: Option<String>,
    like_count: Option<u64>,
    published_at: Option<DateTime<Utc>>,
) -> Result<TextUnit, UnitError> {
    let text = clean_text(&text.ok_or(UnitError::MissingText)?);
    if text.is_empty() {
        return Err(UnitError::BlankText);
    }
    Ok(TextUnit {
        text,
        author,
        like_count,
        published_at,
        ..Default::default()
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadSnippet {
    top_level_comment: Option<TopLevelComment>,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: Option<CommentSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    text_original: Option<String>,
    text_display: Option<String>,
    author_display_name: Option<String>,
    like_count: Option<u64>,
    published_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_threads_json() -> &'static str {
        r#"{
            "kind": "youtube#commentThreadListResponse",
            "items": [
                {
                    "id": "c1",
                    "snippet": {
                        "topLevelComment": {
                            "snippet": {
                                "textDisplay": "Great video!",
                                "textOriginal": "Great video!",
                                "authorDisplayName": "alice",
                                "likeCount": 12,
                                "publishedAt": "2024-01-15T10:00:00Z"
                            }
                        }
                    }
                },
                {
                    "id": "c2",
                    "snippet": {
                        "topLevelComment": {
                            "snippet": {
                                "textDisplay": "this was &quot;meh&quot;",
                                "authorDisplayName": "bob"
                            }
                        }
                    }
                },
                {
                    "id": "c3",
                    "snippet": {}
                },
                {
                    "id": "c4",
                    "snippet": {
                        "topLevelComment": {
                            "snippet": { "textOriginal": "   " }
                        }
                    }
                }
            ]
        }"#
    }

    #[test]
    fn test_parse_comment_threads() {
        let batch = CommentThreadsAdapter.parse(sample_threads_json()).unwrap();

        assert_eq!(batch.source, SourceKind::Comments);
        assert_eq!(batch.units.len(), 2);

        let first = &batch.units[0];
        assert_eq!(first.text, "Great video!");
        assert_eq!(first.author.as_deref(), Some("alice"));
        assert_eq!(first.like_count, Some(12));
        assert!(first.published_at.is_some());
        assert!(first.start_seconds.is_none());

        assert_eq!(batch.units[1].text, "this was \"meh\"");
    }

    #[test]
    fn test_malformed_comments_are_skipped() {
        let batch = CommentThreadsAdapter.parse(sample_threads_json()).unwrap();

        assert_eq!(batch.skipped.len(), 2);
        assert_eq!(batch.skipped[0].index, 2);
        assert_eq!(batch.skipped[0].reason, "missing text");
        assert_eq!(batch.skipped[1].index, 3);
        assert_eq!(batch.skipped[1].reason, "blank text");
    }

    #[test]
    fn test_parse_plain_array() {
        let json = r#"["love it", {"text": "hate it", "author": "x"}, 42, ""]"#;
        let batch = CommentThreadsAdapter.parse(json).unwrap();

        assert_eq!(batch.units.len(), 2);
        assert_eq!(batch.units[1].author.as_deref(), Some("x"));
        assert_eq!(batch.skipped.len(), 2);
        assert_eq!(batch.skipped[0].index, 2);
    }

    #[test]
    fn test_empty_items() {
        let batch = CommentThreadsAdapter.parse(r#"{"items": []}"#).unwrap();
        assert!(batch.units.is_empty());
        assert!(batch.skipped.is_empty());
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(
            CommentThreadsAdapter.parse(r#"{"kind": "x"}"#),
            Err(ComputeError::MalformedInput(_))
        ));
        assert!(matches!(
            CommentThreadsAdapter.parse(r#"{"items": "nope"}"#),
            Err(ComputeError::MalformedInput(_))
        ));
        assert!(matches!(
            CommentThreadsAdapter.parse("17"),
            Err(ComputeError::MalformedInput(_))
        ));
        assert!(matches!(
            CommentThreadsAdapter.parse("not json"),
            Err(ComputeError::JsonError(_))
        ));
    }
}
