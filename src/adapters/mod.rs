//! Source payload adapters
//!
//! This module provides adapters that decode the JSON handed over by the fetch
//! collaborators (comment threads, caption transcripts, video metadata) into
//! source-agnostic text units.

mod captions;
mod comments;
mod metadata;

pub use captions::TranscriptAdapter;
pub use comments::CommentThreadsAdapter;
pub use metadata::VideoMetadataAdapter;

use tracing::warn;

use crate::error::{ComputeError, UnitError};
use crate::types::{SkippedUnit, SourceKind, TextBatch};

/// Trait for text source adapters
pub trait TextUnitAdapter {
    /// Kind of source this adapter decodes
    fn source(&self) -> SourceKind;

    /// Parse raw JSON into a batch of text units.
    ///
    /// Malformed records are skipped and listed in [`TextBatch::skipped`];
    /// only a payload that is not a record sequence at all is an error.
    fn parse(&self, raw_json: &str) -> Result<TextBatch, ComputeError>;
}

/// Pick the adapter for a source kind
pub fn adapter_for(source: SourceKind) -> Box<dyn TextUnitAdapter> {
    match source {
        SourceKind::Comments => Box::new(CommentThreadsAdapter),
        SourceKind::Captions => Box::new(TranscriptAdapter),
    }
}

fn skip(source: SourceKind, index: usize, reason: UnitError) -> SkippedUnit {
    warn!(source = source.as_str(), index, %reason, "skipping malformed unit");
    SkippedUnit {
        index,
        reason: reason.to_string(),
    }
}

/// Decode the handful of HTML entities the caption and comment APIs emit,
/// then collapse runs of whitespace.
pub(crate) fn clean_text(raw: &str) -> String {
    // Markup goes before entities so escaped tags survive as text.
    let unescaped = raw
        .replace("<br>", " ")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&");
    unescaped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("it&#39;s  &quot;fine&quot;\n&amp; ok"), "it's \"fine\" & ok");
        assert_eq!(clean_text("line one<br>line two"), "line one line two");
        assert_eq!(clean_text("&amp;lt;"), "&lt;");
        assert_eq!(clean_text("   "), "");
        assert_eq!(clean_text("type &lt;br&gt; for a break"), "type <br> for a break");
    }

    #[test]
    fn test_adapter_for_source() {
        assert_eq!(adapter_for(SourceKind::Comments).source(), SourceKind::Comments);
        assert_eq!(adapter_for(SourceKind::Captions).source(), SourceKind::Captions);
    }
}
