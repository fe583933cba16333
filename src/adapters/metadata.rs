//! Video metadata adapter
//!
//! Parses a YouTube `videos` API response into [`VideoMetadata`]. Statistic
//! counters arrive as decimal strings.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::ComputeError;
use crate::types::VideoMetadata;

/// Video metadata adapter
pub struct VideoMetadataAdapter;

impl VideoMetadataAdapter {
    /// Parse the first video resource of a `videos` response
    pub fn parse(&self, raw_json: &str) -> Result<VideoMetadata, ComputeError> {
        let payload: VideosResponse = serde_json::from_str(raw_json)?;

        let video = payload
            .items
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| ComputeError::MissingField("items[0]".to_string()))?;

        let id = video
            .id
            .ok_or_else(|| ComputeError::MissingField("items[0].id".to_string()))?;

        let snippet = video.snippet.unwrap_or_default();
        let statistics = video.statistics.unwrap_or_default();

        let thumbnail_url = snippet.thumbnails.as_ref().and_then(|thumbs| {
            ["maxres", "high", "medium", "default"]
                .iter()
                .find_map(|size| thumbs.get(*size).and_then(|t| t.url.clone()))
        });

        Ok(VideoMetadata {
            video_id: id,
            title: snippet.title,
            channel_title: snippet.channel_title,
            published_at: snippet.published_at.as_deref().and_then(parse_rfc3339),
            description: snippet.description,
            view_count: parse_counter(statistics.view_count),
            like_count: parse_counter(statistics.like_count),
            comment_count: parse_counter(statistics.comment_count),
            thumbnail_url,
        })
    }
}

fn parse_rfc3339(time_str: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(time_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_counter(raw: Option<String>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse().ok())
}

// Videos API response structures

#[derive(Debug, Deserialize)]
struct VideosResponse {
    items: Option<Vec<VideoResource>>,
}

#[derive(Debug, Deserialize)]
struct VideoResource {
    id: Option<String>,
    snippet: Option<VideoSnippet>,
    statistics: Option<VideoStatistics>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: Option<String>,
    channel_title: Option<String>,
    published_at: Option<String>,
    description: Option<String>,
    thumbnails: Option<HashMap<String, Thumbnail>>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_video_metadata() {
        let json = r#"{
            "items": [{
                "id": "dQw4w9WgXcQ",
                "snippet": {
                    "title": "Sample video",
                    "channelTitle": "Sample channel",
                    "publishedAt": "2009-10-25T06:57:33Z",
                    "description": "desc",
                    "thumbnails": {
                        "default": {"url": "https://i.ytimg.com/vi/x/default.jpg"},
                        "high": {"url": "https://i.ytimg.com/vi/x/hqdefault.jpg"}
                    }
                },
                "statistics": {
                    "viewCount": "1500000000",
                    "likeCount": "17000000",
                    "commentCount": "2300000"
                }
            }]
        }"#;

        let meta = VideoMetadataAdapter.parse(json).unwrap();
        assert_eq!(meta.video_id, "dQw4w9WgXcQ");
        assert_eq!(meta.title.as_deref(), Some("Sample video"));
        assert_eq!(meta.channel_title.as_deref(), Some("Sample channel"));
        assert_eq!(meta.view_count, Some(1_500_000_000));
        assert_eq!(meta.like_count, Some(17_000_000));
        assert_eq!(meta.comment_count, Some(2_300_000));
        assert_eq!(
            meta.thumbnail_url.as_deref(),
            Some("https://i.ytimg.com/vi/x/hqdefault.jpg")
        );
        assert!(meta.published_at.is_some());
    }

    #[test]
    fn test_hidden_counters_stay_none() {
        let json = r#"{"items": [{"id": "abc", "statistics": {"viewCount": "10"}}]}"#;
        let meta = VideoMetadataAdapter.parse(json).unwrap();
        assert_eq!(meta.view_count, Some(10));
        assert_eq!(meta.like_count, None);
        assert_eq!(meta.title, None);
    }

    #[test]
    fn test_missing_video() {
        let result = VideoMetadataAdapter.parse(r#"{"items": []}"#);
        assert!(matches!(result, Err(ComputeError::MissingField(_))));
    }
}
