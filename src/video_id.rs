//! Video identifier handling

use crate::error::ComputeError;

const MAX_VIDEO_ID_LEN: usize = 128;

/// Extract a video identifier from a YouTube URL or a bare id.
///
/// Supports `watch?v=`, `youtu.be/`, `/shorts/` and `/embed/` forms.
pub fn extract_video_id(input: &str) -> Result<String, ComputeError> {
    let input = input.trim();

    let raw_id = if let Some(v_param) = query_param(input, "v") {
        v_param
    } else if let Some(rest) = ["youtu.be/", "/shorts/", "/embed/"]
        .iter()
        .find_map(|marker| input.split(marker).nth(1))
    {
        rest.split(['?', '/', '#']).next().unwrap_or(rest)
    } else {
        input
    };

    sanitize_video_id(raw_id)
}

/// Value of the query parameter whose key is exactly `key`
fn query_param<'a>(url: &'a str, key: &str) -> Option<&'a str> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then_some(v)
    })
}

/// Ensure a video identifier only holds ASCII alphanumerics, `_` and `-`.
pub fn sanitize_video_id(raw: &str) -> Result<String, ComputeError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ComputeError::InvalidVideoId(
            "video id cannot be empty".to_string(),
        ));
    }

    if trimmed.len() > MAX_VIDEO_ID_LEN {
        return Err(ComputeError::InvalidVideoId(
            "video id is unexpectedly long".to_string(),
        ));
    }

    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
    {
        return Err(ComputeError::InvalidVideoId(format!(
            "'{trimmed}' contains unsupported characters; expected only letters, numbers, '-' or '_'"
        )));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_forms() {
        for input in [
            "dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
            "https://youtu.be/dQw4w9WgXcQ?si=abc",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
        ] {
            assert_eq!(extract_video_id(input).unwrap(), "dQw4w9WgXcQ", "{input}");
        }
    }

    #[test]
    fn test_only_the_v_key_selects_the_id() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ?rev=1").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?dev=1&v=dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?nav=2#t=10").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_rejects_bad_ids() {
        assert!(sanitize_video_id("").is_err());
        assert!(sanitize_video_id("../etc/passwd").is_err());
        assert!(sanitize_video_id(&"a".repeat(MAX_VIDEO_ID_LEN + 1)).is_err());
        assert!(extract_video_id("https://example.com/not a video").is_err());
    }
}
