//! Upload validation and the display metadata set when a bout is created.

use crate::error::CoreError;
use crate::types::Timestamp;

/// Label used when the uploader gives no opponent name.
pub const DEFAULT_OPPONENT: &str = "Unknown Opponent";

/// Maximum opponent label length, in characters.
pub const MAX_OPPONENT_LENGTH: usize = 120;

/// Accept only `video/*` MIME types.
pub fn validate_media_type(content_type: &str) -> Result<(), CoreError> {
    let is_video = content_type
        .trim()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("video/"));
    if !is_video {
        return Err(CoreError::Validation(
            "Please select a video file".to_string(),
        ));
    }
    Ok(())
}

/// Reject empty uploads and uploads larger than `max_bytes`.
pub fn validate_media_size(len: usize, max_bytes: usize) -> Result<(), CoreError> {
    if len == 0 {
        return Err(CoreError::Validation("Uploaded video is empty".to_string()));
    }
    if len > max_bytes {
        return Err(CoreError::Validation(format!(
            "Uploaded video is {len} bytes, maximum is {max_bytes}"
        )));
    }
    Ok(())
}

/// Trim the opponent label, falling back to [`DEFAULT_OPPONENT`] when blank.
pub fn normalize_opponent(opponent: Option<&str>) -> Result<String, CoreError> {
    let trimmed = opponent.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Ok(DEFAULT_OPPONENT.to_string());
    }
    let len = trimmed.chars().count();
    if len > MAX_OPPONENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "opponent name is {len} characters, maximum is {MAX_OPPONENT_LENGTH}"
        )));
    }
    Ok(trimmed.to_string())
}

/// Bout date as shown in headers, e.g. `Mar 15, 2025`.
pub fn display_date(at: Timestamp) -> String {
    at.format("%b %-d, %Y").to_string()
}
