//! Conversion of encoded media payloads into renderable references.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

/// Public sample video served when a reel payload cannot be recognized.
/// Playback is never blocked on malformed input; callers that need to
/// distinguish real content use [`materialize_video`] directly.
pub const FALLBACK_VIDEO_URL: &str =
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4";

const IMAGE_DATA_URI_PREFIX: &str = "data:image/";
const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("unrecognized media payload format")]
    UnrecognizedFormat,

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("failed to write media file: {0}")]
    Io(#[from] std::io::Error),
}

/// A media reference the player layer can consume directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalMedia {
    /// A remote (or file://) URL played as-is
    RemoteUrl(String),
    /// A decoded payload written under the cache directory; owned by the
    /// slot that created it and deleted when superseded
    LocalFile(PathBuf),
}

impl LocalMedia {
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            LocalMedia::LocalFile(path) => Some(path),
            LocalMedia::RemoteUrl(_) => None,
        }
    }
}

/// Turn an image payload into something an image view can render.
/// Already-prefixed data URIs pass through unchanged; raw base64 gets the
/// JPEG data-URI prefix.
pub fn materialize_image(input: &str) -> String {
    if input.starts_with(IMAGE_DATA_URI_PREFIX) {
        input.to_string()
    } else {
        format!("{}{}", JPEG_DATA_URI_PREFIX, input)
    }
}

/// Materialize a video payload for playback.
///
/// URLs pass through; `data:` URIs and raw base64 are decoded into
/// `<cache_dir>/temp_video_<dest_id>_<timestamp>.mp4`. Anything else is
/// an [`MediaError::UnrecognizedFormat`], so callers can tell real
/// content from the fallback placeholder.
pub async fn materialize_video(
    input: &str,
    dest_id: &str,
    cache_dir: &Path,
) -> Result<LocalMedia, MediaError> {
    let input = input.trim();

    if input.starts_with("http://") || input.starts_with("https://") || input.starts_with("file://")
    {
        return Ok(LocalMedia::RemoteUrl(input.to_string()));
    }

    let encoded = if let Some(rest) = input.strip_prefix("data:") {
        match rest.split_once(";base64,") {
            Some((_mime, payload)) => payload,
            None => return Err(MediaError::UnrecognizedFormat),
        }
    } else if looks_like_base64(input) {
        input
    } else {
        return Err(MediaError::UnrecognizedFormat);
    };

    let bytes = STANDARD.decode(encoded.as_bytes())?;

    tokio::fs::create_dir_all(cache_dir).await?;
    let path = temp_video_path(cache_dir, dest_id);
    tokio::fs::write(&path, &bytes).await?;
    debug!(dest_id = dest_id, bytes = bytes.len(), path = %path.display(), "Materialized video");

    Ok(LocalMedia::LocalFile(path))
}

/// Materialize a video payload, substituting the public sample video when
/// the payload cannot be used. This is the never-block-playback policy;
/// the substitution is logged rather than silent.
pub async fn materialize_video_or_fallback(
    input: &str,
    dest_id: &str,
    cache_dir: &Path,
) -> LocalMedia {
    match materialize_video(input, dest_id, cache_dir).await {
        Ok(media) => media,
        Err(err) => {
            warn!(dest_id = dest_id, error = %err, "Video materialization failed, using fallback");
            LocalMedia::RemoteUrl(FALLBACK_VIDEO_URL.to_string())
        }
    }
}

pub(crate) fn temp_video_path(cache_dir: &Path, dest_id: &str) -> PathBuf {
    cache_dir.join(format!(
        "temp_video_{}_{}.mp4",
        dest_id,
        Utc::now().timestamp_millis()
    ))
}

fn looks_like_base64(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=' | '\r' | '\n'))
}
