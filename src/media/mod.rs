//! Media materialization for base64 payloads from the backend.
//!
//! Thumbnails and profile photos arrive as base64 and become data URIs
//! the image layer renders directly. Reel video is larger: base64
//! payloads are decoded into temp files under the cache directory, and
//! the `Janitor`/`VideoSlot` pair deletes them when a reel is replaced
//! or its screen goes away, so storage stays bounded.

pub mod janitor;
pub mod materialize;

pub use janitor::{Janitor, VideoSlot};
pub use materialize::{
    materialize_image, materialize_video, materialize_video_or_fallback, LocalMedia, MediaError,
    FALLBACK_VIDEO_URL,
};
