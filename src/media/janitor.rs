//! Cleanup of materialized temp video files.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use super::materialize::{materialize_video, LocalMedia, MediaError};

/// Deletes materialized temp files. Deletion is idempotent: a path that
/// is already gone is not an error. Paths outside the cache directory are
/// never touched.
#[derive(Debug, Clone)]
pub struct Janitor {
    cache_dir: PathBuf,
}

impl Janitor {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn cleanup(&self, paths: &[PathBuf]) {
        for path in paths {
            self.remove(path);
        }
    }

    fn remove(&self, path: &Path) {
        // A `..` component would let a prefix-matching path resolve
        // outside the cache dir, so reject those outright
        let traverses_up = path.components().any(|c| matches!(c, Component::ParentDir));
        if traverses_up || !path.starts_with(&self.cache_dir) {
            warn!(path = %path.display(), "Refusing to delete file outside cache directory");
            return;
        }
        match std::fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "Deleted temp media file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to delete temp media file"),
        }
    }
}

/// One playback slot's materialized video. Holds at most one temp file at
/// a time: materializing a replacement deletes the previous file first,
/// and dropping the slot (screen unmount) deletes whatever is left.
pub struct VideoSlot {
    janitor: Janitor,
    current: Option<PathBuf>,
}

impl VideoSlot {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            janitor: Janitor::new(cache_dir),
            current: None,
        }
    }

    /// Path of the currently materialized file, if any
    pub fn current(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    /// Materialize a payload into this slot, releasing the previous temp
    /// file before the replacement is written.
    pub async fn materialize(
        &mut self,
        input: &str,
        dest_id: &str,
    ) -> Result<LocalMedia, MediaError> {
        self.release();
        let media = materialize_video(input, dest_id, self.janitor.cache_dir()).await?;
        if let LocalMedia::LocalFile(path) = &media {
            self.current = Some(path.clone());
        }
        Ok(media)
    }

    /// Delete the slot's temp file, if one exists
    pub fn release(&mut self) {
        if let Some(path) = self.current.take() {
            self.janitor.cleanup(&[path]);
        }
    }
}

impl Drop for VideoSlot {
    fn drop(&mut self) {
        self.release();
    }
}
