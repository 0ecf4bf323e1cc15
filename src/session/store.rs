//! Persistent key-value store for session fields.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Key for the liked-reels map (reel id -> liked)
const LIKED_REELS_KEY: &str = "likedReels";

/// Key for the recent-searches list. Not an identity field, so logout
/// leaves it in place.
const RECENT_SEARCHES_KEY: &str = "recentSearches";

/// Every key logout must clear
const ALL_KEYS: [&str; 6] = [
    "userId",
    "firstName",
    "phoneNumber",
    "userPhoto",
    "userEmail",
    LIKED_REELS_KEY,
];

/// The user identity fields threaded through nearly every screen.
/// Each field is independently optional; partial presence is normal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFields {
    pub user_id: Option<String>,
    pub first_name: Option<String>,
    pub phone_number: Option<String>,
    pub photo: Option<String>,
    pub email: Option<String>,
}

impl SessionFields {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.first_name.is_none()
            && self.phone_number.is_none()
            && self.photo.is_none()
            && self.email.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionField {
    UserId,
    FirstName,
    PhoneNumber,
    Photo,
    Email,
}

impl SessionField {
    /// Storage key for this field
    pub fn key(self) -> &'static str {
        match self {
            SessionField::UserId => "userId",
            SessionField::FirstName => "firstName",
            SessionField::PhoneNumber => "phoneNumber",
            SessionField::Photo => "userPhoto",
            SessionField::Email => "userEmail",
        }
    }
}

/// Flat per-key persistent store. Each field lives under its own file,
/// so a write touches exactly one key and reads tolerate any subset
/// being present.
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create session directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn read_key(&self, key: &str) -> Option<String> {
        let contents = std::fs::read_to_string(self.key_path(key)).ok()?;
        // An unreadable entry counts as absent
        serde_json::from_str(&contents).ok()
    }

    fn write_key(&self, key: &str, value: &str) -> Result<()> {
        let contents = serde_json::to_string(value)?;
        std::fs::write(self.key_path(key), contents)
            .with_context(|| format!("Failed to write session key {}", key))?;
        Ok(())
    }

    /// Read every identity field, tolerating partial presence.
    pub fn read_all(&self) -> SessionFields {
        SessionFields {
            user_id: self.read_key(SessionField::UserId.key()),
            first_name: self.read_key(SessionField::FirstName.key()),
            phone_number: self.read_key(SessionField::PhoneNumber.key()),
            photo: self.read_key(SessionField::Photo.key()),
            email: self.read_key(SessionField::Email.key()),
        }
    }

    /// Write one field. There is no cross-field transaction; a partial
    /// update leaves the other keys untouched.
    pub fn write_field(&self, field: SessionField, value: &str) -> Result<()> {
        self.write_key(field.key(), value)
    }

    pub fn liked_reels(&self) -> HashMap<String, bool> {
        let Some(contents) = std::fs::read_to_string(self.key_path(LIKED_REELS_KEY)).ok() else {
            return HashMap::new();
        };
        serde_json::from_str(&contents).unwrap_or_default()
    }

    pub fn set_liked_reels(&self, liked: &HashMap<String, bool>) -> Result<()> {
        let contents = serde_json::to_string(liked)?;
        std::fs::write(self.key_path(LIKED_REELS_KEY), contents)
            .context("Failed to write liked reels")?;
        Ok(())
    }

    pub fn recent_searches(&self) -> Vec<String> {
        let Some(contents) = std::fs::read_to_string(self.key_path(RECENT_SEARCHES_KEY)).ok()
        else {
            return Vec::new();
        };
        serde_json::from_str(&contents).unwrap_or_default()
    }

    pub fn set_recent_searches(&self, searches: &[String]) -> Result<()> {
        let contents = serde_json::to_string(searches)?;
        std::fs::write(self.key_path(RECENT_SEARCHES_KEY), contents)
            .context("Failed to write recent searches")?;
        Ok(())
    }

    /// Logout: remove every known key. Keys that are already absent are
    /// skipped without error.
    pub fn clear_all(&self) -> Result<()> {
        for key in ALL_KEYS {
            let path = self.key_path(key);
            match std::fs::remove_file(&path) {
                Ok(()) => debug!(key = key, "Cleared session key"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to clear session key {}", key))
                }
            }
        }
        Ok(())
    }
}
