//! gymcache - client data layer for a fitness marketplace app.
//!
//! This crate owns everything the screens share: the REST API client for
//! the marketplace backend (gyms, coaches, courses, reels, events,
//! payments), a bounded local cache with stale-while-revalidate loading,
//! base64 media materialization with temp-file cleanup, and the persisted
//! session fields (user id, name, phone, photo, email).
//!
//! Screens construct an [`ApiConfig`] once at startup, build an
//! [`ApiClient`] and [`ResourceLoader`] from it, and inject a
//! [`SessionContext`] instead of reading storage keys ad hoc.

pub mod api;
pub mod cache;
pub mod config;
pub mod media;
pub mod models;
pub mod session;

pub use api::{ApiClient, ApiError, Storefront};
pub use cache::{CachedResource, Loaded, ResourceCache, ResourceLoader, Source};
pub use config::ApiConfig;
pub use media::{Janitor, LocalMedia, MediaError, VideoSlot};
pub use session::{SessionContext, SessionField, SessionFields, SessionStore};
