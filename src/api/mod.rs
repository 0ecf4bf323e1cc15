//! REST API client module for the marketplace backend.
//!
//! This module provides the `ApiClient` for fetching gyms, coaches,
//! courses, reels, and events, and for submitting payments and profile
//! updates. All endpoints speak plain JSON over a single configured
//! origin; there is no automatic retry - callers surface failures to the
//! user and re-trigger on demand.

pub mod client;
pub mod error;

pub use client::{ApiClient, Storefront};
pub use error::ApiError;
