//! API client for the marketplace backend.
//!
//! This module provides the `ApiClient` struct for fetching gym, coach,
//! course, reel, and event data, and for submitting payments and profile
//! updates.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::models::{
    Coach, Course, Event, Gym, PaymentRequest, PaymentResponse, Reel, UserUpdate,
};

use super::ApiError;

/// Gyms, coaches, and events for the storefront, fetched as one unit so
/// the first paint never shows a partially loaded screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Storefront {
    pub gyms: Vec<Gym>,
    pub coaches: Vec<Coach>,
    pub events: Vec<Event>,
}

/// API client for the marketplace backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client from the shared configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// GET a list endpoint with tolerant parsing: a direct array, a
    /// wrapper object, or an unparseable body (treated as empty).
    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;

        let text = response.text().await.map_err(ApiError::from)?;
        Ok(parse_list(&url, &text))
    }

    async fn post_form<T: DeserializeOwned, F: Serialize>(&self, path: &str, form: &F) -> Result<T> {
        let url = self.url(path);
        let response = self
            .client
            .post(&url)
            .form(form)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send form POST to {}", url))?;

        let response = Self::check_response(response).await?;

        response
            .json()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    // ===== Data Fetching Methods =====

    /// Fetch all gyms in the marketplace
    pub async fn fetch_gyms(&self) -> Result<Vec<Gym>> {
        self.get_list("/api/auth/gyms").await
    }

    /// Fetch all coaches in the marketplace
    pub async fn fetch_coaches(&self) -> Result<Vec<Coach>> {
        self.get_list("/api/auth/coaches").await
    }

    /// Fetch a coach's courses with their exercises embedded
    pub async fn fetch_coach_courses(&self, coach_id: i64) -> Result<Vec<Course>> {
        self.get_list(&format!("/api/courses/coach/{}/with-exercises", coach_id))
            .await
    }

    /// Fetch the courses a user has purchased.
    /// An empty list is a valid response, not an error.
    pub async fn fetch_purchased_courses(&self, user_id: i64) -> Result<Vec<Course>> {
        self.get_list(&format!("/api/courses/purchased?userId={}", user_id))
            .await
    }

    /// Fetch a course thumbnail as a base64 payload
    pub async fn fetch_course_thumbnail(&self, course_id: i64) -> Result<String> {
        let url = self.url(&format!("/api/courses/{}/thumbnail", course_id));
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;

        let text = response.text().await.map_err(ApiError::from)?;
        Ok(parse_media_payload(&text, "thumbnail"))
    }

    /// Fetch a user's reels
    pub async fn fetch_user_reels(&self, user_id: i64) -> Result<Vec<Reel>> {
        self.get_list(&format!("/api/reels/user/{}", user_id)).await
    }

    /// Fetch a reel's video payload: base64, a data URI, or a plain URL
    pub async fn fetch_reel_video(&self, reel_id: i64) -> Result<String> {
        let url = self.url(&format!("/api/reels/video/{}", reel_id));
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;

        let text = response.text().await.map_err(ApiError::from)?;
        Ok(parse_media_payload(&text, "video"))
    }

    /// Fetch upcoming events
    pub async fn fetch_events(&self) -> Result<Vec<Event>> {
        self.get_list("/api/events").await
    }

    /// Fetch everything the storefront needs in one joined call, so the
    /// screen renders either fully or not at all.
    pub async fn fetch_storefront(&self) -> Result<Storefront> {
        let (gyms, coaches, events) = futures::try_join!(
            self.fetch_gyms(),
            self.fetch_coaches(),
            self.fetch_events(),
        )?;

        debug!(
            gyms = gyms.len(),
            coaches = coaches.len(),
            events = events.len(),
            "Storefront fetched"
        );

        Ok(Storefront {
            gyms,
            coaches,
            events,
        })
    }

    /// Submit a payment. The backend expects form encoding here, unlike
    /// the JSON endpoints.
    pub async fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentResponse> {
        self.post_form("/api/payments/create-payment", request).await
    }

    /// Update the user's profile fields
    pub async fn update_user(&self, update: &UserUpdate) -> Result<()> {
        let url = self.url("/api/auth/modifier-user");
        let response = self
            .client
            .post(&url)
            .json(update)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        Self::check_response(response).await?;
        Ok(())
    }
}

/// Parse a list response. The backend usually returns a bare array but
/// some endpoints wrap it in an object; a body that parses as neither is
/// treated as empty rather than failing the screen.
fn parse_list<T: DeserializeOwned>(url: &str, text: &str) -> Vec<T> {
    if let Ok(items) = serde_json::from_str::<Vec<T>>(text) {
        return items;
    }

    #[derive(Deserialize)]
    #[serde(bound = "T: DeserializeOwned")]
    struct ListWrapper<T> {
        #[serde(default, alias = "items", alias = "content")]
        data: Vec<T>,
    }

    if let Ok(wrapper) = serde_json::from_str::<ListWrapper<T>>(text) {
        return wrapper.data;
    }

    warn!(url = url, "Unparseable list response, treating as empty");
    vec![]
}

/// Extract a media payload that arrives either as a JSON string, as an
/// object with a named field, or as the raw payload text itself.
fn parse_media_payload(text: &str, field: &str) -> String {
    if let Ok(s) = serde_json::from_str::<String>(text) {
        return s;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
        if let Some(s) = value.get(field).and_then(|v| v.as_str()) {
            return s.to_string();
        }
    }

    text.trim().to_string()
}
