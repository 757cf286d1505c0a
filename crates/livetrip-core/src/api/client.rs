//! API client for communicating with the vocabulary REST service.
//!
//! This module provides the `ApiClient` struct for fetching and committing
//! option lists, and the `RemoteOptions` trait the option store depends on.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Serialize;
use tracing::debug;

use crate::models::{Category, SelectOption, StoredEntry};
use crate::options::SortMode;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default base URL when none is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

/// HTTP request timeout in seconds.
/// Reads fall back to the device cache on timeout, so keep this short.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// The authoritative store for option lists.
#[async_trait]
pub trait RemoteOptions: Send + Sync {
    /// Fetch the stored list for `category`. An empty list means the remote
    /// has nothing saved yet.
    async fn fetch_options(&self, category: Category) -> Result<Vec<SelectOption>, ApiError>;

    /// Replace the stored list for `category`.
    async fn save_options(
        &self,
        category: Category,
        options: &[SelectOption],
        mode: SortMode,
    ) -> Result<(), ApiError>;
}

#[derive(Debug, Serialize)]
struct SaveRequest<'a> {
    options: &'a [SelectOption],
    sort_order: SortMode,
}

/// API client for the vocabulary service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    share_id: Option<String>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            share_id: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
            share_id: None,
        }
    }

    /// Create a read-only client for a shared view, sharing the connection pool.
    pub fn shared(&self, share_id: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: None,
            share_id: Some(share_id),
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.share_id.is_some()
    }

    /// Full URL of a category's list.
    pub fn options_url(&self, category: Category) -> String {
        match &self.share_id {
            Some(share_id) => format!("{}/share/{}/{}", self.base_url, share_id, category.remote_path()),
            None => format!("{}/{}", self.base_url, category.remote_path()),
        }
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::InvalidResponse(format!("Invalid token: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }
}

#[async_trait]
impl RemoteOptions for ApiClient {
    async fn fetch_options(&self, category: Category) -> Result<Vec<SelectOption>, ApiError> {
        let url = self.options_url(category);
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let text = response.text().await?;
        let entries: Vec<StoredEntry> = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse {}: {}", url, e)))?;

        debug!(%category, count = entries.len(), "Fetched options");
        Ok(entries.into_iter().map(StoredEntry::into_option).collect())
    }

    async fn save_options(
        &self,
        category: Category,
        options: &[SelectOption],
        mode: SortMode,
    ) -> Result<(), ApiError> {
        if self.is_read_only() {
            return Err(ApiError::ReadOnly);
        }

        let url = self.options_url(category);
        let payload = SaveRequest {
            options,
            sort_order: mode,
        };
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(&payload)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        debug!(%category, count = options.len(), status = %response.status(), "Saved options");
        Ok(())
    }
}
