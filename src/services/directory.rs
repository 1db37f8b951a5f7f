use crate::core::resolver::{ProfileAccessor, StoreError};
use crate::models::{CandidateFilter, Profile};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the profile directory
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl From<DirectoryError> for StoreError {
    fn from(value: DirectoryError) -> Self {
        match value {
            DirectoryError::NotFound(msg) => StoreError::NotFound(msg),
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

/// HTTP client for the platform profile directory.
///
/// The directory owns all profile data; this core only reads snapshots
/// from it: `get_profile` for direct lookups and `list_candidates` for
/// seeking-flag-filtered pools.
pub struct DirectoryClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl DirectoryClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            client,
        }
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<Profile, DirectoryError> {
        let url = format!(
            "{}/profiles/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(user_id)
        );

        tracing::debug!("Fetching profile for user: {}", user_id);

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(DirectoryError::NotFound(format!(
                "Profile not found for user {}",
                user_id
            )));
        }
        if !response.status().is_success() {
            return Err(DirectoryError::ApiError(format!(
                "Failed to fetch profile: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        serde_json::from_value(json)
            .map_err(|e| DirectoryError::InvalidResponse(format!("Failed to parse profile: {}", e)))
    }

    async fn fetch_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<Profile>, DirectoryError> {
        let exclude = filter.exclude_user_ids.join(",");
        let url = format!(
            "{}/profiles?seeking={}&limit={}&exclude={}",
            self.base_url.trim_end_matches('/'),
            filter.seeking.as_str(),
            filter.limit,
            urlencoding::encode(&exclude)
        );

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DirectoryError::ApiError(format!(
                "Failed to list candidates: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        let documents = json
            .get("profiles")
            .and_then(|d| d.as_array())
            .ok_or_else(|| DirectoryError::InvalidResponse("Missing profiles array".into()))?;

        // Profiles the directory returns malformed are skipped rather
        // than failing the whole listing
        let profiles: Vec<Profile> = documents
            .iter()
            .filter_map(|doc| serde_json::from_value(doc.clone()).ok())
            .filter(|p: &Profile| !filter.exclude_user_ids.contains(&p.user_id))
            .collect();

        tracing::debug!("Listed {} candidates", profiles.len());

        Ok(profiles)
    }
}

#[async_trait]
impl ProfileAccessor for DirectoryClient {
    async fn get_profile(&self, user_id: &str) -> Result<Profile, StoreError> {
        Ok(self.fetch_profile(user_id).await?)
    }

    async fn list_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Profile>, StoreError> {
        Ok(self.fetch_candidates(filter).await?)
    }
}
