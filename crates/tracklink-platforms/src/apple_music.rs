// SPDX-License-Identifier: GPL-3.0-or-later

use crate::client::{PlatformClient, SEARCH_CANDIDATE_LIMIT};
use crate::error::{PlatformError, Result};
use crate::models::{AppleMusicDocument, AppleMusicSearchResponse, RawTrack};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use tracklink_domain::Platform;

const APPLE_MUSIC_API_BASE: &str = "https://api.music.apple.com";
const DEFAULT_STOREFRONT: &str = "us";
const USER_AGENT: &str = concat!("tracklink/", env!("CARGO_PKG_VERSION"));

/// Apple Music catalog API client authenticating with a static developer
/// token.
///
/// A static token cannot be refreshed, so a 401 surfaces
/// [`PlatformError::Auth`] immediately (still within the at-most-one-retry
/// contract of [`PlatformClient`]).
#[derive(Debug, Clone)]
pub struct AppleMusicClient {
    client: Client,
    developer_token: String,
    base_url: String,
    storefront: String,
}

impl AppleMusicClient {
    /// Create a client with the default base URL and storefront.
    pub fn new(developer_token: impl Into<String>) -> Result<Self> {
        Self::builder().build(developer_token)
    }

    /// Create a client builder for custom configuration.
    pub fn builder() -> AppleMusicClientBuilder {
        AppleMusicClientBuilder::default()
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.developer_token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        debug!(target: "apple_music", "GET {} -> {}", url, status);

        if status == StatusCode::UNAUTHORIZED {
            return Err(PlatformError::Auth(
                "developer token rejected".to_string(),
            ));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(PlatformError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PlatformError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<T>().await.map_err(|e| {
            PlatformError::MalformedResponse(format!(
                "failed to parse Apple Music response: {}",
                e
            ))
        })
    }
}

#[async_trait]
impl PlatformClient for AppleMusicClient {
    fn platform(&self) -> Platform {
        Platform::AppleMusic
    }

    async fn fetch_by_id(&self, track_id: &str) -> Result<RawTrack> {
        let url = format!(
            "{}/v1/catalog/{}/songs/{}",
            self.base_url, self.storefront, track_id
        );
        let document: AppleMusicDocument = self.get_json(&url, &[]).await?;

        let song = document.data.into_iter().next().ok_or_else(|| {
            PlatformError::MalformedResponse(
                "No track data found in Apple Music response".to_string(),
            )
        })?;

        Ok(RawTrack::AppleMusic(song))
    }

    async fn search_by_isrc(&self, isrc: &str) -> Result<Vec<RawTrack>> {
        let url = format!("{}/v1/catalog/{}/songs", self.base_url, self.storefront);
        let document: AppleMusicDocument =
            self.get_json(&url, &[("filter[isrc]", isrc)]).await?;

        Ok(document
            .data
            .into_iter()
            .map(RawTrack::AppleMusic)
            .collect())
    }

    async fn search_by_metadata(&self, title: &str, artist: &str) -> Result<Vec<RawTrack>> {
        let url = format!("{}/v1/catalog/{}/search", self.base_url, self.storefront);
        let term = format!("{} {}", title, artist);
        let limit = SEARCH_CANDIDATE_LIMIT.to_string();
        let response: AppleMusicSearchResponse = self
            .get_json(
                &url,
                &[
                    ("term", term.as_str()),
                    ("types", "songs"),
                    ("limit", limit.as_str()),
                ],
            )
            .await?;

        Ok(response
            .results
            .songs
            .map(|document| document.data)
            .unwrap_or_default()
            .into_iter()
            .map(RawTrack::AppleMusic)
            .collect())
    }
}

/// Builder for configuring an Apple Music client.
#[derive(Debug)]
pub struct AppleMusicClientBuilder {
    base_url: String,
    storefront: String,
    timeout: Duration,
}

impl Default for AppleMusicClientBuilder {
    fn default() -> Self {
        Self {
            base_url: APPLE_MUSIC_API_BASE.to_string(),
            storefront: DEFAULT_STOREFRONT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl AppleMusicClientBuilder {
    /// Set a custom API base URL (useful for testing with mock servers).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the catalog storefront (default: `us`).
    pub fn storefront(mut self, storefront: impl Into<String>) -> Self {
        self.storefront = storefront.into();
        self
    }

    /// Set request timeout duration.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the Apple Music client.
    pub fn build(self, developer_token: impl Into<String>) -> Result<AppleMusicClient> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(AppleMusicClient {
            client,
            developer_token: developer_token.into(),
            base_url: self.base_url,
            storefront: self.storefront,
        })
    }
}
