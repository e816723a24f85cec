// SPDX-License-Identifier: GPL-3.0-or-later

use crate::client::{PlatformClient, SEARCH_CANDIDATE_LIMIT};
use crate::error::{PlatformError, Result};
use crate::models::{RawTrack, SpotifySearchResponse, SpotifyTrack};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, trace};
use tracklink_domain::Platform;

const SPOTIFY_API_BASE: &str = "https://api.spotify.com";
const SPOTIFY_AUTH_BASE: &str = "https://accounts.spotify.com";
const USER_AGENT: &str = concat!("tracklink/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Spotify Web API client using the client-credentials OAuth flow.
///
/// The access token is acquired lazily and cached for the lifetime of the
/// client. A 401 on a catalog request invalidates the cached token and
/// triggers exactly one refresh-and-retry before surfacing
/// [`PlatformError::Auth`].
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    client: Client,
    client_id: String,
    client_secret: String,
    api_base_url: String,
    auth_base_url: String,
    token: Arc<Mutex<Option<String>>>,
}

impl SpotifyClient {
    /// Create a client with default base URLs.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
        Self::builder().build(client_id, client_secret)
    }

    /// Create a client builder for custom configuration.
    pub fn builder() -> SpotifyClientBuilder {
        SpotifyClientBuilder::default()
    }

    /// Cached bearer token, requesting one if none is held yet.
    async fn token(&self) -> Result<String> {
        let mut token = self.token.lock().await;
        if let Some(cached) = token.as_ref() {
            return Ok(cached.clone());
        }

        let fresh = self.request_token().await?;
        *token = Some(fresh.clone());
        Ok(fresh)
    }

    /// Drop the cached token and request a new one.
    async fn refresh_token(&self) -> Result<String> {
        let mut token = self.token.lock().await;
        let fresh = self.request_token().await?;
        *token = Some(fresh.clone());
        Ok(fresh)
    }

    async fn request_token(&self) -> Result<String> {
        let url = format!("{}/api/token", self.auth_base_url);
        trace!(target: "spotify", "POST {}", url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PlatformError::Auth(format!(
                "token request failed with status {}: {}",
                status, message
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| PlatformError::Auth(format!("failed to parse token response: {}", e)))?;

        Ok(body.access_token)
    }

    /// Bearer-authenticated GET with the single-retry-on-expired-token
    /// policy.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        let token = self.token().await?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&token)
            .query(query)
            .send()
            .await?;

        let response = if response.status() == StatusCode::UNAUTHORIZED {
            debug!(target: "spotify", "access token rejected, refreshing once");
            let token = self.refresh_token().await?;
            self.client
                .get(url)
                .bearer_auth(&token)
                .query(query)
                .send()
                .await?
        } else {
            response
        };

        let status = response.status();
        debug!(target: "spotify", "GET {} -> {}", url, status);

        if status == StatusCode::UNAUTHORIZED {
            return Err(PlatformError::Auth(
                "access token rejected after refresh".to_string(),
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
            PlatformError::MalformedResponse(format!("failed to parse Spotify response: {}", e))
        })
    }
}

#[async_trait]
impl PlatformClient for SpotifyClient {
    fn platform(&self) -> Platform {
        Platform::Spotify
    }

    async fn fetch_by_id(&self, track_id: &str) -> Result<RawTrack> {
        let url = format!("{}/v1/tracks/{}", self.api_base_url, track_id);
        let track: SpotifyTrack = self.get_json(&url, &[]).await?;
        Ok(RawTrack::Spotify(track))
    }

    async fn search_by_isrc(&self, isrc: &str) -> Result<Vec<RawTrack>> {
        let url = format!("{}/v1/search", self.api_base_url);
        let query = format!("isrc:{}", isrc);
        let response: SpotifySearchResponse = self
            .get_json(&url, &[("q", query.as_str()), ("type", "track"), ("limit", "1")])
            .await?;

        Ok(response
            .tracks
            .items
            .into_iter()
            .map(RawTrack::Spotify)
            .collect())
    }

    async fn search_by_metadata(&self, title: &str, artist: &str) -> Result<Vec<RawTrack>> {
        let url = format!("{}/v1/search", self.api_base_url);
        let query = format!("track:{} artist:{}", title, artist);
        let limit = SEARCH_CANDIDATE_LIMIT.to_string();
        let response: SpotifySearchResponse = self
            .get_json(
                &url,
                &[
                    ("q", query.as_str()),
                    ("type", "track"),
                    ("limit", limit.as_str()),
                ],
            )
            .await?;

        Ok(response
            .tracks
            .items
            .into_iter()
            .map(RawTrack::Spotify)
            .collect())
    }
}

/// Builder for configuring a Spotify client.
#[derive(Debug)]
pub struct SpotifyClientBuilder {
    api_base_url: String,
    auth_base_url: String,
    timeout: Duration,
}

impl Default for SpotifyClientBuilder {
    fn default() -> Self {
        Self {
            api_base_url: SPOTIFY_API_BASE.to_string(),
            auth_base_url: SPOTIFY_AUTH_BASE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl SpotifyClientBuilder {
    /// Set a custom catalog API base URL (useful for testing with mock
    /// servers).
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set a custom token endpoint base URL (useful for testing).
    pub fn auth_base_url(mut self, url: impl Into<String>) -> Self {
        self.auth_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout duration.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the Spotify client.
    pub fn build(
        self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<SpotifyClient> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(SpotifyClient {
            client,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_base_url: self.api_base_url,
            auth_base_url: self.auth_base_url,
            token: Arc::new(Mutex::new(None)),
        })
    }
}
