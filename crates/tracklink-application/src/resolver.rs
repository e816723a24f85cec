// SPDX-License-Identifier: GPL-3.0-or-later

//! Cross-platform track resolution engine.
//!
//! Resolution walks an ordered chain of strategies, each short-circuiting:
//! 1. Cache lookup (no network, positive or negative)
//! 2. ISRC search on the target catalog (exact cross-catalog key)
//! 3. Fuzzy metadata search scored against a confidence threshold
//!
//! Every outcome is reported as a [`MatchResult`]; platform failures are
//! captured in the result rather than surfaced as errors to the caller.

use crate::cache::{CacheEntry, ResolutionCache};
use crate::normalize::normalize;
use crate::similarity::similarity;
use crate::urls::{self, UrlError};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracklink_domain::{MatchCandidate, MatchMethod, MatchResult, Platform, TrackIdentity};
use tracklink_platforms::{PlatformClient, RawTrack};

/// Default minimum combined similarity required to accept a fuzzy metadata
/// match. A candidate is accepted only when its score is strictly greater.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.8;

const NO_MATCH_ERROR: &str = "No suitable match found";

/// Resolves a track on one platform to its equivalent on the other.
///
/// Holds one client per platform behind an explicit mapping (the two-platform
/// model is exhaustively checkable) plus the process-lifetime result cache.
pub struct TrackResolver {
    spotify: Arc<dyn PlatformClient>,
    apple_music: Arc<dyn PlatformClient>,
    cache: ResolutionCache,
    confidence_threshold: f64,
}

impl TrackResolver {
    pub fn new(spotify: Arc<dyn PlatformClient>, apple_music: Arc<dyn PlatformClient>) -> Self {
        Self {
            spotify,
            apple_music,
            cache: ResolutionCache::new(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }

    /// Override the confidence threshold for fuzzy metadata matches.
    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    fn client_for(&self, platform: Platform) -> &dyn PlatformClient {
        match platform {
            Platform::Spotify => self.spotify.as_ref(),
            Platform::AppleMusic => self.apple_music.as_ref(),
        }
    }

    /// Resolve a track identified by `(source_platform, source_id)` to the
    /// opposite platform. Never returns an error: failures are captured in
    /// the returned [`MatchResult`].
    pub async fn resolve(&self, source_platform: Platform, source_id: &str) -> MatchResult {
        let target_platform = source_platform.other();

        // Cache: positive and negative entries both short-circuit without
        // touching the network.
        if let Some(entry) = self.cache.get(source_platform, source_id).await {
            return match entry {
                CacheEntry::Match(target_id) => {
                    debug!(
                        target: "resolver",
                        source = %source_platform,
                        source_id,
                        target_id = %target_id,
                        "cache hit"
                    );
                    let target_url = urls::share_url(target_platform, &target_id);
                    MatchResult::matched(
                        source_platform,
                        source_id,
                        target_id,
                        target_url,
                        MatchMethod::Cache,
                        None,
                    )
                }
                CacheEntry::NoMatch => {
                    debug!(
                        target: "resolver",
                        source = %source_platform,
                        source_id,
                        "negative cache hit"
                    );
                    MatchResult::not_matched(
                        source_platform,
                        source_id,
                        Some(MatchMethod::Cache),
                        NO_MATCH_ERROR,
                    )
                }
            };
        }

        // Fetch and normalize the source track. A failure here is transient
        // as far as the cache is concerned, so nothing is written.
        let source = match self.client_for(source_platform).fetch_by_id(source_id).await {
            Ok(raw) => normalize(&raw),
            Err(error) => {
                warn!(
                    target: "resolver",
                    source = %source_platform,
                    source_id,
                    error = %error,
                    "source fetch failed"
                );
                return MatchResult::not_matched(
                    source_platform,
                    source_id,
                    None,
                    error.to_string(),
                );
            }
        };

        info!(
            target: "resolver",
            source = %source_platform,
            source_id,
            title = %source.title,
            artist = %source.artist,
            isrc = source.isrc.as_deref().unwrap_or("none"),
            "resolved source identity"
        );

        // ISRC attempt: the first hit is accepted unconditionally, ISRC being
        // treated as an exact cross-catalog key. A search error falls through
        // to the metadata attempt; a degraded exact-key path must not block
        // the slower positive path.
        if let Some(isrc) = source.isrc.as_deref() {
            match self.client_for(target_platform).search_by_isrc(isrc).await {
                Ok(candidates) => {
                    if let Some(candidate) = candidates.into_iter().next() {
                        let target_id = candidate.id().to_string();
                        info!(
                            target: "resolver",
                            source_id,
                            target_id = %target_id,
                            isrc,
                            "ISRC match"
                        );
                        self.cache
                            .insert(
                                source_platform,
                                source_id,
                                CacheEntry::Match(target_id.clone()),
                            )
                            .await;
                        let target_url = urls::share_url(target_platform, &target_id);
                        return MatchResult::matched(
                            source_platform,
                            source_id,
                            target_id,
                            target_url,
                            MatchMethod::IsrcMatch,
                            None,
                        );
                    }
                    debug!(
                        target: "resolver",
                        isrc,
                        "no ISRC candidates, falling back to metadata search"
                    );
                }
                Err(error) => {
                    warn!(
                        target: "resolver",
                        isrc,
                        error = %error,
                        "ISRC search failed, falling back to metadata search"
                    );
                }
            }
        }

        // Metadata attempt: the last fallback, so a search failure here
        // terminates the resolution.
        if !source.title.is_empty() && !source.artist.is_empty() {
            let candidates = match self
                .client_for(target_platform)
                .search_by_metadata(&source.title, &source.artist)
                .await
            {
                Ok(candidates) => candidates,
                Err(error) => {
                    warn!(
                        target: "resolver",
                        source_id,
                        error = %error,
                        "metadata search failed"
                    );
                    return MatchResult::not_matched(
                        source_platform,
                        source_id,
                        None,
                        format!("Metadata search failed: {}", error),
                    );
                }
            };

            if let Some(best) = best_candidate(&source, &candidates) {
                if best.score > self.confidence_threshold {
                    info!(
                        target: "resolver",
                        source_id,
                        target_id = %best.id,
                        score = best.score,
                        "metadata match"
                    );
                    self.cache
                        .insert(
                            source_platform,
                            source_id,
                            CacheEntry::Match(best.id.clone()),
                        )
                        .await;
                    let target_url = urls::share_url(target_platform, &best.id);
                    return MatchResult::matched(
                        source_platform,
                        source_id,
                        best.id,
                        target_url,
                        MatchMethod::MetadataMatch,
                        Some(best.score),
                    );
                }
                debug!(
                    target: "resolver",
                    score = best.score,
                    threshold = self.confidence_threshold,
                    "best candidate below confidence threshold"
                );
            }
        }

        // No match is a confident terminal outcome, worth caching, unlike a
        // transient fetch failure.
        self.cache
            .insert(source_platform, source_id, CacheEntry::NoMatch)
            .await;
        MatchResult::not_matched(source_platform, source_id, None, NO_MATCH_ERROR)
    }

    /// Resolve a track identified by a share URL.
    pub async fn resolve_url(&self, url: &str) -> Result<MatchResult, UrlError> {
        let (source_platform, source_id) = urls::parse_share_url(url)?;
        Ok(self.resolve(source_platform, &source_id).await)
    }

    /// Confirm that a successful result's target id still resolves on the
    /// target platform. Any failure reads as "not validated".
    pub async fn validate(&self, result: &MatchResult) -> bool {
        let Some(target_id) = result.target_id.as_deref() else {
            return false;
        };

        self.client_for(result.target_platform)
            .fetch_by_id(target_id)
            .await
            .is_ok()
    }
}

/// Highest-scoring candidate among the search results; ties keep the first
/// seen (strictly-greater comparison). Candidates missing a title or artist
/// are skipped.
fn best_candidate(source: &TrackIdentity, candidates: &[RawTrack]) -> Option<MatchCandidate> {
    let mut best: Option<MatchCandidate> = None;

    for raw in candidates {
        let identity = normalize(raw);
        if identity.title.is_empty() || identity.artist.is_empty() {
            continue;
        }

        let title_score = similarity(&source.title, &identity.title);
        let artist_score = similarity(&source.artist, &identity.artist);
        let score = (title_score + artist_score) / 2.0;

        debug!(
            target: "resolver",
            candidate_id = raw.id(),
            candidate_title = %identity.title,
            candidate_artist = %identity.artist,
            score,
            "scored metadata candidate"
        );

        if best.as_ref().map_or(true, |current| score > current.score) {
            best = Some(MatchCandidate {
                id: raw.id().to_string(),
                title: identity.title,
                artist: identity.artist,
                score,
            });
        }
    }

    best
}
