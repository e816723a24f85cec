// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::Result;
use crate::models::RawTrack;
use async_trait::async_trait;
use tracklink_domain::Platform;

/// Maximum number of candidates requested from a metadata search. Keeps the
/// per-resolution scoring cost bounded.
pub const SEARCH_CANDIDATE_LIMIT: usize = 5;

/// Capability interface implemented once per streaming platform.
///
/// Implementations are pure I/O adapters: they authenticate, fetch, and
/// decode, but carry no matching logic. An implementation may transparently
/// refresh an expired credential and retry a request exactly once before
/// surfacing [`crate::PlatformError::Auth`].
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// The platform this client talks to.
    fn platform(&self) -> Platform;

    /// Fetch a single track by its platform catalog id.
    async fn fetch_by_id(&self, track_id: &str) -> Result<RawTrack>;

    /// Search for tracks carrying the given ISRC. An empty list is a valid
    /// zero-candidate response, not an error.
    async fn search_by_isrc(&self, isrc: &str) -> Result<Vec<RawTrack>>;

    /// Free-text search by title and artist, bounded to
    /// [`SEARCH_CANDIDATE_LIMIT`] candidates.
    async fn search_by_metadata(&self, title: &str, artist: &str) -> Result<Vec<RawTrack>>;
}
