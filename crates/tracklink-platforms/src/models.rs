// SPDX-License-Identifier: GPL-3.0-or-later

use serde::Deserialize;

/// Raw track payload as returned by a platform API: decoded, but not yet
/// normalized into a [`tracklink_domain::TrackIdentity`]. Tagged by platform
/// so downstream code can switch exhaustively instead of dispatching on
/// strings.
#[derive(Debug, Clone)]
pub enum RawTrack {
    Spotify(SpotifyTrack),
    AppleMusic(AppleMusicSong),
}

impl RawTrack {
    /// Platform-assigned catalog identifier of the underlying track.
    pub fn id(&self) -> &str {
        match self {
            RawTrack::Spotify(track) => &track.id,
            RawTrack::AppleMusic(song) => &song.id,
        }
    }
}

/// Track object from the Spotify Web API.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrack {
    pub id: String,
    /// Track title.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    #[serde(default)]
    pub external_ids: SpotifyExternalIds,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtist {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotifyExternalIds {
    pub isrc: Option<String>,
}

/// Envelope for Spotify search responses (`GET /v1/search?type=track`).
#[derive(Debug, Deserialize)]
pub struct SpotifySearchResponse {
    #[serde(default)]
    pub tracks: SpotifyTrackPage,
}

#[derive(Debug, Default, Deserialize)]
pub struct SpotifyTrackPage {
    #[serde(default)]
    pub items: Vec<SpotifyTrack>,
}

/// Song resource from the Apple Music catalog API.
#[derive(Debug, Clone, Deserialize)]
pub struct AppleMusicSong {
    pub id: String,
    /// Absent for some resource relationships; treated as an empty identity
    /// during normalization.
    pub attributes: Option<AppleMusicAttributes>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppleMusicAttributes {
    /// Track title.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artist_name: String,
    pub isrc: Option<String>,
}

/// Envelope for Apple Music catalog lookups and ISRC-filtered song queries.
#[derive(Debug, Default, Deserialize)]
pub struct AppleMusicDocument {
    #[serde(default)]
    pub data: Vec<AppleMusicSong>,
}

/// Envelope for Apple Music catalog search (`GET /v1/catalog/{sf}/search`).
#[derive(Debug, Deserialize)]
pub struct AppleMusicSearchResponse {
    #[serde(default)]
    pub results: AppleMusicSearchResults,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppleMusicSearchResults {
    /// Absent entirely when the search matched no songs.
    pub songs: Option<AppleMusicDocument>,
}
