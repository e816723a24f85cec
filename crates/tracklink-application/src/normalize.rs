// SPDX-License-Identifier: GPL-3.0-or-later

//! Extraction of a uniform track identity from platform-specific payloads.

use tracklink_domain::TrackIdentity;
use tracklink_platforms::RawTrack;

/// Collapse a platform-specific payload into the `(title, artist, isrc)`
/// triple the matcher compares. Missing optional fields become empty strings
/// or `None` rather than errors; only the first credited artist is kept.
pub fn normalize(raw: &RawTrack) -> TrackIdentity {
    match raw {
        RawTrack::Spotify(track) => TrackIdentity {
            title: track.name.clone(),
            artist: track
                .artists
                .first()
                .map(|artist| artist.name.clone())
                .unwrap_or_default(),
            isrc: track.external_ids.isrc.clone(),
        },
        RawTrack::AppleMusic(song) => match &song.attributes {
            Some(attributes) => TrackIdentity {
                title: attributes.name.clone(),
                artist: attributes.artist_name.clone(),
                isrc: attributes.isrc.clone(),
            },
            None => TrackIdentity {
                title: String::new(),
                artist: String::new(),
                isrc: None,
            },
        },
    }
}
