// SPDX-License-Identifier: GPL-3.0-or-later

//! Share-link recognition and construction for both platforms.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tracklink_domain::Platform;

/// Error returned for a URL no recognizer accepts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("invalid or unsupported music URL: {0}")]
    InvalidUrl(String),
}

lazy_static! {
    static ref SPOTIFY_TRACK_REGEX: Regex =
        Regex::new(r"^https?://(?:open\.)?spotify\.com/track/([a-zA-Z0-9]+)")
            .expect("valid spotify track regex");
    // Apple Music link shapes, tried in order: album link carrying a song
    // fragment, album link, direct song link, music video link. The song id
    // in an `?i=` fragment takes precedence over the album id.
    static ref APPLE_MUSIC_REGEXES: Vec<Regex> = vec![
        Regex::new(r"^https?://music\.apple\.com/\w+/album/[^/]+/\d+\?i=(\d+)")
            .expect("valid apple album-with-song regex"),
        Regex::new(r"^https?://music\.apple\.com/\w+/album/[^/]+/(\d+)(?:\?i=\d+)?")
            .expect("valid apple album regex"),
        Regex::new(r"^https?://music\.apple\.com/\w+/song/(?:[^/?]+/)?(\d+)")
            .expect("valid apple song regex"),
        Regex::new(r"^https?://music\.apple\.com/\w+/music-video/(?:[^/?]+/)?(\d+)")
            .expect("valid apple music-video regex"),
    ];
}

/// Extract `(platform, track id)` from a share URL.
pub fn parse_share_url(url: &str) -> Result<(Platform, String), UrlError> {
    let url = url.trim();

    if let Some(captures) = SPOTIFY_TRACK_REGEX.captures(url) {
        return Ok((Platform::Spotify, captures[1].to_string()));
    }

    for pattern in APPLE_MUSIC_REGEXES.iter() {
        if let Some(captures) = pattern.captures(url) {
            return Ok((Platform::AppleMusic, captures[1].to_string()));
        }
    }

    Err(UrlError::InvalidUrl(url.to_string()))
}

/// Canonical share URL for a track on the given platform.
pub fn share_url(platform: Platform, track_id: &str) -> String {
    match platform {
        Platform::Spotify => format!("https://open.spotify.com/track/{}", track_id),
        Platform::AppleMusic => format!("https://music.apple.com/us/song/{}", track_id),
    }
}
