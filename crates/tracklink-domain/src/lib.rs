// SPDX-License-Identifier: GPL-3.0-or-later
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Platforms
// ============================================================================

/// One of the two supported streaming services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Spotify,
    AppleMusic,
}

impl Platform {
    /// The opposite platform. Exactly two platforms exist, so every source
    /// has a single resolution target.
    pub fn other(self) -> Platform {
        match self {
            Platform::Spotify => Platform::AppleMusic,
            Platform::AppleMusic => Platform::Spotify,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Spotify => "spotify",
            Platform::AppleMusic => "apple_music",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized platform name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPlatform(pub String);

impl fmt::Display for UnknownPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown platform: {}", self.0)
    }
}

impl std::error::Error for UnknownPlatform {}

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spotify" => Ok(Platform::Spotify),
            // "apple" is the short form accepted on the command line.
            "apple" | "apple_music" | "apple-music" => Ok(Platform::AppleMusic),
            other => Err(UnknownPlatform(other.to_string())),
        }
    }
}

// ============================================================================
// Track identity & match candidates
// ============================================================================

/// Normalized representation of a track on some platform: the uniform
/// `(title, artist, isrc)` triple extracted from a platform-specific payload.
/// Never mutated after construction; lives for a single resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackIdentity {
    pub title: String,
    pub artist: String,
    pub isrc: Option<String>,
}

/// A search-result track considered during fuzzy matching, with its combined
/// similarity score in `[0, 1]`. Created and discarded within one resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub score: f64,
}

// ============================================================================
// Resolution results
// ============================================================================

/// How a successful resolution found its target track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Cache,
    IsrcMatch,
    MetadataMatch,
}

impl MatchMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchMethod::Cache => "cache",
            MatchMethod::IsrcMatch => "isrc_match",
            MatchMethod::MetadataMatch => "metadata_match",
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one cross-platform resolution.
///
/// Invariant: `success` is true exactly when `target_id` is present and
/// `error` is absent, and a successful result always names the method that
/// produced it. Construct through [`MatchResult::matched`] and
/// [`MatchResult::not_matched`] so the invariant holds by construction.
/// Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub source_platform: Platform,
    pub source_id: String,
    pub target_platform: Platform,
    pub target_id: Option<String>,
    pub target_url: Option<String>,
    pub method_used: Option<MatchMethod>,
    pub match_score: Option<f64>,
    pub error: Option<String>,
    pub success: bool,
}

impl MatchResult {
    /// A successful resolution. The target platform is implied: it is always
    /// the opposite of the source.
    pub fn matched(
        source_platform: Platform,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        target_url: impl Into<String>,
        method_used: MatchMethod,
        match_score: Option<f64>,
    ) -> Self {
        Self {
            source_platform,
            source_id: source_id.into(),
            target_platform: source_platform.other(),
            target_id: Some(target_id.into()),
            target_url: Some(target_url.into()),
            method_used: Some(method_used),
            match_score,
            error: None,
            success: true,
        }
    }

    /// A failed resolution. `method_used` is set when the failure itself came
    /// from a definite strategy (a cached negative entry), absent otherwise.
    pub fn not_matched(
        source_platform: Platform,
        source_id: impl Into<String>,
        method_used: Option<MatchMethod>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            source_platform,
            source_id: source_id.into(),
            target_platform: source_platform.other(),
            target_id: None,
            target_url: None,
            method_used,
            match_score: None,
            error: Some(error.into()),
            success: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_other_is_an_involution() {
        assert_eq!(Platform::Spotify.other(), Platform::AppleMusic);
        assert_eq!(Platform::AppleMusic.other(), Platform::Spotify);
        assert_eq!(Platform::Spotify.other().other(), Platform::Spotify);
    }

    #[test]
    fn platform_parses_aliases() {
        assert_eq!("spotify".parse::<Platform>().unwrap(), Platform::Spotify);
        assert_eq!("SPOTIFY".parse::<Platform>().unwrap(), Platform::Spotify);
        assert_eq!("apple".parse::<Platform>().unwrap(), Platform::AppleMusic);
        assert_eq!(
            "apple_music".parse::<Platform>().unwrap(),
            Platform::AppleMusic
        );
        assert_eq!(
            "apple-music".parse::<Platform>().unwrap(),
            Platform::AppleMusic
        );
        assert!("tidal".parse::<Platform>().is_err());
    }

    #[test]
    fn platform_display_matches_serde() {
        assert_eq!(Platform::Spotify.to_string(), "spotify");
        assert_eq!(Platform::AppleMusic.to_string(), "apple_music");
        assert_eq!(
            serde_json::to_string(&Platform::AppleMusic).unwrap(),
            "\"apple_music\""
        );
    }

    #[test]
    fn match_method_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&MatchMethod::IsrcMatch).unwrap(),
            "\"isrc_match\""
        );
        assert_eq!(MatchMethod::MetadataMatch.to_string(), "metadata_match");
    }

    #[test]
    fn matched_result_upholds_invariant() {
        let result = MatchResult::matched(
            Platform::Spotify,
            "abc123",
            "1445903620",
            "https://music.apple.com/us/song/1445903620",
            MatchMethod::IsrcMatch,
            None,
        );

        assert!(result.success);
        assert_eq!(result.target_platform, Platform::AppleMusic);
        assert_eq!(result.target_id.as_deref(), Some("1445903620"));
        assert_eq!(result.method_used, Some(MatchMethod::IsrcMatch));
        assert!(result.error.is_none());
    }

    #[test]
    fn not_matched_result_upholds_invariant() {
        let result = MatchResult::not_matched(
            Platform::AppleMusic,
            "1445903620",
            None,
            "No suitable match found",
        );

        assert!(!result.success);
        assert_eq!(result.target_platform, Platform::Spotify);
        assert!(result.target_id.is_none());
        assert!(result.target_url.is_none());
        assert_eq!(result.error.as_deref(), Some("No suitable match found"));
    }
}
