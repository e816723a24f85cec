// SPDX-License-Identifier: GPL-3.0-or-later

//! Streaming platform API clients for track lookup and search.
//!
//! This crate provides one client per supported platform (Spotify, Apple
//! Music) behind the [`PlatformClient`] capability trait: fetch a track by
//! catalog id, search by ISRC, search by free-text metadata. Clients are pure
//! I/O adapters; matching logic lives in `tracklink-application`.

pub mod apple_music;
#[cfg(test)]
mod apple_music_tests;
pub mod client;
pub mod error;
pub mod models;
pub mod spotify;
#[cfg(test)]
mod spotify_tests;

pub use apple_music::{AppleMusicClient, AppleMusicClientBuilder};
pub use client::{PlatformClient, SEARCH_CANDIDATE_LIMIT};
pub use error::{PlatformError, Result};
pub use models::RawTrack;
pub use spotify::{SpotifyClient, SpotifyClientBuilder};
