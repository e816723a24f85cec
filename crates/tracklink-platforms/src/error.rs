// SPDX-License-Identifier: GPL-3.0-or-later

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlatformError>;

/// Errors surfaced by the platform API clients.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The platform reports the identifier as unknown.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Credentials are invalid, or a refresh-and-retry still failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Network or protocol failure before a response could be read.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The platform answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Structurally required data was absent from an otherwise successful
    /// response.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
