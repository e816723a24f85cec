// SPDX-License-Identifier: GPL-3.0-or-later
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracklink_application::TrackResolver;
use tracklink_config::{load as load_config, AppConfig};
use tracklink_domain::{MatchResult, Platform};
use tracklink_platforms::{AppleMusicClient, SpotifyClient};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = load_config(None)?;
    let resolver = build_resolver(&config)?;
    info!(target: "cli", "resolver ready");

    println!("tracklink - cross-platform track matcher");
    println!("Enter a share URL or `<platform> <track-id>` (quit to exit).");
    println!("Examples:");
    println!("  https://open.spotify.com/track/2ltvvftNngVjO6xhqVQd9M");
    println!("  apple_music 1780828941");

    let stdin = io::stdin();
    loop {
        print!("\n> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") {
            break;
        }

        match run_query(&resolver, line).await {
            Ok(result) => print_result(&resolver, &result).await,
            Err(error) => println!("Error: {error:#}"),
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn init_tracing() {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn build_resolver(config: &AppConfig) -> Result<TrackResolver> {
    let mut spotify = SpotifyClient::builder();
    if let Some(url) = config.spotify.api_base_url.as_deref() {
        spotify = spotify.api_base_url(url);
    }
    if let Some(url) = config.spotify.auth_base_url.as_deref() {
        spotify = spotify.auth_base_url(url);
    }
    let spotify = spotify
        .build(
            config.spotify.client_id.as_str(),
            config.spotify.client_secret.as_str(),
        )
        .context("failed to build Spotify client")?;

    let mut apple_music =
        AppleMusicClient::builder().storefront(config.apple_music.storefront.as_str());
    if let Some(url) = config.apple_music.base_url.as_deref() {
        apple_music = apple_music.base_url(url);
    }
    let apple_music = apple_music
        .build(config.apple_music.developer_token.as_str())
        .context("failed to build Apple Music client")?;

    Ok(
        TrackResolver::new(Arc::new(spotify), Arc::new(apple_music))
            .with_confidence_threshold(config.matching.confidence_threshold),
    )
}

/// What one input line asks for.
#[derive(Debug, PartialEq, Eq)]
enum Query {
    Url(String),
    Track(Platform, String),
}

fn parse_query(input: &str) -> Result<Query> {
    if input.starts_with("http://") || input.starts_with("https://") {
        return Ok(Query::Url(input.to_string()));
    }

    let mut parts = input.split_whitespace();
    let (Some(platform), Some(track_id), None) = (parts.next(), parts.next(), parts.next()) else {
        bail!("expected a share URL or `<platform> <track-id>`");
    };

    let platform = Platform::from_str(platform)
        .map_err(|error| anyhow::anyhow!("{error} (expected spotify or apple_music)"))?;

    Ok(Query::Track(platform, track_id.to_string()))
}

async fn run_query(resolver: &TrackResolver, input: &str) -> Result<MatchResult> {
    match parse_query(input)? {
        Query::Url(url) => Ok(resolver.resolve_url(&url).await?),
        Query::Track(platform, track_id) => Ok(resolver.resolve(platform, &track_id).await),
    }
}

async fn print_result(resolver: &TrackResolver, result: &MatchResult) {
    if result.success {
        println!("Match found!");
        println!("  Source: {} ({})", result.source_platform, result.source_id);
        println!(
            "  Target: {} ({})",
            result.target_platform,
            result.target_id.as_deref().unwrap_or("-")
        );
        if let Some(method) = result.method_used {
            println!("  Method: {}", method);
        }
        if let Some(score) = result.match_score {
            println!("  Confidence: {:.2}", score);
        }
        if let Some(url) = result.target_url.as_deref() {
            println!("  Target URL: {}", url);
        }
        if resolver.validate(result).await {
            println!("  Validation: target confirmed on {}", result.target_platform);
        } else {
            println!("  Validation: could not confirm target");
        }
    } else {
        println!("No match found");
        if let Some(error) = result.error.as_deref() {
            println!("  Error: {}", error);
        }
    }
}
