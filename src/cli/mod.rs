//! Command line interface logic
//!
//! Each subcommand module holds its argument struct and a `run_*` function;
//! this module loads configuration, sets up logging and builds the clients
//! they share.

pub mod spotify;
pub mod transfer;
pub mod youtube;

use anyhow::{Context as _, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    Error, Settings,
    auth::{BearerToken, TokenClient},
    config::ConfigLoader,
    http::NetworkManager,
    spotify::SpotifyClient,
    utils::version,
    youtube::YouTubeClient,
};

/// Options accepted by every subcommand
#[derive(Debug, Default, Clone)]
pub struct GlobalArgs {
    /// Configuration file path
    pub config: Option<PathBuf>,
    /// Use this bearer token instead of refreshing one
    pub token: Option<String>,
    pub verbose: bool,
}

/// Settings and HTTP client shared by a single command invocation
#[derive(Debug)]
pub struct Context {
    settings: Settings,
    network: NetworkManager,
    token: Option<String>,
}

impl Context {
    /// Load configuration, then initialize logging from it
    ///
    /// Configuration precedence:
    /// 1. Command line arguments (highest priority)
    /// 2. Environment variables
    /// 3. Configuration file (from --config, PLAYLIST_BRIDGE_CONFIG or default location)
    /// 4. Default values (lowest priority)
    pub fn init(args: &GlobalArgs) -> Result<Self> {
        let settings = load_settings(args)?;
        init_logging(&settings);
        tracing::debug!("playlist-bridge v{}", version::get_version());

        let network = NetworkManager::new(&settings)?;
        Ok(Self {
            settings,
            network,
            token: args.token.clone(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn spotify(&self) -> SpotifyClient {
        SpotifyClient::from_settings(self.network.client().clone(), &self.settings.spotify)
    }

    pub async fn youtube(&self) -> Result<YouTubeClient> {
        let youtube =
            YouTubeClient::from_settings(self.network.client().clone(), &self.settings.youtube)
                .await?;
        Ok(youtube)
    }

    /// The `--token` value when given, otherwise a freshly refreshed one
    pub async fn bearer_token(&self) -> Result<BearerToken> {
        if let Some(token) = &self.token {
            return Ok(BearerToken::new(token.as_str()));
        }
        self.refresh_token().await
    }

    /// Exchange the configured refresh token for a new bearer token
    pub async fn refresh_token(&self) -> Result<BearerToken> {
        let refresh_token = self
            .settings
            .spotify
            .refresh_token
            .as_ref()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                Error::config(
                    "spotify.refresh_token",
                    "Missing refresh token (set SPOTIFY_REFRESH_TOKEN or pass --token)",
                )
            })?;

        let token_client =
            TokenClient::from_settings(self.network.client().clone(), &self.settings.spotify)?;
        let token = token_client.refresh(refresh_token.expose()).await?;
        Ok(token)
    }
}

fn load_settings(args: &GlobalArgs) -> Result<Settings> {
    let config_path = args.config.clone().or_else(ConfigLoader::get_config_path);

    let mut settings = ConfigLoader::new()
        .load(config_path.as_deref())
        .with_context(|| match &config_path {
            Some(path) => format!("Failed to load configuration from {}", path.display()),
            None => "Failed to load configuration".to_string(),
        })?;

    if args.verbose {
        settings.logging.verbose = true;
    }
    Ok(settings)
}

/// Initialize logging with proper precedence:
/// 1. --verbose flag or VERBOSE (highest priority) -> debug level
/// 2. RUST_LOG environment variable
/// 3. Config file logging.level
fn init_logging(settings: &Settings) {
    let env_filter = if settings.logging.verbose {
        EnvFilter::new("debug")
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(&settings.logging.level)
    };

    // stdout carries the JSON output
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value)?;
    println!("{}", output);
    Ok(())
}
