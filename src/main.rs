//! Command line client for playlist-bridge
//!
//! Thin wrapper over the library: every subcommand prints its result as
//! JSON on stdout, logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! playlist-bridge search "Daft Punk - One More Time"
//! playlist-bridge playlist-items PLxxxxxxxx
//! playlist-bridge transfer --youtube-playlist PLxxxxxxxx --user alice --name "Imported"
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use playlist_bridge::{
    Error,
    cli::{
        Context, GlobalArgs,
        spotify::{self, AddTracksArgs, CreatePlaylistArgs},
        transfer::{TransferArgs, run_transfer},
        youtube,
    },
    error::{format_error, format_error_for_logging},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "playlist-bridge")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Spotify bearer token to use instead of refreshing one
    #[arg(long, global = true, value_name = "TOKEN")]
    token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Exchange the configured refresh token for a bearer token
    Token,

    /// Search Spotify and print the first matching track id
    Search {
        /// Free-text query
        query: String,
    },

    /// Print a Spotify track
    Track {
        #[arg(allow_hyphen_values = true)]
        id: String,
    },

    /// Print a Spotify playlist
    Playlist {
        #[arg(allow_hyphen_values = true)]
        id: String,
    },

    /// Create a Spotify playlist
    CreatePlaylist {
        /// Owner's Spotify user id
        #[arg(long)]
        user: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        public: bool,
    },

    /// Add tracks to a Spotify playlist
    AddTracks {
        #[arg(long, allow_hyphen_values = true)]
        playlist: String,

        /// Insert the single given track at this index
        #[arg(long)]
        position: Option<u32>,

        /// Track ids
        #[arg(required = true)]
        tracks: Vec<String>,
    },

    /// Print every item of a YouTube playlist
    PlaylistItems {
        #[arg(allow_hyphen_values = true)]
        id: String,
    },

    /// Print the details of a YouTube video
    Video {
        /// Video id (may start with a dash, e.g. -6OjhRWNLfk)
        #[arg(allow_hyphen_values = true)]
        id: String,
    },

    /// Copy a YouTube playlist into a new Spotify playlist
    Transfer {
        #[arg(long, allow_hyphen_values = true)]
        youtube_playlist: String,

        /// Owner's Spotify user id
        #[arg(long)]
        user: String,

        /// Name of the playlist to create
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        public: bool,
    },
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::init(&GlobalArgs {
        config: cli.config,
        token: cli.token,
        verbose: cli.verbose,
    })?;

    match cli.command {
        Commands::Token => spotify::run_token(&ctx).await,
        Commands::Search { query } => spotify::run_search(&ctx, &query).await,
        Commands::Track { id } => spotify::run_track(&ctx, &id).await,
        Commands::Playlist { id } => spotify::run_playlist(&ctx, &id).await,
        Commands::CreatePlaylist {
            user,
            name,
            description,
            public,
        } => {
            let args = CreatePlaylistArgs {
                user,
                name,
                description,
                public,
            };
            spotify::run_create_playlist(&ctx, &args).await
        }
        Commands::AddTracks {
            playlist,
            position,
            tracks,
        } => {
            let args = AddTracksArgs {
                playlist,
                tracks,
                position,
            };
            spotify::run_add_tracks(&ctx, &args).await
        }
        Commands::PlaylistItems { id } => youtube::run_playlist_items(&ctx, &id).await,
        Commands::Video { id } => youtube::run_video(&ctx, &id).await,
        Commands::Transfer {
            youtube_playlist,
            user,
            name,
            description,
            public,
        } => {
            let args = TransferArgs {
                youtube_playlist,
                user,
                name,
                description,
                public,
            };
            run_transfer(&ctx, &args).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<Error>() {
            Some(error) => {
                tracing::debug!(details = %format_error_for_logging(error), "command failed");
                eprintln!("Error: {}", format_error(error));
            }
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}
