//! Spotify subcommands

use anyhow::Result;
use serde_json::json;

use super::{Context, print_json};
use crate::spotify::PlaylistDetails;

/// Arguments for `create-playlist`
#[derive(Debug)]
pub struct CreatePlaylistArgs {
    pub user: String,
    pub name: String,
    pub description: Option<String>,
    pub public: bool,
}

impl CreatePlaylistArgs {
    pub fn details(&self) -> PlaylistDetails {
        let mut details = PlaylistDetails::new(&self.name).with_public(self.public);
        if let Some(description) = &self.description {
            details = details.with_description(description);
        }
        details
    }
}

/// Arguments for `add-tracks`
#[derive(Debug)]
pub struct AddTracksArgs {
    pub playlist: String,
    pub tracks: Vec<String>,
    /// Insert a single track at this index instead of appending in batches
    pub position: Option<u32>,
}

/// Print a freshly refreshed bearer token
pub async fn run_token(ctx: &Context) -> Result<()> {
    let token = ctx.refresh_token().await?;
    print_json(&json!({ "access_token": token.secret() }))
}

pub async fn run_search(ctx: &Context, query: &str) -> Result<()> {
    let token = ctx.bearer_token().await?;
    let track_id = ctx.spotify().search_track(query, &token).await?;
    print_json(&json!({ "query": query, "track_id": track_id }))
}

pub async fn run_track(ctx: &Context, track_id: &str) -> Result<()> {
    let token = ctx.bearer_token().await?;
    let track = ctx.spotify().get_track(track_id, &token).await?;
    print_json(&track)
}

pub async fn run_playlist(ctx: &Context, playlist_id: &str) -> Result<()> {
    let token = ctx.bearer_token().await?;
    let playlist = ctx.spotify().get_playlist(playlist_id, &token).await?;
    print_json(&playlist)
}

pub async fn run_create_playlist(ctx: &Context, args: &CreatePlaylistArgs) -> Result<()> {
    let token = ctx.bearer_token().await?;
    let playlist = ctx
        .spotify()
        .create_playlist(&args.user, &args.details(), &token)
        .await?;
    print_json(&playlist)
}

pub async fn run_add_tracks(ctx: &Context, args: &AddTracksArgs) -> Result<()> {
    let token = ctx.bearer_token().await?;
    let spotify = ctx.spotify();

    match (args.position, args.tracks.as_slice()) {
        (Some(position), [track_id]) => {
            let snapshot = spotify
                .add_track_to_playlist(&args.playlist, track_id, &token, position)
                .await?;
            print_json(&snapshot)
        }
        (Some(_), tracks) => Err(crate::Error::validation_with_value(
            "position",
            "--position takes exactly one track id",
            &tracks.len().to_string(),
        )
        .into()),
        (None, tracks) => {
            let report = spotify
                .add_tracks_in_batch(&args.playlist, tracks, &token)
                .await?;
            print_json(&report)
        }
    }
}
