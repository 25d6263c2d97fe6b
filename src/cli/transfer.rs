//! `transfer` subcommand

use anyhow::Result;

use super::{Context, print_json};
use crate::spotify::PlaylistDetails;
use crate::transfer::{TransferRequest, transfer_playlist};

/// Arguments for `transfer`
#[derive(Debug)]
pub struct TransferArgs {
    pub youtube_playlist: String,
    pub user: String,
    pub name: String,
    pub description: Option<String>,
    pub public: bool,
}

impl From<&TransferArgs> for TransferRequest {
    fn from(args: &TransferArgs) -> Self {
        let mut playlist = PlaylistDetails::new(&args.name).with_public(args.public);
        if let Some(description) = &args.description {
            playlist = playlist.with_description(description);
        }

        Self {
            youtube_playlist_id: args.youtube_playlist.clone(),
            spotify_user_id: args.user.clone(),
            playlist,
        }
    }
}

pub async fn run_transfer(ctx: &Context, args: &TransferArgs) -> Result<()> {
    let token = ctx.bearer_token().await?;
    let youtube = ctx.youtube().await?;
    let spotify = ctx.spotify();

    let report = transfer_playlist(&youtube, &spotify, &token, &TransferRequest::from(args)).await?;
    tracing::info!(
        playlist_id = %report.playlist.id,
        tracks = report.batch.tracks_added,
        "transfer complete"
    );
    print_json(&report)
}
