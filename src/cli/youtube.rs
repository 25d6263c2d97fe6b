//! YouTube subcommands

use anyhow::Result;

use super::{Context, print_json};
use crate::Error;
use crate::youtube::YouTubeApi;

/// Print every item of a playlist
pub async fn run_playlist_items(ctx: &Context, playlist_id: &str) -> Result<()> {
    let youtube = ctx.youtube().await?;
    let items = youtube.enumerate_playlist_items(playlist_id).await?;
    print_json(&items)
}

/// Print the details of a video; fails when the video does not exist
pub async fn run_video(ctx: &Context, video_id: &str) -> Result<()> {
    let youtube = ctx.youtube().await?;
    match youtube.try_fetch_video_details(video_id).await? {
        Some(video) => print_json(&video),
        None => Err(Error::not_found("video", video_id).into()),
    }
}
