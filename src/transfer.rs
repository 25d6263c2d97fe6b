//! Copy a YouTube playlist into a new Spotify playlist.
//!
//! Each video's title is used as a Spotify search query; the first hit is
//! kept. Videos without details or without a match are reported back rather
//! than failing the whole transfer.

use crate::Result;
use crate::auth::BearerToken;
use crate::spotify::{BatchReport, Playlist, PlaylistDetails, SpotifyClient};
use crate::youtube::YouTubeApi;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// What to copy and where
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// Source YouTube playlist id
    pub youtube_playlist_id: String,
    /// Spotify user that will own the new playlist
    pub spotify_user_id: String,
    /// Details of the playlist to create
    pub playlist: PlaylistDetails,
}

/// A video that was matched to a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackMatch {
    pub video_id: String,
    pub title: String,
    pub track_id: String,
}

/// Why a video has no counterpart in the new playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum SkipReason {
    /// The playlist item did not carry a video id
    MissingVideoId,
    /// The video lookup returned nothing (deleted, private, or a failed request)
    DetailsUnavailable,
    /// The search returned no tracks for the title
    NoMatch { query: String },
}

/// A video left out of the new playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedVideo {
    pub playlist_item_id: String,
    pub video_id: Option<String>,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Outcome of a finished transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferReport {
    /// The playlist that was created
    pub playlist: Playlist,
    /// Items found in the source playlist
    pub source_items: usize,
    pub matched: Vec<TrackMatch>,
    pub skipped: Vec<SkippedVideo>,
    /// Result of the batched insertion
    pub batch: BatchReport,
}

/// Enumerate, match, create, insert
///
/// Search failures other than "no match" abort the transfer, as does a
/// failing chunk during insertion (see [`crate::Error::BatchInterrupted`]).
#[instrument(skip(youtube, spotify, token, request), fields(source = %request.youtube_playlist_id))]
pub async fn transfer_playlist<Y>(
    youtube: &Y,
    spotify: &SpotifyClient,
    token: &BearerToken,
    request: &TransferRequest,
) -> Result<TransferReport>
where
    Y: YouTubeApi + ?Sized,
{
    let source = youtube
        .enumerate_playlist_items(&request.youtube_playlist_id)
        .await?;
    info!(items = source.items.len(), "source playlist enumerated");

    let mut matched = Vec::new();
    let mut skipped = Vec::new();

    for item in &source.items {
        let Some(video_id) = item.video_id() else {
            skipped.push(SkippedVideo {
                playlist_item_id: item.id.clone(),
                video_id: None,
                reason: SkipReason::MissingVideoId,
            });
            continue;
        };

        let Some(title) = youtube
            .fetch_video_details(video_id)
            .await
            .and_then(|video| video.title().map(str::to_string))
        else {
            warn!(video_id, "video details unavailable, skipping");
            skipped.push(SkippedVideo {
                playlist_item_id: item.id.clone(),
                video_id: Some(video_id.to_string()),
                reason: SkipReason::DetailsUnavailable,
            });
            continue;
        };

        match spotify.search_track(&title, token).await {
            Ok(track_id) => matched.push(TrackMatch {
                video_id: video_id.to_string(),
                title,
                track_id,
            }),
            Err(crate::Error::NotFound { .. }) => {
                warn!(video_id, %title, "no track matches video title");
                skipped.push(SkippedVideo {
                    playlist_item_id: item.id.clone(),
                    video_id: Some(video_id.to_string()),
                    reason: SkipReason::NoMatch { query: title },
                });
            }
            Err(e) => return Err(e),
        }
    }

    let playlist = spotify
        .create_playlist(&request.spotify_user_id, &request.playlist, token)
        .await?;

    let track_ids: Vec<&str> = matched.iter().map(|m| m.track_id.as_str()).collect();
    let batch = spotify
        .add_tracks_in_batch(&playlist.id, &track_ids, token)
        .await?;

    info!(
        playlist_id = %playlist.id,
        matched = matched.len(),
        skipped = skipped.len(),
        "transfer finished"
    );

    Ok(TransferReport {
        playlist,
        source_items: source.items.len(),
        matched,
        skipped,
        batch,
    })
}
