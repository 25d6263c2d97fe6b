//! The video-service seam.
//!
//! [`YouTubeApi`] exposes the two raw list calls; pagination and the detail
//! lookup are provided methods built on top of them, so a test double only
//! has to script pages.

use crate::config::settings::MAX_PLAYLIST_ITEMS_PAGE_SIZE;
use crate::youtube::types::{PlaylistItemListResponse, PlaylistItems, Video, VideoListResponse};
use crate::{Error, Result};

/// Page size and page bound used when walking a playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: u32,
    max_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_size: MAX_PLAYLIST_ITEMS_PAGE_SIZE,
            max_pages: 1000,
        }
    }
}

impl Pagination {
    /// Page size is clamped to 1..=50; the bound is at least one page
    pub fn new(page_size: u32, max_pages: u32) -> Self {
        Self {
            page_size: page_size.clamp(1, MAX_PLAYLIST_ITEMS_PAGE_SIZE),
            max_pages: max_pages.max(1),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }
}

/// Operations against the YouTube Data API
#[async_trait::async_trait]
pub trait YouTubeApi: Send + Sync {
    /// Fetch one page of `playlistItems.list` with the `id` and `contentDetails` parts
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse>;

    /// Call `videos.list` for one id with the `snippet`, `contentDetails` and `statistics` parts
    async fn list_videos(&self, video_id: &str) -> Result<VideoListResponse>;

    fn pagination(&self) -> Pagination {
        Pagination::default()
    }

    /// Collect every item of a playlist, following continuation cursors
    ///
    /// Items keep the order of the pages. An absent or empty cursor ends the
    /// walk; a cursor still present after `max_pages` pages fails with
    /// [`Error::PaginationLimit`].
    async fn enumerate_playlist_items(&self, playlist_id: &str) -> Result<PlaylistItems> {
        let pagination = self.pagination();
        let mut items = Vec::new();
        let mut total_results = 0;
        let mut page_token: Option<String> = None;
        let mut pages = 0u32;

        loop {
            let page = self
                .list_playlist_items(playlist_id, pagination.page_size(), page_token.as_deref())
                .await
                .inspect_err(|e| {
                    tracing::error!(playlist_id, page = pages + 1, "failed to list playlist items: {}", e)
                })?;
            pages += 1;

            total_results = page.page_info.total_results;
            items.extend(page.items);

            match page.next_page_token.filter(|token| !token.is_empty()) {
                None => break,
                Some(_) if pages >= pagination.max_pages() => {
                    tracing::error!(
                        playlist_id,
                        pages,
                        items = items.len(),
                        "playlist pagination did not terminate"
                    );
                    return Err(Error::PaginationLimit {
                        resource: format!("playlist {}", playlist_id),
                        max_pages: pagination.max_pages(),
                        items_collected: items.len(),
                    });
                }
                Some(token) => page_token = Some(token),
            }
        }

        tracing::debug!(playlist_id, pages, items = items.len(), total_results, "playlist enumerated");
        Ok(PlaylistItems {
            total_results,
            items,
        })
    }

    /// Look up a video, telling "no such video" (`Ok(None)`) apart from failures
    async fn try_fetch_video_details(&self, video_id: &str) -> Result<Option<Video>> {
        let response = self.list_videos(video_id).await?;
        Ok(response.items.into_iter().next())
    }

    /// Look up a video; any failure is logged and reported as `None`
    ///
    /// Use [`YouTubeApi::try_fetch_video_details`] when the difference between
    /// a missing video and a failed request matters.
    async fn fetch_video_details(&self, video_id: &str) -> Option<Video> {
        match self.try_fetch_video_details(video_id).await {
            Ok(video) => {
                if video.is_none() {
                    tracing::debug!(video_id, "no video with this id");
                }
                video
            }
            Err(e) => {
                tracing::error!(video_id, "Execute error: {}", e);
                None
            }
        }
    }
}
