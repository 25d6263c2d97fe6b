//! YouTube Data API v3 types.

use serde::{Deserialize, Serialize};

/// Response structure for the `playlistItems.list` API call.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlistItems/list>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemListResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    pub page_info: PageInfo,
    /// Continuation cursor; absent on the last page.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// A `playlistItem` resource with the `id` and `contentDetails` parts.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlistItems#resource>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    pub id: String,
    #[serde(default)]
    pub content_details: Option<PlaylistItemContentDetails>,
}

impl PlaylistItem {
    /// Id of the video this item points to, if the part was returned.
    pub fn video_id(&self) -> Option<&str> {
        self.content_details
            .as_ref()
            .map(|details| details.video_id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemContentDetails {
    pub video_id: String,
    #[serde(default)]
    pub video_published_at: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Paging details for lists of resources.
///
/// See: <https://developers.google.com/youtube/v3/docs/pageInfo>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// The total number of results in the result set.
    #[serde(default)]
    pub total_results: u32,
    /// The number of results included in the API response.
    #[serde(default)]
    pub results_per_page: u32,
}

/// Every item of a playlist, concatenated across pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItems {
    /// `pageInfo.totalResults` as reported by the last page
    pub total_results: u32,
    pub items: Vec<PlaylistItem>,
}

/// Response structure for the `videos.list` API call.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos/list>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<Video>,
}

/// A `video` resource with the `snippet`, `contentDetails` and `statistics` parts.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#resource>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<VideoSnippet>,
    #[serde(default)]
    pub content_details: Option<VideoContentDetails>,
    #[serde(default)]
    pub statistics: Option<VideoStatistics>,
}

impl Video {
    pub fn title(&self) -> Option<&str> {
        self.snippet.as_ref().map(|snippet| snippet.title.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub channel_title: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoContentDetails {
    /// ISO 8601 duration, e.g. `PT4M13S`
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
}

/// Statistics about the video. Counts are strings in the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(default)]
    pub view_count: Option<String>,
    #[serde(default)]
    pub like_count: Option<String>,
    #[serde(default)]
    pub comment_count: Option<String>,
}

/// The two fields of the discovery document needed to locate the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DiscoveryDocument {
    pub root_url: String,
    pub service_path: String,
}

impl DiscoveryDocument {
    pub fn base_url(&self) -> String {
        format!(
            "{}/{}",
            self.root_url.trim_end_matches('/'),
            self.service_path.trim_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_playlist_item_page_parses() {
        let page: PlaylistItemListResponse = serde_json::from_value(json!({
            "kind": "youtube#playlistItemListResponse",
            "nextPageToken": "EAAaBlBUOkNESQ",
            "items": [{
                "kind": "youtube#playlistItem",
                "id": "UExhYmM",
                "contentDetails": {"videoId": "dQw4w9WgXcQ", "videoPublishedAt": "2009-10-25T06:57:33Z"}
            }],
            "pageInfo": {"totalResults": 120, "resultsPerPage": 50}
        }))
        .unwrap();

        assert_eq!(page.next_page_token.as_deref(), Some("EAAaBlBUOkNESQ"));
        assert_eq!(page.page_info.total_results, 120);
        assert_eq!(page.items[0].video_id(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn test_discovery_base_url() {
        let doc = DiscoveryDocument {
            root_url: "https://youtube.googleapis.com/".to_string(),
            service_path: "youtube/v3/".to_string(),
        };
        assert_eq!(doc.base_url(), "https://youtube.googleapis.com/youtube/v3");
    }
}
