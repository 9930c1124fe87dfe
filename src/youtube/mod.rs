// src/youtube/mod.rs — YouTube Data API v3 client
//
// Resolves a free-form channel reference (URL, @handle, or raw channel ID)
// to channel statistics, plus a best-effort lookup of the latest upload.

use serde::Deserialize;
use std::time::Duration;

use crate::infra::errors::TubePulseError;

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Channel statistics for one request/response cycle. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelStats {
    pub name: String,
    pub subscriber_count: u64,
    pub view_count: u64,
    pub video_count: u64,
    pub latest_video: Option<LatestVideo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LatestVideo {
    pub title: String,
    pub view_count: u64,
    pub like_count: u64,
    pub url: String,
}

impl LatestVideo {
    /// Likes per view as a percentage; 0 for a video with no views.
    pub fn engagement_rate(&self) -> f64 {
        if self.view_count > 0 {
            self.like_count as f64 / self.view_count as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// How a raw query string gets resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    /// Already a channel ID — no search call needed.
    ChannelId(String),
    /// Search term derived from a URL or @handle.
    Search(String),
}

/// Channel IDs start with "UC" and are at least 24 characters; everything
/// else goes through search. URL forms contribute their first path segment
/// with any leading "@" stripped.
pub fn classify_query(query: &str) -> QueryKind {
    let query = query.trim();
    if query.starts_with("UC") && query.len() >= 24 {
        return QueryKind::ChannelId(query.to_string());
    }
    if let Ok(parsed) = url::Url::parse(query) {
        if let Some(segment) = parsed
            .path_segments()
            .and_then(|mut segments| segments.find(|s| !s.is_empty()))
        {
            return QueryKind::Search(segment.trim_start_matches('@').to_string());
        }
    }
    QueryKind::Search(query.trim_start_matches('@').to_string())
}

pub struct YouTubeClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: API_BASE.to_string(),
        }
    }

    /// Resolve a channel reference to its statistics. 1-3 outbound calls:
    /// search (unless the query is already an ID), channel details, and the
    /// non-fatal latest-upload lookup.
    pub async fn resolve(&self, query: &str) -> Result<ChannelStats, TubePulseError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(TubePulseError::EmptyQuery);
        }
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(TubePulseError::MissingApiKey)?;

        let channel_id = match classify_query(query) {
            QueryKind::ChannelId(id) => id,
            QueryKind::Search(term) => self.search_channel(&term, api_key).await?,
        };

        let (mut stats, uploads_id) = self.channel_stats(&channel_id, api_key).await?;
        if let Some(uploads_id) = uploads_id {
            stats.latest_video = self.fetch_latest(&uploads_id).await;
        }
        Ok(stats)
    }

    /// Best-effort lookup of the newest upload in a channel's uploads
    /// playlist. Any failure degrades to None; statistics without a
    /// latest-video section are still a complete result.
    pub async fn fetch_latest(&self, uploads_id: &str) -> Option<LatestVideo> {
        let api_key = self.api_key.as_deref()?;
        match self.try_fetch_latest(uploads_id, api_key).await {
            Ok(video) => video,
            Err(e) => {
                tracing::warn!("latest video lookup failed: {e}");
                None
            }
        }
    }

    async fn search_channel(&self, term: &str, api_key: &str) -> Result<String, TubePulseError> {
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("type", "channel"),
                ("q", term),
                ("key", api_key),
            ])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(http_error(response).await);
        }

        let body: SearchResponse = response.json().await.map_err(transport_error)?;
        body.items
            .into_iter()
            .next()
            .map(|item| item.snippet.channel_id)
            .ok_or(TubePulseError::ChannelNotFound)
    }

    async fn channel_stats(
        &self,
        channel_id: &str,
        api_key: &str,
    ) -> Result<(ChannelStats, Option<String>), TubePulseError> {
        let response = self
            .client
            .get(format!("{}/channels", self.base_url))
            .query(&[
                ("part", "statistics,snippet,contentDetails"),
                ("id", channel_id),
                ("key", api_key),
            ])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(http_error(response).await);
        }

        let body: ChannelListResponse = response.json().await.map_err(transport_error)?;
        let item = body
            .items
            .into_iter()
            .next()
            .ok_or(TubePulseError::StatsUnavailable)?;

        let uploads_id = item
            .content_details
            .and_then(|cd| cd.related_playlists)
            .and_then(|rp| rp.uploads);

        let statistics = item.statistics.unwrap_or_default();
        let stats = ChannelStats {
            name: item
                .snippet
                .map(|s| s.title)
                .unwrap_or_else(|| "Unknown".into()),
            subscriber_count: parse_count(&statistics.subscriber_count),
            view_count: parse_count(&statistics.view_count),
            video_count: parse_count(&statistics.video_count),
            latest_video: None,
        };
        Ok((stats, uploads_id))
    }

    async fn try_fetch_latest(
        &self,
        uploads_id: &str,
        api_key: &str,
    ) -> Result<Option<LatestVideo>, TubePulseError> {
        let response = self
            .client
            .get(format!("{}/playlistItems", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("playlistId", uploads_id),
                ("maxResults", "1"),
                ("key", api_key),
            ])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(http_error(response).await);
        }

        let body: PlaylistResponse = response.json().await.map_err(transport_error)?;
        let Some(item) = body.items.into_iter().next() else {
            return Ok(None);
        };
        let video_id = item.snippet.resource_id.video_id;
        let title = item.snippet.title;

        let response = self
            .client
            .get(format!("{}/videos", self.base_url))
            .query(&[
                ("part", "statistics"),
                ("id", video_id.as_str()),
                ("key", api_key),
            ])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(http_error(response).await);
        }

        let body: VideoListResponse = response.json().await.map_err(transport_error)?;
        let Some(video) = body.items.into_iter().next() else {
            return Ok(None);
        };

        Ok(Some(LatestVideo {
            title,
            view_count: parse_count(&video.statistics.view_count),
            like_count: parse_count(&video.statistics.like_count),
            url: format!("https://youtu.be/{video_id}"),
        }))
    }
}

fn transport_error(e: reqwest::Error) -> TubePulseError {
    TubePulseError::Provider {
        status: None,
        message: e.to_string(),
    }
}

async fn http_error(response: reqwest::Response) -> TubePulseError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    TubePulseError::Provider {
        status: Some(status),
        message,
    }
}

// The Data API serializes counters as JSON strings; missing fields count as zero.
fn parse_count(value: &Option<String>) -> u64 {
    value
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

// -- Data API response types --

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    channel_id: String,
}

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelItem {
    snippet: Option<ChannelSnippet>,
    statistics: Option<ChannelStatistics>,
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
struct ChannelSnippet {
    title: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelStatistics {
    subscriber_count: Option<String>,
    view_count: Option<String>,
    video_count: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentDetails {
    related_playlists: Option<RelatedPlaylists>,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistResponse {
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    snippet: PlaylistSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistSnippet {
    title: String,
    resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: String,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    statistics: VideoStatistics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    view_count: Option<String>,
    like_count: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_raw_channel_id_skips_search() {
        let id = "UCX6OQ3DkcsbYNE6H8uQQuVA";
        assert_eq!(classify_query(id), QueryKind::ChannelId(id.to_string()));
    }

    #[test]
    fn test_classify_short_uc_string_is_searched() {
        // "UC" prefix alone is not enough without the full ID length
        assert_eq!(
            classify_query("UCshort"),
            QueryKind::Search("UCshort".to_string())
        );
    }

    #[test]
    fn test_classify_handle_strips_at() {
        assert_eq!(
            classify_query("@MrBeast"),
            QueryKind::Search("MrBeast".to_string())
        );
    }

    #[test]
    fn test_classify_url_takes_first_path_segment() {
        assert_eq!(
            classify_query("https://www.youtube.com/@MrBeast"),
            QueryKind::Search("MrBeast".to_string())
        );
        assert_eq!(
            classify_query("https://youtube.com/@MrBeast/videos"),
            QueryKind::Search("MrBeast".to_string())
        );
    }

    #[test]
    fn test_classify_plain_name() {
        assert_eq!(
            classify_query("  MrBeast  "),
            QueryKind::Search("MrBeast".to_string())
        );
    }

    #[test]
    fn test_engagement_rate() {
        let video = LatestVideo {
            title: "t".into(),
            view_count: 200,
            like_count: 15,
            url: "https://youtu.be/x".into(),
        };
        assert!((video.engagement_rate() - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_engagement_rate_zero_views() {
        let video = LatestVideo {
            title: "t".into(),
            view_count: 0,
            like_count: 15,
            url: "https://youtu.be/x".into(),
        };
        assert_eq!(video.engagement_rate(), 0.0);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(&Some("123456".into())), 123_456);
        assert_eq!(parse_count(&Some("not a number".into())), 0);
        assert_eq!(parse_count(&None), 0);
    }

    #[tokio::test]
    async fn test_resolve_empty_query() {
        let client = YouTubeClient::new(Some("key".into()));
        assert!(matches!(
            client.resolve("   ").await,
            Err(TubePulseError::EmptyQuery)
        ));
    }

    #[tokio::test]
    async fn test_resolve_without_key_degrades() {
        let client = YouTubeClient::new(None);
        assert!(matches!(
            client.resolve("@MrBeast").await,
            Err(TubePulseError::MissingApiKey)
        ));
    }

    #[tokio::test]
    async fn test_fetch_latest_without_key_is_none() {
        let client = YouTubeClient::new(None);
        assert_eq!(client.fetch_latest("UUabc").await, None);
    }
}
