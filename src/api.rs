use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::Result;
use crate::models::{CandidateId, SearchMode};

pub const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Largest `maxResults` the search endpoint accepts
pub const SEARCH_PAGE_SIZE: u32 = 50;

/// Most ids the videos endpoint accepts in one call
pub const DETAIL_BATCH_LIMIT: usize = 50;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Supplies the API key for each request
pub trait CredentialProvider: Send + Sync {
    fn api_key(&self) -> Option<String>;
}

/// A fixed key, for embedding and tests
#[derive(Debug, Clone)]
pub struct StaticCredentials(pub String);

impl CredentialProvider for StaticCredentials {
    fn api_key(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// How a single request failed, before any retrying
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    /// Worth repeating: network trouble, rate limiting, server errors
    Transient(String),
    /// Repeating will not help: bad key, exhausted quota, bad request
    Fatal(String),
}

/// One page request against `search.list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub mode: SearchMode,
    pub value: String,
    pub published_after: Option<NaiveDate>,
    pub published_before: Option<NaiveDate>,
    pub page_token: Option<String>,
    pub page_size: u32,
}

impl SearchRequest {
    /// Query string parameters, without the key
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("part", "snippet".to_string()),
            ("type", "video".to_string()),
            ("order", "date".to_string()),
            ("maxResults", self.page_size.to_string()),
        ];
        match self.mode {
            SearchMode::Keyword => params.push(("q", self.value.clone())),
            SearchMode::ChannelId => params.push(("channelId", self.value.clone())),
        }
        if let Some(after) = self.published_after {
            params.push(("publishedAfter", format!("{}T00:00:00Z", after.format("%Y-%m-%d"))));
        }
        if let Some(before) = self.published_before {
            params.push(("publishedBefore", format!("{}T23:59:59Z", before.format("%Y-%m-%d"))));
        }
        if let Some(token) = &self.page_token {
            params.push(("pageToken", token.clone()));
        }
        params
    }
}

/// Identifiers from one search page and the token for the next one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub ids: Vec<CandidateId>,
    pub next_page_token: Option<String>,
}

/// The two calls the pipeline makes against the platform
#[async_trait]
pub trait YouTubeApi: Send + Sync {
    async fn search_page(&self, request: &SearchRequest) -> std::result::Result<SearchPage, ApiFailure>;

    /// Detail records for up to [`DETAIL_BATCH_LIMIT`] ids. Unknown ids are
    /// simply absent from the response.
    async fn video_details(&self, ids: &[CandidateId]) -> std::result::Result<Vec<VideoItem>, ApiFailure>;
}

// Wire types for `videos.list`. These double as the raw detail record.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    #[serde(default)]
    pub snippet: VideoSnippet,
    #[serde(default)]
    pub content_details: ContentDetails,
    #[serde(default)]
    pub statistics: Statistics,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoSnippet {
    pub title: String,
    pub channel_title: String,
    pub channel_id: String,
    pub published_at: Option<String>,
    pub tags: Vec<String>,
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
}

impl Thumbnails {
    /// `high`, else `medium`, else `default`
    pub fn best_url(&self) -> Option<&str> {
        [&self.high, &self.medium, &self.default]
            .into_iter()
            .flatten()
            .map(|t| t.url.as_str())
            .find(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnail {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentDetails {
    pub duration: Option<String>,
}

/// Counts arrive as decimal strings and may be hidden by the uploader
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistics {
    pub view_count: Option<String>,
    pub comment_count: Option<String>,
}

impl Statistics {
    pub fn views(&self) -> u64 {
        parse_count(self.view_count.as_deref())
    }

    pub fn comments(&self) -> u64 {
        parse_count(self.comment_count.as_deref())
    }
}

fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchResult>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: SearchResultId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResultId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorReason>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorReason {
    #[serde(default)]
    reason: String,
}

/// Decide whether a non-success response is worth retrying
pub fn classify_status(status: StatusCode, body: &str) -> ApiFailure {
    let detail = serde_json::from_str::<ApiErrorBody>(body).ok().map(|b| b.error);
    let reasons: Vec<&str> = detail
        .as_ref()
        .map(|d| d.errors.iter().map(|e| e.reason.as_str()).collect())
        .unwrap_or_default();
    let message = match &detail {
        Some(d) if !d.message.is_empty() => format!("{} ({})", d.message, status),
        _ => format!("request failed ({})", status),
    };

    let rate_limited = reasons
        .iter()
        .any(|r| matches!(*r, "rateLimitExceeded" | "userRateLimitExceeded"));

    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        ApiFailure::Transient(message)
    } else if status == StatusCode::FORBIDDEN && rate_limited {
        ApiFailure::Transient(message)
    } else {
        ApiFailure::Fatal(message)
    }
}

/// The request URL carries the key, so it never reaches the message
fn classify_transport(err: reqwest::Error) -> ApiFailure {
    let err = err.without_url();
    if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
        ApiFailure::Transient(err.to_string())
    } else {
        ApiFailure::Fatal(err.to_string())
    }
}

/// `YouTubeApi` over HTTPS
pub struct HttpApi<C> {
    client: Client,
    base_url: String,
    credentials: C,
}

impl<C: CredentialProvider> HttpApi<C> {
    pub fn new(credentials: C) -> Result<Self> {
        Self::with_base_url(credentials, YOUTUBE_API_BASE)
    }

    pub fn with_base_url(credentials: C, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn api_key(&self) -> std::result::Result<String, ApiFailure> {
        match self.credentials.api_key() {
            Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(ApiFailure::Fatal("YOUTUBE_API_KEY is not set".to_string())),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        mut params: Vec<(&'static str, String)>,
    ) -> std::result::Result<T, ApiFailure> {
        params.push(("key", self.api_key()?));

        let response = self
            .client
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(&params)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_transport)?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiFailure::Fatal(format!("unexpected {} response: {}", endpoint, e)))
    }
}

#[async_trait]
impl<C: CredentialProvider> YouTubeApi for HttpApi<C> {
    async fn search_page(&self, request: &SearchRequest) -> std::result::Result<SearchPage, ApiFailure> {
        let response: SearchListResponse = self.get("search", request.params()).await?;

        let ids = response
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .map(CandidateId::from)
            .collect();

        Ok(SearchPage {
            ids,
            next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    async fn video_details(&self, ids: &[CandidateId]) -> std::result::Result<Vec<VideoItem>, ApiFailure> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = ids.iter().map(CandidateId::as_str).collect::<Vec<_>>().join(",");
        let params = vec![
            ("part", "snippet,contentDetails,statistics".to_string()),
            ("id", joined),
            ("maxResults", ids.len().to_string()),
        ];

        let response: VideoListResponse = self.get("videos", params).await?;
        Ok(response.items)
    }
}
