//! In-memory YouTube API for driving the pipeline without a network
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use yt_sheet::api::{
    ApiFailure, ContentDetails, SearchPage, SearchRequest, Statistics, Thumbnail, Thumbnails, VideoItem,
    VideoSnippet, YouTubeApi,
};
use yt_sheet::models::CandidateId;

/// Search pages are chained with tokens `page-1`, `page-2`, ...
#[derive(Default)]
pub struct StubApi {
    pages: Vec<Vec<String>>,
    videos: HashMap<String, VideoItem>,
    search_failures: Mutex<VecDeque<ApiFailure>>,
    detail_failures: Mutex<VecDeque<ApiFailure>>,
    search_requests: Mutex<Vec<SearchRequest>>,
    detail_batches: Mutex<Vec<Vec<String>>>,
}

impl StubApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, ids: &[&str]) -> Self {
        self.pages.push(ids.iter().map(|id| id.to_string()).collect());
        self
    }

    pub fn video(mut self, item: VideoItem) -> Self {
        self.videos.insert(item.id.clone(), item);
        self
    }

    /// Fail the next `times` search calls before answering normally
    pub fn failing_search(self, times: usize, failure: ApiFailure) -> Self {
        self.search_failures
            .lock()
            .unwrap()
            .extend(std::iter::repeat_n(failure, times));
        self
    }

    pub fn failing_details(self, times: usize, failure: ApiFailure) -> Self {
        self.detail_failures
            .lock()
            .unwrap()
            .extend(std::iter::repeat_n(failure, times));
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_requests.lock().unwrap().len()
    }

    pub fn search_requests(&self) -> Vec<SearchRequest> {
        self.search_requests.lock().unwrap().clone()
    }

    pub fn detail_batches(&self) -> Vec<Vec<String>> {
        self.detail_batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl YouTubeApi for StubApi {
    async fn search_page(&self, request: &SearchRequest) -> Result<SearchPage, ApiFailure> {
        self.search_requests.lock().unwrap().push(request.clone());
        if let Some(failure) = self.search_failures.lock().unwrap().pop_front() {
            return Err(failure);
        }

        let index = match request.page_token.as_deref() {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| ApiFailure::Fatal(format!("invalid page token {}", token)))?,
        };

        let ids = self.pages.get(index).cloned().unwrap_or_default();
        let next_page_token = (index + 1 < self.pages.len()).then(|| format!("page-{}", index + 1));

        Ok(SearchPage {
            ids: ids.into_iter().map(CandidateId::from).collect(),
            next_page_token,
        })
    }

    async fn video_details(&self, ids: &[CandidateId]) -> Result<Vec<VideoItem>, ApiFailure> {
        if let Some(failure) = self.detail_failures.lock().unwrap().pop_front() {
            return Err(failure);
        }
        self.detail_batches
            .lock()
            .unwrap()
            .push(ids.iter().map(|id| id.to_string()).collect());

        // Reverse to make sure callers do not rely on response order
        Ok(ids
            .iter()
            .rev()
            .filter_map(|id| self.videos.get(id.as_str()).cloned())
            .collect())
    }
}

/// A detail record with the fields the exporter reads
pub fn video(id: &str, published_at: &str, duration: &str) -> VideoItem {
    VideoItem {
        id: id.to_string(),
        snippet: VideoSnippet {
            title: format!("Video {}", id),
            channel_title: "Lofi Girl".to_string(),
            channel_id: "UCSJ4gkVC6NrvII8umztf0Ow".to_string(),
            published_at: Some(published_at.to_string()),
            tags: vec!["lofi".to_string(), "hip hop".to_string()],
            thumbnails: Thumbnails {
                high: Some(Thumbnail {
                    url: format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", id),
                }),
                ..Default::default()
            },
        },
        content_details: ContentDetails {
            duration: Some(duration.to_string()),
        },
        statistics: Statistics {
            view_count: Some("1500".to_string()),
            comment_count: Some("42".to_string()),
        },
    }
}

pub fn rate_limited() -> ApiFailure {
    ApiFailure::Transient("The request cannot be completed because you have exceeded your quota rate (429)".to_string())
}
