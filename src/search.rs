use std::collections::VecDeque;

use crate::api::{SEARCH_PAGE_SIZE, SearchRequest, YouTubeApi};
use crate::error::Result;
use crate::models::{CandidateId, SearchQuery};
use crate::retry::RetryPolicy;

/// Drives `search.list` page by page
pub struct SearchController<'a, A: ?Sized> {
    api: &'a A,
    retry: RetryPolicy,
    page_size: u32,
}

impl<'a, A: YouTubeApi + ?Sized> SearchController<'a, A> {
    pub fn new(api: &'a A, retry: RetryPolicy) -> Self {
        Self {
            api,
            retry,
            page_size: SEARCH_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, SEARCH_PAGE_SIZE);
        self
    }

    /// Start a new paginated search. Nothing is requested until the first
    /// call to [`CandidateStream::next`].
    pub fn search(&self, query: SearchQuery) -> CandidateStream<'a, A> {
        let request = SearchRequest {
            mode: query.mode,
            value: query.value,
            published_after: query.start_date,
            published_before: query.end_date,
            page_token: None,
            page_size: self.page_size,
        };

        CandidateStream {
            api: self.api,
            retry: self.retry,
            request,
            buffer: VecDeque::new(),
            state: PageState::First,
            limit: query.max_results,
            yielded: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PageState {
    First,
    Next(String),
    Done,
}

/// Lazy, finite sequence of candidate ids.
///
/// Pages are fetched on demand. After the last page, the result cap, or an
/// error, the stream yields `None` forever.
pub struct CandidateStream<'a, A: ?Sized> {
    api: &'a A,
    retry: RetryPolicy,
    request: SearchRequest,
    buffer: VecDeque<CandidateId>,
    state: PageState,
    limit: Option<usize>,
    yielded: usize,
}

impl<A: YouTubeApi + ?Sized> CandidateStream<'_, A> {
    pub async fn next(&mut self) -> Option<Result<CandidateId>> {
        loop {
            if self.limit.is_some_and(|limit| self.yielded >= limit) {
                self.finish();
                return None;
            }

            if let Some(id) = self.buffer.pop_front() {
                self.yielded += 1;
                return Some(Ok(id));
            }

            let token = match std::mem::replace(&mut self.state, PageState::Done) {
                PageState::Done => return None,
                PageState::First => None,
                PageState::Next(token) => Some(token),
            };

            if let Err(e) = self.fetch_page(token).await {
                self.finish();
                return Some(Err(e));
            }
        }
    }

    /// Drain the stream, stopping at the first error
    pub async fn try_collect(mut self) -> Result<Vec<CandidateId>> {
        let mut ids = Vec::new();
        while let Some(id) = self.next().await {
            ids.push(id?);
        }
        Ok(ids)
    }

    async fn fetch_page(&mut self, token: Option<String>) -> Result<()> {
        self.request.page_token = token;

        let api = self.api;
        let request = &self.request;
        let page = self.retry.run(|| api.search_page(request)).await?;

        self.buffer.extend(page.ids);
        self.state = match page.next_page_token {
            Some(token) if !token.is_empty() => PageState::Next(token),
            _ => PageState::Done,
        };
        Ok(())
    }

    fn finish(&mut self) {
        self.buffer.clear();
        self.state = PageState::Done;
    }
}
