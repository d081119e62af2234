use std::collections::{HashMap, HashSet};

use crate::api::{DETAIL_BATCH_LIMIT, VideoItem, YouTubeApi};
use crate::error::Result;
use crate::models::CandidateId;
use crate::retry::RetryPolicy;

/// Looks up detail records in batches of at most `batch_limit` ids
pub struct MetadataFetcher<'a, A: ?Sized> {
    api: &'a A,
    retry: RetryPolicy,
    batch_limit: usize,
}

impl<'a, A: YouTubeApi + ?Sized> MetadataFetcher<'a, A> {
    pub fn new(api: &'a A, retry: RetryPolicy) -> Self {
        Self {
            api,
            retry,
            batch_limit: DETAIL_BATCH_LIMIT,
        }
    }

    pub fn with_batch_limit(mut self, batch_limit: usize) -> Self {
        self.batch_limit = batch_limit.clamp(1, DETAIL_BATCH_LIMIT);
        self
    }

    pub fn batch_limit(&self) -> usize {
        self.batch_limit
    }

    /// Detail records keyed by id.
    ///
    /// Ids the platform no longer knows about are left out of the map. Any
    /// record the response carries for an id that was not asked for is
    /// ignored too.
    pub async fn fetch_details(&self, ids: &[CandidateId]) -> Result<HashMap<CandidateId, VideoItem>> {
        let mut details = HashMap::with_capacity(ids.len());

        for batch in ids.chunks(self.batch_limit) {
            let api = self.api;
            let items = self.retry.run(|| api.video_details(batch)).await?;

            let requested: HashSet<&str> = batch.iter().map(CandidateId::as_str).collect();
            for item in items {
                if requested.contains(item.id.as_str()) {
                    details.insert(CandidateId::new(item.id.clone()), item);
                }
            }
        }

        Ok(details)
    }
}
