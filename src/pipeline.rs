use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, Utc};
use tokio::task::JoinHandle;

use crate::api::{DETAIL_BATCH_LIMIT, SEARCH_PAGE_SIZE, VideoItem, YouTubeApi};
use crate::duration;
use crate::error::Result;
use crate::fetcher::MetadataFetcher;
use crate::filter;
use crate::models::{CandidateId, DEFAULT_FILE_PREFIX, ExportJob, RunSummary, SearchQuery, VideoRecord};
use crate::retry::RetryPolicy;
use crate::search::SearchController;

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub file_name_prefix: String,
    pub retry: RetryPolicy,
    pub page_size: u32,
    pub batch_limit: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            file_name_prefix: DEFAULT_FILE_PREFIX.to_string(),
            retry: RetryPolicy::default(),
            page_size: SEARCH_PAGE_SIZE,
            batch_limit: DETAIL_BATCH_LIMIT,
        }
    }
}

/// Search → details → date filter → duration normalisation, strictly in
/// sequence. Any error aborts the whole run.
pub struct AggregationPipeline<'a, A: ?Sized> {
    api: &'a A,
    options: PipelineOptions,
}

impl<'a, A: YouTubeApi + ?Sized> AggregationPipeline<'a, A> {
    pub fn new(api: &'a A, options: PipelineOptions) -> Self {
        Self { api, options }
    }

    pub async fn run(&self, query: SearchQuery) -> Result<ExportJob> {
        query.validate()?;
        let range = query.date_range();

        let search = SearchController::new(self.api, self.options.retry).with_page_size(self.options.page_size);
        let found = search.search(query).try_collect().await?;

        let mut summary = RunSummary {
            candidates: found.len(),
            ..Default::default()
        };
        let ids = dedup_in_order(found);

        let fetcher = MetadataFetcher::new(self.api, self.options.retry).with_batch_limit(self.options.batch_limit);
        let mut details = fetcher.fetch_details(&ids).await?;

        let mut records = Vec::with_capacity(ids.len());
        for id in &ids {
            let Some(item) = details.remove(id) else {
                summary.missing += 1;
                continue;
            };
            let Some(published_at) = published_date(&item) else {
                summary.missing += 1;
                continue;
            };
            if !filter::matches(published_at, range.as_ref()) {
                summary.out_of_range += 1;
                continue;
            }
            records.push(into_record(item, published_at));
        }

        Ok(ExportJob {
            file_name_prefix: self.options.file_name_prefix.clone(),
            records,
            created_on: today(),
            summary,
        })
    }
}

/// Run the pipeline on the runtime's worker threads.
///
/// Callers that must stay responsive (a form, a TUI) hand over the query and
/// await the handle; dropping the handle abandons the result but does not
/// stop the run.
pub fn spawn<A>(api: Arc<A>, options: PipelineOptions, query: SearchQuery) -> JoinHandle<Result<ExportJob>>
where
    A: YouTubeApi + 'static,
{
    tokio::spawn(async move { AggregationPipeline::new(api.as_ref(), options).run(query).await })
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Keep the first occurrence of each id
fn dedup_in_order(ids: Vec<CandidateId>) -> Vec<CandidateId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

/// UTC calendar day of `snippet.publishedAt`
fn published_date(item: &VideoItem) -> Option<NaiveDate> {
    let raw = item.snippet.published_at.as_deref()?;
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

fn into_record(item: VideoItem, published_at: NaiveDate) -> VideoRecord {
    let duration_hms = duration::normalize(item.content_details.duration.as_deref().unwrap_or_default());
    let thumbnail_url = item.snippet.thumbnails.best_url().unwrap_or_default().to_string();

    VideoRecord {
        view_count: item.statistics.views(),
        comment_count: item.statistics.comments(),
        video_id: item.id,
        title: item.snippet.title,
        channel_name: item.snippet.channel_title,
        channel_id: item.snippet.channel_id,
        duration_hms,
        tags: item.snippet.tags,
        thumbnail_url,
        published_at,
    }
}
