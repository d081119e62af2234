use std::fmt;

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::filter::DateRange;

/// Prefix used for export files when the caller does not provide one
pub const DEFAULT_FILE_PREFIX: &str = "youtube_results";

/// What the search value identifies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Keyword,
    ChannelId,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword => write!(f, "keyword"),
            Self::ChannelId => write!(f, "channel"),
        }
    }
}

/// A single collection request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub mode: SearchMode,
    pub value: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Stop after this many candidates. `None` follows every page.
    pub max_results: Option<usize>,
}

impl SearchQuery {
    pub fn keyword(value: impl Into<String>) -> Self {
        Self::new(SearchMode::Keyword, value)
    }

    pub fn channel(channel_id: impl Into<String>) -> Self {
        Self::new(SearchMode::ChannelId, channel_id)
    }

    pub fn new(mode: SearchMode, value: impl Into<String>) -> Self {
        Self {
            mode,
            value: value.into().trim().to_string(),
            start_date: None,
            end_date: None,
            max_results: None,
        }
    }

    pub fn between(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn limit(mut self, max_results: Option<usize>) -> Self {
        self.max_results = max_results;
        self
    }

    /// Date range to filter on, if either bound is set
    pub fn date_range(&self) -> Option<DateRange> {
        if self.start_date.is_none() && self.end_date.is_none() {
            return None;
        }
        Some(DateRange::new(self.start_date, self.end_date))
    }

    /// Reject queries the API would refuse anyway
    pub fn validate(&self) -> Result<()> {
        if self.value.trim().is_empty() {
            return Err(Error::FatalApi(format!(
                "malformed query: {} value must not be empty",
                self.mode
            )));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(Error::FatalApi(format!(
                    "malformed query: start date {} is after end date {}",
                    start, end
                )));
            }
        }
        if self.max_results == Some(0) {
            return Err(Error::FatalApi(
                "malformed query: result limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Video identifier returned by search, not yet enriched
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateId(String);

impl CandidateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CandidateId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One exported row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub channel_name: String,
    pub channel_id: String,
    /// Always `HH:MM:SS`
    pub duration_hms: String,
    pub view_count: u64,
    pub comment_count: u64,
    pub tags: Vec<String>,
    pub thumbnail_url: String,
    pub published_at: NaiveDate,
}

/// Why candidates did not make it into the export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Identifiers yielded by search, duplicates included
    pub candidates: usize,
    /// No usable detail record (deleted, private, unparseable date)
    pub missing: usize,
    /// Published outside the requested range
    pub out_of_range: usize,
}

/// Finished result set, consumed once by [`crate::export::write`]
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub file_name_prefix: String,
    pub records: Vec<VideoRecord>,
    pub created_on: NaiveDate,
    pub summary: RunSummary,
}
