use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use log::{info, warn};

use crate::api::HttpApi;
use crate::config::{EnvCredentials, api_base_url, default_output_dir, ensure_output_dir};
use crate::error::Result;
use crate::export;
use crate::models::{SearchMode, SearchQuery};
use crate::pipeline::{self, PipelineOptions};

/// Inputs collected from the command line
#[derive(Debug, Clone)]
pub struct SearchArgs {
    pub value: String,
    pub mode: SearchMode,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub prefix: String,
    pub out: Option<PathBuf>,
    pub limit: Option<usize>,
}

pub async fn run(args: SearchArgs) -> Result<()> {
    let query = SearchQuery::new(args.mode, args.value)
        .between(args.from, args.to)
        .limit(args.limit);
    query.validate()?;

    let out_dir = args.out.unwrap_or_else(default_output_dir);
    ensure_output_dir(&out_dir)?;

    let api = Arc::new(HttpApi::with_base_url(EnvCredentials, api_base_url())?);
    let options = PipelineOptions {
        file_name_prefix: args.prefix,
        ..Default::default()
    };

    info!("Searching YouTube by {} for '{}'", query.mode, query.value);
    if let Some(range) = query.date_range() {
        info!(
            "Published between {} and {}",
            range.start.map(|d| d.to_string()).unwrap_or_else(|| "the beginning".to_string()),
            range.end.map(|d| d.to_string()).unwrap_or_else(|| "today".to_string()),
        );
    }

    let job = pipeline::spawn(api, options, query).await??;

    let summary = job.summary;
    info!(
        "{} candidate(s), {} row(s) kept, {} without details, {} outside the date range",
        summary.candidates,
        job.records.len(),
        summary.missing,
        summary.out_of_range
    );
    if job.records.is_empty() {
        warn!("No videos matched; the workbook will only contain the header row");
    }

    let path = export::write(job, &out_dir)?;
    info!("Saved {}", path.display());
    println!("{}", path.display());

    Ok(())
}
