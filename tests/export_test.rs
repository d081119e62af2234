//! Workbook contents, read back with calamine

use std::path::Path;

use calamine::{Reader, Xlsx, open_workbook};
use chrono::NaiveDate;
use yt_sheet::export::{self, COLUMNS, SHEET_NAME};
use yt_sheet::models::{ExportJob, RunSummary, VideoRecord};

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("workbook opens");
    let range = workbook.worksheet_range(SHEET_NAME).expect("sheet exists");
    range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

fn job(records: Vec<VideoRecord>) -> ExportJob {
    ExportJob {
        file_name_prefix: "report".to_string(),
        records,
        created_on: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        summary: RunSummary::default(),
    }
}

fn record(id: &str, tags: &[&str]) -> VideoRecord {
    VideoRecord {
        video_id: id.to_string(),
        title: format!("Video {}", id),
        channel_name: "Lofi Girl".to_string(),
        channel_id: "UCSJ4gkVC6NrvII8umztf0Ow".to_string(),
        duration_hms: "01:02:03".to_string(),
        view_count: 1500,
        comment_count: 42,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        thumbnail_url: format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", id),
        published_at: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
    }
}

#[test]
fn test_empty_job_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();

    let path = export::write(job(Vec::new()), dir.path()).unwrap();

    assert_eq!(path, dir.path().join("report_2024-05-01.xlsx"));
    let rows = read_rows(&path);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0], COLUMNS.to_vec());
    assert_eq!(
        rows[0],
        vec![
            "Title",
            "Channel Title",
            "Channel ID",
            "Duration",
            "Views",
            "Comments",
            "Tags",
            "Thumbnail URL",
            "Published Date",
        ]
    );
}

#[test]
fn test_rows_follow_column_order() {
    let dir = tempfile::tempdir().unwrap();
    let records = vec![record("a", &["lofi", "study"]), record("b", &[])];

    let path = export::write(job(records), dir.path()).unwrap();

    let rows = read_rows(&path);
    assert_eq!(rows.len(), 3);

    let first = &rows[1];
    assert_eq!(first[0], "Video a");
    assert_eq!(first[1], "Lofi Girl");
    assert_eq!(first[2], "UCSJ4gkVC6NrvII8umztf0Ow");
    assert_eq!(first[3], "01:02:03");
    assert_eq!(first[4], "1500");
    assert_eq!(first[5], "42");
    assert_eq!(first[6], "lofi, study");
    assert_eq!(first[7], "https://i.ytimg.com/vi/a/hqdefault.jpg");
    assert!(!first[8].is_empty());

    assert_eq!(rows[2][0], "Video b");
    assert_eq!(rows[2][6], "");
}

#[test]
fn test_rewrite_replaces_previous_rows() {
    let dir = tempfile::tempdir().unwrap();

    export::write(job(vec![record("a", &[]), record("b", &[])]), dir.path()).unwrap();
    let path = export::write(job(vec![record("c", &[])]), dir.path()).unwrap();

    let rows = read_rows(&path);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][0], "Video c");
}
