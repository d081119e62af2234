use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet, XlsxError};

use crate::error::{Error, Result};
use crate::models::{DEFAULT_FILE_PREFIX, ExportJob, VideoRecord};

pub const SHEET_NAME: &str = "Videos";

/// Header row, in column order
pub const COLUMNS: [&str; 9] = [
    "Title",
    "Channel Title",
    "Channel ID",
    "Duration",
    "Views",
    "Comments",
    "Tags",
    "Thumbnail URL",
    "Published Date",
];

const COLUMN_WIDTHS: [f64; 9] = [60.0, 28.0, 28.0, 10.0, 12.0, 10.0, 50.0, 48.0, 14.0];

pub const TAG_SEPARATOR: &str = ", ";

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1f]"#).expect("filename pattern is valid"));

/// Replace characters that cannot appear in a file name
pub fn sanitize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim();
    if trimmed.is_empty() {
        return DEFAULT_FILE_PREFIX.to_string();
    }
    UNSAFE_FILENAME_CHARS.replace_all(trimmed, "_").to_string()
}

/// `{prefix}_{YYYY-MM-DD}.xlsx`
pub fn file_name(job: &ExportJob) -> String {
    format!(
        "{}_{}.xlsx",
        sanitize_prefix(&job.file_name_prefix),
        job.created_on.format("%Y-%m-%d")
    )
}

/// Write `job` into `dir`, replacing any file of the same name.
///
/// Returns the path of the written workbook. If saving fails any partial
/// file is removed; a workbook that fails to build leaves the directory
/// untouched.
pub fn write(job: ExportJob, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(file_name(&job));
    let export_error = |e: XlsxError| Error::ExportWrite(format!("{}: {}", path.display(), e));

    let mut workbook = build_workbook(&job.records).map_err(export_error)?;

    if let Err(e) = workbook.save(&path) {
        let _ = fs::remove_file(&path);
        return Err(export_error(e));
    }
    Ok(path)
}

fn build_workbook(records: &[VideoRecord]) -> std::result::Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header = Format::new().set_bold();
    for (col, (name, width)) in COLUMNS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, *name, &header)?;
        worksheet.set_column_width(col, width)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    for (index, record) in records.iter().enumerate() {
        write_row(worksheet, index as u32 + 1, record, &date_format)?;
    }

    Ok(workbook)
}

fn write_row(
    worksheet: &mut Worksheet,
    row: u32,
    record: &VideoRecord,
    date_format: &Format,
) -> std::result::Result<(), XlsxError> {
    let published = ExcelDateTime::from_ymd(
        record.published_at.year() as u16,
        record.published_at.month() as u8,
        record.published_at.day() as u8,
    )?;

    worksheet.write_string(row, 0, &record.title)?;
    worksheet.write_string(row, 1, &record.channel_name)?;
    worksheet.write_string(row, 2, &record.channel_id)?;
    worksheet.write_string(row, 3, &record.duration_hms)?;
    worksheet.write_number(row, 4, record.view_count as f64)?;
    worksheet.write_number(row, 5, record.comment_count as f64)?;
    worksheet.write_string(row, 6, record.tags.join(TAG_SEPARATOR))?;
    worksheet.write_string(row, 7, &record.thumbnail_url)?;
    worksheet.write_datetime_with_format(row, 8, &published, date_format)?;
    Ok(())
}
