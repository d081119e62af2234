use chrono::NaiveDate;

/// Inclusive publication-date window at day granularity.
///
/// Either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start.is_none_or(|start| start <= day) && self.end.is_none_or(|end| day <= end)
    }
}

/// True when `published_at` falls inside `range`, or when there is no range
pub fn matches(published_at: NaiveDate, range: Option<&DateRange>) -> bool {
    range.is_none_or(|range| range.contains(published_at))
}
