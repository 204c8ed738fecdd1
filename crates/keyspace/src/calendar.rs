use chrono::NaiveDate;
use std::collections::BTreeSet;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// Days in `[start, end]` that are not in `reserved`, ascending.
///
/// The store only answers prefix queries, so the window is enumerated here and the
/// reserved days are subtracted client-side. An inverted window yields no days.
pub fn available_days(
    start: NaiveDate,
    end: NaiveDate,
    reserved: impl IntoIterator<Item = NaiveDate>,
) -> Vec<NaiveDate> {
    let mut days: BTreeSet<NaiveDate> = start.iter_days().take_while(|d| *d <= end).collect();
    for day in reserved {
        days.remove(&day);
    }
    days.into_iter().collect()
}
