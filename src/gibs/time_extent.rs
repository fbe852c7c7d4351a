//! Day-offset ranges derived from a layer's time-extent metadata.
//!
//! GIBS advertises availability as a list of ISO 8601 intervals of the form
//! `start/end[/period]`. The day slider works in whole days relative to
//! "now": the first interval's start bounds how far back it may go and the
//! last interval's end bounds how far forward.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Slider minimum used when a layer has no time extent.
pub const FALLBACK_MIN_OFFSET: i64 = -10;

/// Slider maximum used when a layer has no time extent.
pub const FALLBACK_MAX_OFFSET: i64 = 0;

const MILLIS_PER_DAY: i64 = 24 * 3600 * 1000;

/// Inclusive range of valid day offsets for the selected layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub min: i64,
    pub max: i64,
}

impl Default for DayRange {
    fn default() -> Self {
        Self {
            min: FALLBACK_MIN_OFFSET,
            max: FALLBACK_MAX_OFFSET,
        }
    }
}

impl DayRange {
    /// Clamps an offset into this range.
    pub fn clamp(&self, offset: i64) -> i64 {
        offset.clamp(self.min, self.max)
    }
}

/// Current wall-clock time in UTC.
pub fn now_utc() -> DateTime<Utc> {
    #[cfg(target_arch = "wasm32")]
    {
        DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Utc::now()
    }
}

/// Parses a single date token from a time-extent interval.
///
/// Accepts plain dates (`2020-01-01`, taken as midnight UTC) and full
/// RFC 3339 timestamps (`2020-01-01T00:00:00Z`).
pub fn parse_extent_date(token: &str) -> Option<DateTime<Utc>> {
    let token = token.trim();
    if let Ok(date) = NaiveDate::parse_from_str(token, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(token)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Whole days from `earlier` to `later`, rounded towards negative infinity.
fn floor_days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    (later - earlier).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

/// How far back the day slider may go for this extent.
///
/// Malformed start dates fall back to the empty-extent window.
pub fn min_offset(time_extent: &[String], now: DateTime<Utc>) -> i64 {
    let Some(first) = time_extent.first() else {
        return FALLBACK_MIN_OFFSET;
    };
    let token = first.split('/').next().unwrap_or_default();
    match parse_extent_date(token) {
        Some(start) => -floor_days_between(start, now),
        None => {
            log::warn!("Unparseable time extent start '{}', using fallback", first);
            FALLBACK_MIN_OFFSET
        }
    }
}

/// How far forward the day slider may go for this extent.
///
/// Negative when the layer's last available day is in the past.
pub fn max_offset(time_extent: &[String], now: DateTime<Utc>) -> i64 {
    let Some(last) = time_extent.last() else {
        return FALLBACK_MAX_OFFSET;
    };
    match last.split('/').nth(1).and_then(parse_extent_date) {
        Some(end) => floor_days_between(now, end),
        None => {
            log::warn!("Unparseable time extent end '{}', using fallback", last);
            FALLBACK_MAX_OFFSET
        }
    }
}

/// Both slider bounds. An inverted result collapses onto `max`.
pub fn day_range(time_extent: &[String], now: DateTime<Utc>) -> DayRange {
    let min = min_offset(time_extent, now);
    let max = max_offset(time_extent, now);
    DayRange {
        min: min.min(max),
        max,
    }
}

/// Calendar date shown for a given day offset.
pub fn date_for_offset(day_offset: i64, now: DateTime<Utc>) -> NaiveDate {
    (now + Duration::days(day_offset)).date_naive()
}

/// Slider label, e.g. `Mon Jan 20 2020`.
pub fn format_day_label(day_offset: i64, now: DateTime<Utc>) -> String {
    date_for_offset(day_offset, now)
        .format("%a %b %d %Y")
        .to_string()
}
