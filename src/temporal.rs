// ⏰ Temporal Model - membership ranges
//
// Two times matter for a member:
// 1. Sheet time: Join Date / Leave Date as typed into the spreadsheet
// 2. Processing time: when this run happens
//
// `isLegacy` is derived from both on every run and never stored on its own.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

/// Date layouts produced by spreadsheet CSV exports
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a sheet date cell. Returns None for anything unrecognized.
pub fn parse_sheet_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime.date());
        }
    }

    None
}

// ============================================================================
// TENURE
// ============================================================================

/// Derived membership range of one member at processing time `now`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tenure {
    pub start_year: i32,
    pub end_year: i32,
    pub is_legacy: bool,
}

impl Tenure {
    /// `left` is None when the member has no recorded departure
    pub fn new(joined: NaiveDate, left: Option<NaiveDate>, now: DateTime<Utc>) -> Self {
        let end_year = left.map(|d| d.year()).unwrap_or_else(|| now.year());

        Tenure {
            start_year: joined.year(),
            end_year,
            is_legacy: left.map(|d| has_left(d, now)).unwrap_or(false),
        }
    }
}

/// Leave date strictly before the processing time (midnight UTC of that day)
pub fn has_left(leave: NaiveDate, now: DateTime<Utc>) -> bool {
    leave.and_hms_opt(0, 0, 0).map(|t| t.and_utc() < now).unwrap_or(false)
}
