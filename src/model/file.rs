use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;

/// Metadata for one entry of the crawled tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct File {
    /// Base name of the entry
    pub name: String,

    /// Path relative to the task root, cleaned, without leading slash
    pub path: String,

    /// Whether the entry is a directory listing
    pub is_dir: bool,

    /// Size in bytes, if the server reported a valid one
    pub size: Option<u64>,

    /// Last modification time, if the server reported a parseable one
    pub modified: Option<DateTime<Utc>>,
}

impl File {
    pub fn new(name: impl Into<String>, path: impl Into<String>, is_dir: bool) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_dir,
            size: None,
            modified: None,
        }
    }

    /// Applies a `Content-Length` header value
    ///
    /// Empty, negative or non-numeric values leave the size unset.
    pub fn apply_content_length(&mut self, value: &str) {
        if let Ok(size) = value.trim().parse::<i64>() {
            if size >= 0 {
                self.size = Some(size as u64);
            }
        }
    }

    /// Applies a `Last-Modified` header value
    ///
    /// Tries RFC 1123, then RFC 850, then a bare `YYYY-MM-DD` prefix. The
    /// first format that parses wins; if none does the time stays unset.
    /// asctime() dates are not recognized.
    pub fn apply_last_modified(&mut self, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }

        self.modified = parse_rfc1123(value)
            .or_else(|| parse_rfc850(value))
            .or_else(|| parse_date_prefix(value));
    }
}

/// `Mon, 02 Jan 2006 15:04:05 GMT`
fn parse_rfc1123(value: &str) -> Option<DateTime<Utc>> {
    parse_zoned(value, "%d %b %Y %H:%M:%S")
}

/// `Monday, 02-Jan-06 15:04:05 GMT`
fn parse_rfc850(value: &str) -> Option<DateTime<Utc>> {
    parse_zoned(value, "%d-%b-%y %H:%M:%S")
}

/// Parses `<weekday>, <stamp> <zone>` where the zone must name UTC
///
/// The weekday is skipped unchecked; servers get it wrong more often than
/// the date itself.
fn parse_zoned(value: &str, format: &str) -> Option<DateTime<Utc>> {
    let (rest, zone) = value.rsplit_once(' ')?;
    if !matches!(zone, "GMT" | "UTC" | "UT" | "Z") {
        return None;
    }
    let (_weekday, stamp) = rest.split_once(", ")?;
    NaiveDateTime::parse_from_str(stamp.trim(), format)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// `2006-01-02...`
fn parse_date_prefix(value: &str) -> Option<DateTime<Utc>> {
    let prefix = value.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
