//! Cell and header normalization for spreadsheet import.
//!
//! - Headers: trimmed, lowercased
//! - Cells: typed values, blank text treated as missing
//! - Dates and instants: spreadsheet date cells or a handful of text layouts

use calamine::{Data, DataType};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// A non-empty cell value
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Value as the operator would read it in the sheet.
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
            Self::DateTime(dt) => {
                if dt.time() == NaiveTime::MIN {
                    dt.format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
        }
    }

    /// Text trimmed of surrounding whitespace
    pub fn trimmed(&self) -> String {
        self.as_text().trim().to_string()
    }
}

/// Normalize a header for alias matching
pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// Convert a workbook cell; `None` for empty or whitespace-only cells.
pub fn cell_value(data: &Data) -> Option<CellValue> {
    match data {
        Data::Empty => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::DateTime(_) => data.as_datetime().map(CellValue::DateTime),
        Data::DateTimeIso(s) => Some(
            parse_naive_datetime(s)
                .map(CellValue::DateTime)
                .unwrap_or_else(|| CellValue::Text(s.clone())),
        ),
        Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        Data::Error(e) => Some(CellValue::Text(e.to_string())),
    }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y", "%d %B %Y", "%B %d, %Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    // en-US locale rendering written by older exports
    "%m/%d/%Y, %I:%M:%S %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
];

fn parse_naive_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
}

fn parse_naive_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
}

/// Calendar date of a cell, if it holds one.
pub fn cell_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Text(s) => parse_naive_date(s)
            .or_else(|| DateTime::parse_from_rfc3339(s.trim()).ok().map(|dt| dt.date_naive()))
            .or_else(|| parse_naive_datetime(s).map(|dt| dt.date())),
        CellValue::Number(_) | CellValue::Bool(_) => None,
    }
}

/// Instant of a cell, if it holds one. Zone-less values are read as UTC.
pub fn cell_instant(cell: &CellValue) -> Option<DateTime<Utc>> {
    match cell {
        CellValue::DateTime(dt) => Some(dt.and_utc()),
        CellValue::Text(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| parse_naive_datetime(s).map(|dt| dt.and_utc()))
            .or_else(|| parse_naive_date(s).map(|d| d.and_time(NaiveTime::MIN).and_utc())),
        CellValue::Number(_) | CellValue::Bool(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Unique Ref. No. "), "unique ref. no.");
        assert_eq!(normalize_header("7-Day Avg Strength (N/mm²)"), "7-day avg strength (n/mm²)");
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(CellValue::Number(450.0).as_text(), "450");
        assert_eq!(CellValue::Number(8.21).as_text(), "8.21");
        assert_eq!(CellValue::Bool(true).as_text(), "TRUE");
        let midnight = NaiveDate::from_ymd_opt(2024, 7, 28).unwrap().and_time(NaiveTime::MIN);
        assert_eq!(CellValue::DateTime(midnight).as_text(), "2024-07-28");
    }

    #[test]
    fn test_blank_cells_are_missing() {
        assert_eq!(cell_value(&Data::Empty), None);
        assert_eq!(cell_value(&Data::String("   ".into())), None);
        assert_eq!(cell_value(&Data::Int(7)), Some(CellValue::Number(7.0)));
    }

    #[test]
    fn test_dates() {
        let d = NaiveDate::from_ymd_opt(2024, 7, 28).unwrap();
        assert_eq!(cell_date(&text("2024-07-28")), Some(d));
        assert_eq!(cell_date(&text("07/28/2024")), Some(d));
        assert_eq!(cell_date(&text("28-Jul-2024")), Some(d));
        assert_eq!(cell_date(&text("2024-07-28T10:30:00+02:00")), Some(d));
        assert_eq!(cell_date(&text("next tuesday")), None);
        assert_eq!(cell_date(&CellValue::Number(45501.0)), None);
    }

    #[test]
    fn test_instants() {
        let expected = Utc.with_ymd_and_hms(2024, 8, 1, 14, 5, 9).unwrap();
        assert_eq!(cell_instant(&text("2024-08-01T14:05:09.000Z")), Some(expected));
        assert_eq!(cell_instant(&text("2024-08-01 14:05:09")), Some(expected));
        assert_eq!(cell_instant(&text("8/1/2024, 2:05:09 PM")), Some(expected));
        assert_eq!(cell_instant(&text("")), None);
        assert_eq!(cell_instant(&text("N/A")), None);
    }
}
