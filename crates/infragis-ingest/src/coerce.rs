//! Lenient conversion of spreadsheet cells to numbers and dates

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use infragis_core::models::Cell;

const CURRENCY_SYMBOLS: [char; 4] = ['$', '€', '£', '¥'];

/// Date-only layouts, tried in order. `%y` precedes `%Y` so that a
/// four-digit year never matches the two-digit pattern.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Number from a cell
///
/// Text is stripped of currency symbols, thousands separators and whitespace
/// before parsing. Empty, unparseable and non-finite values give `None`.
pub fn coerce_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) => Some(*n).filter(|n| n.is_finite()),
        Cell::Text(text) => {
            let cleaned: String = text
                .chars()
                .filter(|c| !c.is_whitespace() && *c != ',' && !CURRENCY_SYMBOLS.contains(c))
                .collect();
            if cleaned.is_empty() {
                return None;
            }
            cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        Cell::Empty | Cell::Bool(_) => None,
    }
}

/// Calendar date from a cell
///
/// Numbers are spreadsheet serial days in the 1900 date system. Text is
/// tried against ISO, RFC 3339, slash and dash US layouts and spelled-out
/// month names.
pub fn parse_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Number(n) => from_serial_days(*n),
        Cell::Text(text) => parse_date_text(text.trim()),
        Cell::Empty | Cell::Bool(_) => None,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(|datetime| datetime.date())
        })
}

/// Serial day 1 is 1900-01-01. From serial 60 on the count includes the
/// phantom 1900-02-29, so later serials start one day earlier.
fn from_serial_days(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > 2_958_465.0 {
        return None;
    }
    let days = serial.floor() as i64;
    let epoch = if days < 60 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    epoch.checked_add_signed(Duration::days(days))
}

/// `YYYY-MM-DD` rendering used in feature properties
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_coerce_number_strips_currency() {
        assert_eq!(coerce_number(&Cell::text("$1,200,000")), Some(1_200_000.0));
        assert_eq!(coerce_number(&Cell::text(" € 3 500.50 ")), Some(3_500.5));
        assert_eq!(coerce_number(&Cell::text("£12")), Some(12.0));
        assert_eq!(coerce_number(&Cell::text("-93.6")), Some(-93.6));
        assert_eq!(coerce_number(&Cell::Number(41.6)), Some(41.6));
    }

    #[test]
    fn test_coerce_number_rejects() {
        assert_eq!(coerce_number(&Cell::text("")), None);
        assert_eq!(coerce_number(&Cell::text("  ")), None);
        assert_eq!(coerce_number(&Cell::text("abc")), None);
        assert_eq!(coerce_number(&Cell::text("NaN")), None);
        assert_eq!(coerce_number(&Cell::text("inf")), None);
        assert_eq!(coerce_number(&Cell::Number(f64::INFINITY)), None);
        assert_eq!(coerce_number(&Cell::Bool(true)), None);
        assert_eq!(coerce_number(&Cell::Empty), None);
    }

    #[test]
    fn test_parse_iso_dates() {
        assert_eq!(parse_date(&Cell::text("2024-03-15")), date(2024, 3, 15));
        assert_eq!(parse_date(&Cell::text("2024-03-15T10:30:00Z")), date(2024, 3, 15));
        assert_eq!(parse_date(&Cell::text("2024-03-15 08:00:00")), date(2024, 3, 15));
        assert_eq!(parse_date(&Cell::text("2024/03/15")), date(2024, 3, 15));
    }

    #[test]
    fn test_parse_us_dates() {
        assert_eq!(parse_date(&Cell::text("03/15/2024")), date(2024, 3, 15));
        assert_eq!(parse_date(&Cell::text("03-15-2024")), date(2024, 3, 15));
        assert_eq!(parse_date(&Cell::text("3/15/24")), date(2024, 3, 15));
    }

    #[test]
    fn test_parse_long_dates() {
        assert_eq!(parse_date(&Cell::text("March 15, 2024")), date(2024, 3, 15));
        assert_eq!(parse_date(&Cell::text("Mar 15 2024")), date(2024, 3, 15));
        assert_eq!(parse_date(&Cell::text("15 March 2024")), date(2024, 3, 15));
    }

    #[test]
    fn test_parse_serial_days() {
        assert_eq!(parse_date(&Cell::Number(1.0)), date(1900, 1, 1));
        assert_eq!(parse_date(&Cell::Number(59.0)), date(1900, 2, 28));
        assert_eq!(parse_date(&Cell::Number(61.0)), date(1900, 3, 1));
        assert_eq!(parse_date(&Cell::Number(45366.0)), date(2024, 3, 15));
        assert_eq!(parse_date(&Cell::Number(45366.75)), date(2024, 3, 15));
        assert_eq!(parse_date(&Cell::Number(-3.0)), None);
    }

    #[test]
    fn test_parse_date_rejects() {
        assert_eq!(parse_date(&Cell::text("not a date")), None);
        assert_eq!(parse_date(&Cell::text("")), None);
        assert_eq!(parse_date(&Cell::text("2024-02-30")), None);
        assert_eq!(parse_date(&Cell::Empty), None);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()), "2024-01-05");
    }
}
