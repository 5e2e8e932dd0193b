//! Generated values and their canonical text rendering.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt;

/// Canonical DATE rendering, e.g. `07-MAR-2001`.
pub const DATE_FORMAT: &str = "%d-%b-%Y";

/// Canonical TIMESTAMP rendering, e.g. `07-MAR-2001 13:05:59`.
pub const TIMESTAMP_FORMAT: &str = "%d-%b-%Y %H:%M:%S";

/// A single generated value.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedValue {
    /// INT (and INT-encoded key) value
    Int(u64),

    /// REAL value
    Real(f64),

    /// STRING value
    Text(String),

    /// DATE value
    Date(NaiveDate),

    /// TIMESTAMP value
    Timestamp(NaiveDateTime),
}

impl GeneratedValue {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for GeneratedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::Date(d) => f.write_str(&d.format(DATE_FORMAT).to_string().to_uppercase()),
            Self::Timestamp(ts) => {
                f.write_str(&ts.format(TIMESTAMP_FORMAT).to_string().to_uppercase())
            }
        }
    }
}

/// One generated row, values in column declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedRow {
    /// Table name
    pub table: String,
    /// Zero-based row index within the table
    pub index: u64,
    /// Values in column declaration order
    pub values: Vec<GeneratedValue>,
}

impl GeneratedRow {
    pub fn new(table: impl Into<String>, index: u64, values: Vec<GeneratedValue>) -> Self {
        Self {
            table: table.into(),
            index,
            values,
        }
    }

    pub fn get(&self, position: usize) -> Option<&GeneratedValue> {
        self.values.get(position)
    }

    /// Render every value to its canonical text form.
    pub fn render(&self) -> Vec<String> {
        self.values.iter().map(|v| v.to_string()).collect()
    }
}

/// Parse a reference instant for DATE/TIMESTAMP columns.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD` and the canonical
/// `DD-MON-YYYY` forms.
pub fn parse_instant(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT) {
        return Some(dt);
    }

    for format in ["%Y-%m-%d", DATE_FORMAT] {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// The Unix epoch as a naive instant.
pub fn unix_epoch() -> NaiveDateTime {
    NaiveDateTime::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_scalars() {
        assert_eq!(GeneratedValue::Int(42).to_string(), "42");
        assert_eq!(GeneratedValue::Real(0.25).to_string(), "0.25");
        assert_eq!(GeneratedValue::Text("a#b".into()).to_string(), "a#b");
    }

    #[test]
    fn test_render_date_and_timestamp() {
        let date = NaiveDate::from_ymd_opt(2001, 3, 7).unwrap();
        assert_eq!(GeneratedValue::Date(date).to_string(), "07-MAR-2001");

        let ts = date.and_hms_opt(13, 5, 59).unwrap();
        assert_eq!(
            GeneratedValue::Timestamp(ts).to_string(),
            "07-MAR-2001 13:05:59"
        );
    }

    #[test]
    fn test_parse_instant_formats() {
        let expected = NaiveDate::from_ymd_opt(2020, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        assert_eq!(parse_instant("2020-01-02"), Some(expected));
        assert_eq!(parse_instant("02-JAN-2020"), Some(expected));
        assert_eq!(parse_instant("2020-01-02T00:00:00Z"), Some(expected));
        assert_eq!(parse_instant("2020-01-02 00:00:00"), Some(expected));
        assert_eq!(parse_instant("not a date"), None);
    }

    #[test]
    fn test_unix_epoch() {
        assert_eq!(unix_epoch().and_utc().timestamp(), 0);
    }

    #[test]
    fn test_row_render() {
        let row = GeneratedRow::new(
            "t",
            0,
            vec![GeneratedValue::Int(1), GeneratedValue::Text("x".into())],
        );
        assert_eq!(row.render(), vec!["1", "x"]);
        assert_eq!(row.get(1).and_then(|v| v.as_str()), Some("x"));
    }
}
