//! Typed spreadsheet cell values.

use calamine::Data;
use chrono::{Days, NaiveDate};

/// A single cell as seen by the row parser.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

/// Characters that render as nothing but survive `str::trim`.
const INVISIBLE: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}'];

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// `true` for empty cells and text that is only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// The cell rendered as trimmed text. Whole numbers print without a
    /// decimal part and dates print as ISO `YYYY-MM-DD`.
    pub fn to_trimmed_string(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) => format_number(*n),
            Self::Bool(b) => b.to_string(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    /// Trimmed text, or `None` when blank.
    pub fn to_optional_string(&self) -> Option<String> {
        let s = self.to_trimmed_string();
        if s.is_empty() {
            None
        } else {
            Some(s)
        }
    }
}

/// Strip whitespace and zero-width characters anywhere in `s`.
pub fn compact(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && !INVISIBLE.contains(c))
        .collect()
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Convert an Excel serial day number (1900 date system) into a date.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Self::Empty,
            Data::String(s) => Self::Text(s.clone()),
            Data::Float(n) => Self::Number(*n),
            Data::Int(n) => Self::Number(*n as f64),
            Data::Bool(b) => Self::Bool(*b),
            Data::DateTime(dt) => match excel_serial_to_date(dt.as_f64()) {
                Some(date) if dt.is_datetime() => Self::Date(date),
                _ => Self::Number(dt.as_f64()),
            },
            Data::DateTimeIso(s) => s
                .get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
                .map_or_else(|| Self::Text(s.clone()), Self::Date),
            Data::DurationIso(s) => Self::Text(s.clone()),
            Data::Error(e) => Self::Text(format!("#{e:?}")),
        }
    }
}
