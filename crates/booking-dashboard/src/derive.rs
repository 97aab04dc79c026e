//! Date parsing and derived numeric columns

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

use crate::constants;
use crate::frame::{Column, Frame, Values};

static CURRENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(constants::CURRENCY_PATTERN).expect("currency pattern is valid"));

static SLASH_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(constants::SLASH_DATE_PATTERN).expect("slash date pattern is valid"));

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%B %d, %Y %H:%M",
    "%B %d, %Y %I:%M %p",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%B %d, %Y"];

const MONTH_FIRST_FORMATS: &[&str] = &["%m/%d/%Y %H:%M:%S", "%m/%d/%Y %H:%M", "%m/%d/%Y"];
const DAY_FIRST_FORMATS: &[&str] = &["%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M", "%d/%m/%Y"];

/// Field order of `a/b/yyyy` dates, decided once per column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlashOrder {
    #[default]
    MonthFirst,
    DayFirst,
}

impl SlashOrder {
    /// Day-first as soon as any cell starts with a field above 12
    pub fn infer<'a>(cells: impl IntoIterator<Item = &'a str>) -> Self {
        let day_first = cells.into_iter().any(|cell| {
            SLASH_DATE_RE
                .captures(cell.trim())
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .is_some_and(|first| first > 12)
        });
        if day_first {
            SlashOrder::DayFirst
        } else {
            SlashOrder::MonthFirst
        }
    }

    fn formats(self) -> &'static [&'static str] {
        match self {
            SlashOrder::MonthFirst => MONTH_FIRST_FORMATS,
            SlashOrder::DayFirst => DAY_FIRST_FORMATS,
        }
    }
}

/// Parse a date or date-time cell; `None` when no known format fits.
/// Slash dates are read month-first.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    parse_datetime_with(value, SlashOrder::MonthFirst)
}

/// [`parse_datetime`] with an explicit order for slash dates
pub fn parse_datetime_with(value: &str, order: SlashOrder) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    let midnight = |d: NaiveDate| d.and_hms_opt(0, 0, 0);
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(midnight)
        })
        .or_else(|| {
            order.formats().iter().find_map(|fmt| {
                NaiveDateTime::parse_from_str(value, fmt)
                    .ok()
                    .or_else(|| NaiveDate::parse_from_str(value, fmt).ok().and_then(midnight))
            })
        })
}

/// Amount from a payment string: first match of `€?(\d+\.?\d*)`
pub fn parse_currency(value: &str) -> Option<f64> {
    CURRENCY_RE
        .captures(value)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn name_contains(name: &str, markers: &[&str]) -> bool {
    let name = name.to_lowercase();
    markers.iter().any(|m| name.contains(m))
}

/// Convert date columns in place and append `_numeric` and `_hours` columns
pub fn process(frame: &mut Frame) {
    let names: Vec<String> = frame.column_names().into_iter().map(str::to_string).collect();

    for name in &names {
        if name_contains(name, constants::DATE_COLUMN_MARKERS) {
            if let Some(column) = frame.column_mut(name) {
                let cells: Vec<Option<String>> = (0..column.values.len()).map(|row| column.label(row)).collect();
                let order = SlashOrder::infer(cells.iter().flatten().map(String::as_str));
                let parsed = cells
                    .iter()
                    .map(|cell| cell.as_deref().and_then(|v| parse_datetime_with(v, order)))
                    .collect();
                column.values = Values::DateTime(parsed);
            }
        }
    }

    let mut derived = Vec::new();
    for column in frame.columns() {
        match &column.values {
            Values::Text(cells) if name_contains(&column.name, constants::CURRENCY_COLUMN_MARKERS) => {
                let amounts = cells
                    .iter()
                    .map(|cell| cell.as_deref().and_then(parse_currency))
                    .collect();
                derived.push(Column::new(
                    format!("{}{}", column.name, constants::NUMERIC_SUFFIX),
                    Values::Number(amounts),
                ));
            }
            Values::Number(minutes) if name_contains(&column.name, &[constants::DURATION_COLUMN_MARKER]) => {
                let hours = minutes
                    .iter()
                    .map(|m| m.map(|m| m / constants::MINUTES_PER_HOUR))
                    .collect();
                derived.push(Column::new(
                    format!("{}{}", column.name, constants::HOURS_SUFFIX),
                    Values::Number(hours),
                ));
            }
            _ => {}
        }
    }

    for column in derived {
        tracing::debug!("derived column {}", column.name);
        frame.push_column(column);
    }
}
