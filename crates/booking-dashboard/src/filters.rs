//! Optional filters over the appointments frame
//!
//! Filters run in a fixed order (date, status, service, role, country, price),
//! each against the result of the previous one. An unset filter, or one whose
//! bounds equal the observed range, leaves the rows untouched. The input frame
//! is never modified, so the caller keeps the unfiltered original for the
//! "N of M" summary.

use chrono::NaiveDate;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::columns::best_column;
use crate::constants;
use crate::frame::{Column, Frame};

/// What the user asked for; the default selects everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub statuses: Vec<String>,
    pub services: Vec<String>,
    pub roles: Vec<String>,
    pub countries: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

/// Resolved column names each filter works on
struct FilterColumns {
    date: Option<String>,
    status: Option<String>,
    service: Option<String>,
    role: Option<String>,
    country: Option<String>,
    price: Option<String>,
}

impl FilterColumns {
    fn resolve(frame: &Frame) -> Self {
        let names = frame.column_names();
        let best = |patterns: &[&str]| best_column(&names, patterns).map(str::to_string);

        Self {
            date: best(constants::FILTER_DATE_PATTERNS),
            status: best(constants::STATUS_PATTERNS),
            service: best(constants::SERVICE_PATTERNS),
            role: best(constants::ROLE_PATTERNS),
            country: best(constants::COUNTRY_PATTERNS),
            price: best(constants::PRICE_PATTERNS).map(|c| format!("{}{}", c, constants::NUMERIC_SUFFIX)),
        }
    }
}

/// Apply every filter in order and return the filtered copy
pub fn apply_filters(frame: &Frame, selection: &FilterSelection) -> Frame {
    let columns = FilterColumns::resolve(frame);
    let mut working = frame.clone();

    if let Some(column) = &columns.date {
        working = by_date_range(working, column, selection.date_from, selection.date_to);
    }
    let categories = [
        (&columns.status, &selection.statuses),
        (&columns.service, &selection.services),
        (&columns.role, &selection.roles),
        (&columns.country, &selection.countries),
    ];
    for (column, selected) in categories {
        if let Some(column) = column {
            working = by_category(working, column, selected);
        }
    }
    if let Some(column) = &columns.price {
        working = by_price_range(working, column, selection.min_price, selection.max_price);
    }

    working
}

/// Inclusive date range on the date component. A missing bound takes the
/// observed one; the full observed range is a no-op.
pub fn by_date_range(frame: Frame, column: &str, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Frame {
    let Some(values) = frame.column(column).and_then(Column::datetimes) else {
        return frame;
    };
    let Some((min, max)) = bounds(values.iter().flatten().map(|d| d.date())) else {
        return frame;
    };

    let from = from.unwrap_or(min);
    let to = to.unwrap_or(max);
    if from == min && to == max {
        return frame;
    }

    frame.filter_by(|row| values[row].is_some_and(|d| (from..=to).contains(&d.date())))
}

/// Multi-value inclusion. Selected values absent from the current rows are
/// dropped; if nothing remains the result is empty.
pub fn by_category(frame: Frame, column: &str, selected: &[String]) -> Frame {
    if selected.is_empty() {
        return frame;
    }
    let Some(col) = frame.column(column) else {
        return frame;
    };
    let observed = col.distinct_labels();
    if observed.is_empty() {
        return frame;
    }

    let valid: HashSet<&str> = selected
        .iter()
        .map(String::as_str)
        .filter(|s| observed.contains(*s))
        .collect();
    if valid.is_empty() {
        return frame.empty_like();
    }

    frame.filter_by(|row| col.label(row).is_some_and(|label| valid.contains(label.as_str())))
}

/// Inclusive price range on a numeric column; the observed range is a no-op
pub fn by_price_range(frame: Frame, column: &str, min: Option<f64>, max: Option<f64>) -> Frame {
    let Some(values) = frame.column(column).and_then(Column::numbers) else {
        return frame;
    };
    let Some((lowest, highest)) = float_bounds(values) else {
        return frame;
    };

    let min = min.unwrap_or(lowest);
    let max = max.unwrap_or(highest);
    if min == lowest && max == highest {
        return frame;
    }

    frame.filter_by(|row| values[row].is_some_and(|v| (min..=max).contains(&v)))
}

fn bounds<T: Ord + Copy>(values: impl Iterator<Item = T>) -> Option<(T, T)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Observed min/max of the present values
pub fn float_bounds(values: &[Option<f64>]) -> Option<(f64, f64)> {
    values.iter().flatten().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

// =============================================================================
// Options and Summary
// =============================================================================

/// Choices offered for one categorical filter
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryOptions {
    pub column: String,
    /// Values a user may select, in display order
    pub options: Vec<String>,
    /// Values present in the data, sorted
    pub observed: Vec<String>,
}

impl CategoryOptions {
    /// "Current data has: ..." when fewer values are present than offered
    pub fn hint(&self) -> Option<String> {
        (self.observed.len() < self.options.len()).then(|| format!("Current data has: {}", self.observed.join(", ")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DateOptions {
    pub column: String,
    pub min: NaiveDate,
    pub max: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceOptions {
    pub column: String,
    pub min: f64,
    pub max: f64,
}

/// Every filter's choices for a frame; `None` where the column is absent or empty
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    pub date: Option<DateOptions>,
    pub status: Option<CategoryOptions>,
    pub service: Option<CategoryOptions>,
    pub role: Option<CategoryOptions>,
    pub country: Option<CategoryOptions>,
    pub price: Option<PriceOptions>,
}

impl FilterOptions {
    pub fn from_frame(frame: &Frame) -> Self {
        let columns = FilterColumns::resolve(frame);

        let date = columns.date.and_then(|column| {
            let values = frame.column(&column)?.datetimes()?;
            let (min, max) = bounds(values.iter().flatten().map(|d| d.date()))?;
            Some(DateOptions { column, min, max })
        });

        let price = columns.price.and_then(|column| {
            let (min, max) = float_bounds(frame.column(&column)?.numbers()?)?;
            Some(PriceOptions { column, min, max })
        });

        Self {
            date,
            status: columns.status.and_then(|c| category(frame, c, status_order)),
            service: columns.service.and_then(|c| category(frame, c, |observed| observed.to_vec())),
            role: columns.role.and_then(|c| category(frame, c, role_order)),
            country: columns.country.and_then(|c| category(frame, c, |observed| observed.to_vec())),
            price,
        }
    }
}

fn category(frame: &Frame, column: String, order: impl Fn(&[String]) -> Vec<String>) -> Option<CategoryOptions> {
    let observed: Vec<String> = frame.column(&column)?.distinct_labels().into_iter().collect();
    if observed.is_empty() {
        return None;
    }
    Some(CategoryOptions {
        column,
        options: order(&observed),
        observed,
    })
}

/// Observed statuses plus the known set, sorted
fn status_order(observed: &[String]) -> Vec<String> {
    let mut all: BTreeSet<String> = observed.iter().cloned().collect();
    all.extend(constants::KNOWN_STATUSES.iter().map(|s| s.to_string()));
    all.into_iter().collect()
}

/// Leader, Follower, Both (when present), then the rest alphabetically
fn role_order(observed: &[String]) -> Vec<String> {
    let mut ordered: Vec<String> = constants::ROLE_ORDER
        .iter()
        .filter(|role| observed.iter().any(|o| o == *role))
        .map(|role| role.to_string())
        .collect();
    let mut others: Vec<String> = observed
        .iter()
        .filter(|o| !constants::ROLE_ORDER.contains(&o.as_str()))
        .cloned()
        .collect();
    others.sort();
    ordered.extend(others);
    ordered
}

/// Filtered versus total row count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSummary {
    pub shown: usize,
    pub total: usize,
}

impl FilterSummary {
    pub fn new(filtered: &Frame, original: &Frame) -> Self {
        Self {
            shown: filtered.len(),
            total: original.len(),
        }
    }

    pub fn is_filtered(&self) -> bool {
        self.shown < self.total
    }
}

impl fmt::Display for FilterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_filtered() {
            write!(f, "Showing {} of {} appointments", self.shown, self.total)
        } else {
            write!(f, "Showing all {} appointments", self.shown)
        }
    }
}
