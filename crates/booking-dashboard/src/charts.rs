//! Aggregations behind the dashboard charts
//!
//! Every chart is optional: it is `None` when the frame has no column for it.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use crate::columns::best_column;
use crate::constants;
use crate::frame::{Column, Frame};

/// One bar or slice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Count {
    pub label: String,
    pub count: usize,
}

/// Service bar with a shortened axis label and the full name for detail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCount {
    pub service: String,
    pub display: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleBreakdown {
    /// Missing roles counted under "Not Specified"
    pub counts: Vec<Count>,
    pub with_role: usize,
    pub total: usize,
}

impl RoleBreakdown {
    pub fn caption(&self) -> String {
        format!("{} of {} appointments have role data", self.with_role, self.total)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Charts {
    pub timeline: Option<Vec<(NaiveDate, usize)>>,
    pub status: Option<Vec<Count>>,
    pub countries: Option<Vec<Count>>,
    pub services: Option<Vec<ServiceCount>>,
    pub roles: Option<RoleBreakdown>,
    pub revenue_by_country: Option<Vec<(String, f64)>>,
    pub revenue_by_day: Option<Vec<(NaiveDate, f64)>>,
}

impl Charts {
    pub fn build(frame: &Frame) -> Self {
        Self {
            timeline: timeline(frame),
            status: category_column(frame, constants::STATUS_PATTERNS).map(value_counts),
            countries: category_column(frame, constants::COUNTRY_PATTERNS).map(value_counts),
            services: service_counts(frame),
            roles: role_breakdown(frame),
            revenue_by_country: revenue_by_country(frame),
            revenue_by_day: revenue_by_day(frame),
        }
    }
}

fn category_column<'a>(frame: &'a Frame, patterns: &[&str]) -> Option<&'a Column> {
    let names = frame.column_names();
    let name = best_column(&names, patterns)?;
    frame.column(name)
}

fn date_column<'a>(frame: &'a Frame, patterns: &[&str]) -> Option<&'a [Option<chrono::NaiveDateTime>]> {
    category_column(frame, patterns)?.datetimes()
}

/// Present values with their counts, by count descending then label
pub fn value_counts(column: &Column) -> Vec<Count> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in 0..column.values.len() {
        if let Some(label) = column.label(row) {
            *counts.entry(label).or_default() += 1;
        }
    }
    sorted_counts(counts)
}

fn sorted_counts(counts: HashMap<String, usize>) -> Vec<Count> {
    let mut counts: Vec<Count> = counts
        .into_iter()
        .map(|(label, count)| Count { label, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    counts
}

/// First 20 characters plus "..." for longer names
pub fn truncate_label(name: &str) -> String {
    if name.chars().count() > constants::SERVICE_LABEL_MAX_CHARS {
        let head: String = name.chars().take(constants::SERVICE_LABEL_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

/// Appointments per day
pub fn timeline(frame: &Frame) -> Option<Vec<(NaiveDate, usize)>> {
    let dates = date_column(frame, constants::TIMELINE_DATE_PATTERNS)?;
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for date in dates.iter().flatten() {
        *per_day.entry(date.date()).or_default() += 1;
    }
    Some(per_day.into_iter().collect())
}

pub fn service_counts(frame: &Frame) -> Option<Vec<ServiceCount>> {
    let column = category_column(frame, constants::SERVICE_PATTERNS)?;
    Some(
        value_counts(column)
            .into_iter()
            .map(|c| ServiceCount {
                display: truncate_label(&c.label),
                service: c.label,
                count: c.count,
            })
            .collect(),
    )
}

pub fn role_breakdown(frame: &Frame) -> Option<RoleBreakdown> {
    let column = category_column(frame, constants::ROLE_PATTERNS)?;

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut with_role = 0;
    for row in 0..frame.len() {
        let label = match column.label(row) {
            Some(label) => {
                with_role += 1;
                label
            }
            None => constants::NOT_SPECIFIED.to_string(),
        };
        *counts.entry(label).or_default() += 1;
    }

    Some(RoleBreakdown {
        counts: sorted_counts(counts),
        with_role,
        total: frame.len(),
    })
}

/// Present amounts of the derived revenue column, by row
fn revenue_column(frame: &Frame) -> Option<&[Option<f64>]> {
    let names = frame.column_names();
    let revenue = best_column(&names, constants::REVENUE_PATTERNS)?;
    frame
        .column(&format!("{}{}", revenue, constants::NUMERIC_SUFFIX))?
        .numbers()
}

/// Revenue summed per country, top 10 descending
pub fn revenue_by_country(frame: &Frame) -> Option<Vec<(String, f64)>> {
    let amounts = revenue_column(frame)?;
    let country = category_column(frame, constants::COUNTRY_PATTERNS)?;

    let mut totals: HashMap<String, f64> = HashMap::new();
    for (row, amount) in amounts.iter().enumerate() {
        if let Some(label) = country.label(row) {
            *totals.entry(label).or_default() += amount.unwrap_or(0.0);
        }
    }

    let mut totals: Vec<(String, f64)> = totals.into_iter().collect();
    totals.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    totals.truncate(constants::TOP_REVENUE_COUNTRIES);
    Some(totals)
}

/// Revenue summed per day
pub fn revenue_by_day(frame: &Frame) -> Option<Vec<(NaiveDate, f64)>> {
    let amounts = revenue_column(frame)?;
    let dates = date_column(frame, constants::REVENUE_DATE_PATTERNS)?;

    let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (date, amount) in dates.iter().zip(amounts) {
        if let Some(date) = date {
            *per_day.entry(date.date()).or_default() += amount.unwrap_or(0.0);
        }
    }
    Some(per_day.into_iter().collect())
}
