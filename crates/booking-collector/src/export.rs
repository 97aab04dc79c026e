//! Export request payloads
//!
//! The plugin's export caps what a single request returns depending on the
//! date filter, so the collector asks twice: once with `"any"` and once with
//! `"null"`, and merges the batches.

use serde_json::json;

use crate::constants;

/// Value of the `date` key in the export filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    Any,
    Null,
}

impl DateFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateFilter::Any => "any",
            DateFilter::Null => "null",
        }
    }
}

impl std::fmt::Display for DateFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON filter blob sent as the `filter` form field
pub fn filter_json(date: DateFilter) -> String {
    json!({
        "id": "",
        "date": date.as_str(),
        "created_date": "any",
        "staff": null,
        "customer": null,
        "service": null,
        "status": constants::EXPORT_STATUSES,
    })
    .to_string()
}

/// Complete form body for one export request
pub fn export_form(date: DateFilter, token: Option<&str>) -> Vec<(String, String)> {
    let mut form = vec![
        ("action".to_string(), constants::EXPORT_ACTION.to_string()),
        ("delimiter".to_string(), constants::EXPORT_DELIMITER.to_string()),
    ];

    form.extend(
        constants::EXPORT_FIELDS
            .iter()
            .map(|field| (format!("exp[{}]", field), "on".to_string())),
    );

    form.push(("filter".to_string(), filter_json(date)));

    if let Some(token) = token {
        form.push((constants::TOKEN_FORM_FIELD.to_string(), token.to_string()));
    }

    form
}
