//! Column role inference by header name

/// Every column whose name contains `pattern`, ignoring case, in file order
pub fn column_options<'a, S: AsRef<str>>(columns: &'a [S], pattern: &str) -> Vec<&'a str> {
    let pattern = pattern.to_lowercase();
    columns
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| name.to_lowercase().contains(&pattern))
        .collect()
}

/// First column matching the highest-priority pattern that matches anything
pub fn best_column<'a, S: AsRef<str>>(columns: &'a [S], patterns: &[&str]) -> Option<&'a str> {
    patterns
        .iter()
        .find_map(|pattern| column_options(columns, pattern).into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_priority_beats_file_order() {
        let columns = ["Start Date", "Created_Date"];
        assert_eq!(
            best_column(&columns, &["appointment date", "date", "start"]),
            Some("Start Date")
        );

        let columns = ["Created", "Appointment Date"];
        assert_eq!(
            best_column(&columns, &["appointment date", "date", "start"]),
            Some("Appointment Date")
        );
    }

    #[test]
    fn test_case_insensitive_substring() {
        let columns = vec!["ID".to_string(), "Customer Email".to_string(), "EMAIL_2".to_string()];
        assert_eq!(column_options(&columns, "email"), vec!["Customer Email", "EMAIL_2"]);
        assert_eq!(best_column(&columns, &["EMAIL"]), Some("Customer Email"));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(best_column(&["ID", "Status"], &["country"]), None);
        assert!(column_options(&["ID"], "price").is_empty());
    }
}
