//! Merge of the two export batches into one deduplicated table

use std::collections::HashSet;

use shared::Table;

use crate::constants;
use crate::error::CollectError;

/// Merge two raw CSV batches.
///
/// Rows are deduplicated on the identifier column keeping the first occurrence,
/// so the first batch wins on conflicts, and the result is sorted by
/// identifier. Fails with [`CollectError::Merge`] when either batch cannot be
/// parsed or lacks an identifier column; the caller falls back to `first`.
pub fn merge_batches(first: &[u8], second: &[u8]) -> Result<Vec<u8>, CollectError> {
    let first = Table::from_csv_bytes(first).map_err(|e| CollectError::Merge(format!("first batch: {}", e)))?;
    let second = Table::from_csv_bytes(second).map_err(|e| CollectError::Merge(format!("second batch: {}", e)))?;

    tracing::info!(
        "first batch: {} rows, {} columns; second batch: {} rows, {} columns",
        first.len(),
        first.headers.len(),
        second.len(),
        second.headers.len()
    );

    let merged = merge_tables(first, second)?;
    tracing::info!("merged: {} rows (duplicates removed)", merged.len());

    merged
        .to_csv_bytes()
        .map_err(|e| CollectError::Merge(format!("re-serializing merged rows: {}", e)))
}

/// Merge two parsed batches (see [`merge_batches`])
pub fn merge_tables(first: Table, second: Table) -> Result<Table, CollectError> {
    let (Some(first_id), Some(second_id)) = (
        first.column_index_ignore_case(constants::ID_COLUMN),
        second.column_index_ignore_case(constants::ID_COLUMN),
    ) else {
        return Err(CollectError::Merge("no ID column in both batches".to_string()));
    };

    // Column union: first batch order, then columns only the second batch has.
    // The id columns are aligned even if their header case differs.
    let mut headers = first.headers.clone();
    for (idx, header) in second.headers.iter().enumerate() {
        if idx != second_id && !headers.contains(header) {
            headers.push(header.clone());
        }
    }
    let width = headers.len();

    // Where each second-batch column lands in the merged row
    let second_positions: Vec<usize> = second
        .headers
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            if idx == second_id {
                first_id
            } else {
                headers.iter().position(|m| m == h).unwrap_or(first_id)
            }
        })
        .collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(first.len() + second.len());

    for mut row in first.rows {
        if seen.insert(row[first_id].trim().to_string()) {
            row.resize(width, String::new());
            rows.push(row);
        }
    }

    for row in second.rows {
        if seen.insert(row[second_id].trim().to_string()) {
            let mut merged = vec![String::new(); width];
            for (cell, &pos) in row.into_iter().zip(&second_positions) {
                merged[pos] = cell;
            }
            rows.push(merged);
        }
    }

    sort_by_id(&mut rows, first_id);

    Ok(Table { headers, rows })
}

/// Stable ascending sort on the identifier: numeric when every id is an
/// integer, lexical otherwise
fn sort_by_id(rows: &mut [Vec<String>], id: usize) {
    if rows.iter().all(|r| r[id].trim().parse::<i64>().is_ok()) {
        rows.sort_by_key(|r| r[id].trim().parse::<i64>().unwrap_or_default());
    } else {
        rows.sort_by(|a, b| a[id].trim().cmp(b[id].trim()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> Table {
        Table::from_csv_bytes(csv.as_bytes()).unwrap()
    }

    fn ids(table: &Table) -> Vec<&str> {
        let id = table.column_index_ignore_case("id").unwrap();
        table.rows.iter().map(|r| r[id].as_str()).collect()
    }

    #[test]
    fn test_first_batch_wins_on_duplicate_ids() {
        let first = table("ID,Status\n1,Approved\n2,Pending\n");
        let second = table("ID,Status\n2,Cancelled\n3,Done\n");

        let merged = merge_tables(first, second).unwrap();

        assert_eq!(ids(&merged), vec!["1", "2", "3"]);
        assert_eq!(merged.rows[1], vec!["2", "Pending"]);
    }

    #[test]
    fn test_sorted_regardless_of_input_order() {
        let first = table("ID,Status\n10,Done\n2,Pending\n");
        let second = table("ID,Status\n7,Approved\n1,Done\n");

        let merged = merge_tables(first, second).unwrap();
        // numeric, not lexical ("10" < "2" lexically)
        assert_eq!(ids(&merged), vec!["1", "2", "7", "10"]);
    }

    #[test]
    fn test_non_numeric_ids_sort_lexically() {
        let first = table("id,Status\nb-2,Done\n");
        let second = table("id,Status\na-1,Pending\nb-2,Approved\n");

        let merged = merge_tables(first, second).unwrap();
        assert_eq!(ids(&merged), vec!["a-1", "b-2"]);
        assert_eq!(merged.rows[1][1], "Done");
    }

    #[test]
    fn test_column_union_fills_gaps() {
        let first = table("ID,Status\n1,Approved\n");
        let second = table("ID,Country,Status\n2,Spain,Done\n");

        let merged = merge_tables(first, second).unwrap();

        assert_eq!(merged.headers, vec!["ID", "Status", "Country"]);
        assert_eq!(merged.rows[0], vec!["1", "Approved", ""]);
        assert_eq!(merged.rows[1], vec!["2", "Done", "Spain"]);
    }

    #[test]
    fn test_id_header_case_may_differ() {
        let first = table("ID,Status\n3,Done\n");
        let second = table("id,Status\n1,Pending\n3,Approved\n");

        let merged = merge_tables(first, second).unwrap();
        assert_eq!(merged.headers, vec!["ID", "Status"]);
        assert_eq!(ids(&merged), vec!["1", "3"]);
        assert_eq!(merged.rows[1][1], "Done");
    }

    #[test]
    fn test_missing_id_column_is_merge_error() {
        let first = table("ID,Status\n1,Approved\n");
        let second = table("Reference,Status\n1,Approved\n");

        let err = merge_tables(first, second).unwrap_err();
        assert!(matches!(err, CollectError::Merge(_)));
    }

    #[test]
    fn test_merge_batches_round_trips_bytes() {
        let merged = merge_batches(b"ID,Status\n2,Pending\n", b"ID,Status\n1,Approved\n").unwrap();
        let parsed = Table::from_csv_bytes(&merged).unwrap();
        assert_eq!(ids(&parsed), vec!["1", "2"]);
    }
}
