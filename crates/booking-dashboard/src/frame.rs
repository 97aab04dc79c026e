//! Typed in-memory view of the appointments table
//!
//! Each column holds one kind of cell. Columns whose non-empty cells all parse
//! as numbers are numeric; everything else starts as text and may be converted
//! to date-times by [`crate::derive`]. Empty cells are missing values.

use chrono::NaiveDateTime;
use std::collections::BTreeSet;

use shared::Table;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Cells of one column
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Text(Vec<Option<String>>),
    Number(Vec<Option<f64>>),
    DateTime(Vec<Option<NaiveDateTime>>),
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Values::Text(v) => v.len(),
            Values::Number(v) => v.len(),
            Values::DateTime(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn retain(&mut self, keep: &[bool]) {
        fn apply<T>(cells: &mut Vec<T>, keep: &[bool]) {
            let mut idx = 0;
            cells.retain(|_| {
                let k = keep.get(idx).copied().unwrap_or(false);
                idx += 1;
                k
            });
        }
        match self {
            Values::Text(v) => apply(v, keep),
            Values::Number(v) => apply(v, keep),
            Values::DateTime(v) => apply(v, keep),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Values,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Values) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Build from raw CSV cells, numeric when every non-empty cell is a number
    pub fn infer(name: impl Into<String>, cells: Vec<String>) -> Self {
        let present: Vec<&str> = cells.iter().map(|c| c.trim()).filter(|c| !c.is_empty()).collect();
        let numeric = !present.is_empty() && present.iter().all(|c| parse_number(c).is_some());

        let values = if numeric {
            Values::Number(cells.iter().map(|c| parse_number(c.trim())).collect())
        } else {
            Values::Text(
                cells
                    .into_iter()
                    .map(|c| if c.trim().is_empty() { None } else { Some(c) })
                    .collect(),
            )
        };
        Self::new(name, values)
    }

    /// Display form of a cell; `None` when missing
    pub fn label(&self, row: usize) -> Option<String> {
        match &self.values {
            Values::Text(v) => v.get(row)?.clone(),
            Values::Number(v) => v.get(row)?.map(format_number),
            Values::DateTime(v) => v.get(row)?.map(|d| d.format(DATETIME_FORMAT).to_string()),
        }
    }

    pub fn numbers(&self) -> Option<&[Option<f64>]> {
        match &self.values {
            Values::Number(v) => Some(v),
            _ => None,
        }
    }

    pub fn datetimes(&self) -> Option<&[Option<NaiveDateTime>]> {
        match &self.values {
            Values::DateTime(v) => Some(v),
            _ => None,
        }
    }

    /// Distinct non-missing labels, sorted
    pub fn distinct_labels(&self) -> BTreeSet<String> {
        (0..self.values.len()).filter_map(|row| self.label(row)).collect()
    }
}

/// Columns of equal length, in file order followed by derived columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<Column>,
    rows: usize,
}

impl Frame {
    pub fn from_table(table: &Table) -> Self {
        let columns = table
            .headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let cells = table.rows.iter().map(|row| row[idx].clone()).collect();
                Column::infer(header.clone(), cells)
            })
            .collect();

        Self {
            columns,
            rows: table.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Append a derived column; its length must match the frame
    pub fn push_column(&mut self, column: Column) {
        debug_assert_eq!(column.values.len(), self.rows);
        self.columns.push(column);
    }

    /// Copy of the rows where `keep` is true
    pub fn filter(&self, keep: &[bool]) -> Frame {
        let mut columns = self.columns.clone();
        for column in &mut columns {
            column.values.retain(keep);
        }
        let rows = keep.iter().take(self.rows).filter(|k| **k).count();
        Frame { columns, rows }
    }

    /// Rows for which `predicate` holds
    pub fn filter_by(&self, predicate: impl Fn(usize) -> bool) -> Frame {
        let keep: Vec<bool> = (0..self.rows).map(predicate).collect();
        self.filter(&keep)
    }

    /// Frame with the same columns and no rows
    pub fn empty_like(&self) -> Frame {
        self.filter(&[])
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> Frame {
        self.filter_by(|row| row < n)
    }

    /// Back to strings, derived columns included
    pub fn to_table(&self) -> Table {
        let headers = self.columns.iter().map(|c| c.name.clone()).collect();
        let rows = (0..self.rows)
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| c.label(row).unwrap_or_default())
                    .collect()
            })
            .collect();
        Table { headers, rows }
    }
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// `90` rather than `90.0`; fractional values as-is
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Frame {
        let table = Table::from_csv_bytes(
            b"ID,Service,Duration,Notes\n1,Bootcamp,90,\n2,Party Pass,45.5,late\n3,,120,\n",
        )
        .unwrap();
        Frame::from_table(&table)
    }

    #[test]
    fn test_type_inference() {
        let frame = sample();
        assert!(frame.column("ID").unwrap().numbers().is_some());
        assert!(frame.column("Duration").unwrap().numbers().is_some());
        assert!(frame.column("Service").unwrap().numbers().is_none());
        // all but one cell empty, still text
        assert_eq!(
            frame.column("Notes").unwrap().values,
            Values::Text(vec![None, Some("late".to_string()), None])
        );
    }

    #[test]
    fn test_empty_cells_are_missing() {
        let frame = sample();
        let service = frame.column("Service").unwrap();
        assert_eq!(service.label(2), None);
        assert_eq!(service.label(0).as_deref(), Some("Bootcamp"));
    }

    #[test]
    fn test_filter_keeps_columns_aligned() {
        let frame = sample();
        let filtered = frame.filter_by(|row| row != 1);

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.column("ID").unwrap().label(1).as_deref(), Some("3"));
        assert_eq!(filtered.column("Duration").unwrap().label(1).as_deref(), Some("120"));
        assert_eq!(frame.len(), 3);
    }

    #[test]
    fn test_to_table_formats_numbers() {
        let table = sample().to_table();
        assert_eq!(table.rows[0], vec!["1", "Bootcamp", "90", ""]);
        assert_eq!(table.rows[1][2], "45.5");
    }

    #[test]
    fn test_head_and_empty_like() {
        let frame = sample();
        assert_eq!(frame.head(2).len(), 2);
        assert_eq!(frame.head(10).len(), 3);

        let empty = frame.empty_like();
        assert!(empty.is_empty());
        assert_eq!(empty.column_names(), frame.column_names());
    }
}
