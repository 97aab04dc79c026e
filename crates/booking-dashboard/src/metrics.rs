//! Headline numbers for the filtered appointments

use std::collections::HashSet;

use crate::columns::best_column;
use crate::constants;
use crate::frame::Frame;

#[derive(Debug, Clone, PartialEq)]
pub struct KeyMetrics {
    pub total_appointments: usize,
    /// `None` renders as "N/A"
    pub total_revenue: Option<f64>,
    pub average_payment: Option<f64>,
    pub unique_customers: usize,
}

/// Present values of the derived revenue column (`<best of payment, price>_numeric`)
pub fn revenue_values(frame: &Frame) -> Option<Vec<f64>> {
    let names = frame.column_names();
    let revenue = best_column(&names, constants::REVENUE_PATTERNS)?;
    let numeric = frame.column(&format!("{}{}", revenue, constants::NUMERIC_SUFFIX))?;
    Some(numeric.numbers()?.iter().flatten().copied().collect())
}

impl KeyMetrics {
    pub fn compute(frame: &Frame) -> Self {
        let amounts = revenue_values(frame).filter(|v| !v.is_empty());
        let total_revenue = amounts.as_ref().map(|v| v.iter().sum::<f64>());
        let average_payment = amounts
            .as_ref()
            .zip(total_revenue)
            .map(|(v, total)| total / v.len() as f64);

        let names = frame.column_names();
        let unique_customers = match best_column(&names, constants::EMAIL_PATTERNS).and_then(|c| frame.column(c)) {
            Some(email) => (0..frame.len())
                .filter_map(|row| email.label(row))
                .collect::<HashSet<_>>()
                .len(),
            None => frame.len(),
        };

        Self {
            total_appointments: frame.len(),
            total_revenue,
            average_payment,
            unique_customers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive;
    use shared::Table;

    fn frame(csv: &str) -> Frame {
        let mut frame = Frame::from_table(&Table::from_csv_bytes(csv.as_bytes()).unwrap());
        derive::process(&mut frame);
        frame
    }

    #[test]
    fn test_revenue_and_customers() {
        let metrics = KeyMetrics::compute(&frame(
            "ID,Customer Email,Payment\n1,a@x.es,€100\n2,b@x.es,€50.50\n3,a@x.es,N/A\n",
        ));

        assert_eq!(metrics.total_appointments, 3);
        assert_eq!(metrics.total_revenue, Some(150.5));
        // missing amounts are excluded from the average
        assert_eq!(metrics.average_payment, Some(75.25));
        assert_eq!(metrics.unique_customers, 2);
    }

    #[test]
    fn test_no_revenue_column_is_not_available() {
        let metrics = KeyMetrics::compute(&frame("ID,Status\n1,Done\n2,Done\n"));

        assert_eq!(metrics.total_revenue, None);
        assert_eq!(metrics.average_payment, None);
        // no email column: falls back to record count
        assert_eq!(metrics.unique_customers, 2);
    }

    #[test]
    fn test_all_amounts_missing_is_not_available() {
        let metrics = KeyMetrics::compute(&frame("ID,Payment\n1,free\n"));
        assert_eq!(metrics.total_revenue, None);
    }
}
