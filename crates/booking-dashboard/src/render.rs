//! Console output for the dashboard

use crate::charts::{Charts, Count};
use crate::constants;
use crate::data::Dataset;
use crate::filters::{CategoryOptions, FilterOptions, FilterSummary};
use crate::frame::Frame;
use crate::metrics::KeyMetrics;

/// `€1,234.56`
pub fn format_euros(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}€{}.{:02}", sign, group_thousands(cents / 100), cents % 100)
}

/// Text bar scaled against the largest value
pub fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * constants::BAR_WIDTH as f64).round().max(1.0) as usize;
    "█".repeat(len)
}

fn section(title: &str) {
    println!("\n{}", title);
    println!("{}", "=".repeat(60));
}

pub fn file_info(dataset: &Dataset) {
    println!(
        "📁 Data updated: {} | Size: {} bytes",
        dataset.info.modified.format("%Y-%m-%d %H:%M:%S"),
        group_thousands(dataset.info.size_bytes)
    );
    println!(
        "✅ Loaded {} appointments with {} columns",
        dataset.frame.len(),
        dataset.column_count()
    );
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn filter_summary(summary: &FilterSummary) {
    println!("\n📊 {}", summary);
    if summary.is_filtered() {
        println!("   🔍 Filters are active. Drop the filter arguments to see all data.");
    }
}

pub fn filter_options(options: &FilterOptions) {
    section("Filter Options");

    match &options.date {
        Some(date) => println!("📅 {} (--from/--to): {} to {}", date.column, date.min, date.max),
        None => println!("📅 No date column"),
    }
    category_options("📊", "--status", options.status.as_ref());
    category_options("🎯", "--service", options.service.as_ref());
    category_options("💃", "--role", options.role.as_ref());
    category_options("🌍", "--country", options.country.as_ref());
    if let Some(price) = &options.price {
        println!(
            "💰 Price (--min-price/--max-price): {} to {}",
            format_euros(price.min),
            format_euros(price.max)
        );
    }
}

fn category_options(icon: &str, flag: &str, options: Option<&CategoryOptions>) {
    let Some(options) = options else {
        return;
    };
    println!("{} {} ({}):", icon, options.column, flag);
    if let Some(hint) = options.hint() {
        println!("   {}", hint);
    }
    for option in &options.options {
        println!("   - {}", option);
    }
}

pub fn key_metrics(metrics: &KeyMetrics) {
    let na = || "N/A".to_string();
    section("📊 Key Metrics");
    println!("📅 Total Appointments:  {}", metrics.total_appointments);
    println!(
        "💰 Total Revenue:       {}",
        metrics.total_revenue.map(format_euros).unwrap_or_else(na)
    );
    println!(
        "📈 Average Payment:     {}",
        metrics.average_payment.map(|v| format!("€{:.2}", v)).unwrap_or_else(na)
    );
    println!("👥 Unique Customers:    {}", metrics.unique_customers);
}

fn count_bars(counts: &[Count]) {
    let max = counts.iter().map(|c| c.count).max().unwrap_or(0) as f64;
    let width = counts.iter().map(|c| c.label.chars().count()).max().unwrap_or(0);
    for c in counts {
        println!(
            "  {:<width$}  {:>5}  {}",
            c.label,
            c.count,
            bar(c.count as f64, max),
            width = width
        );
    }
}

pub fn charts(charts: &Charts) {
    section("📈 Analytics");

    match &charts.countries {
        Some(countries) => {
            println!("\n🌍 All Countries ({} countries)", countries.len());
            count_bars(countries);
        }
        None => println!("\nNo country information available"),
    }

    match &charts.services {
        Some(services) => {
            println!("\n🎯 Service Distribution");
            let max = services.iter().map(|s| s.count).max().unwrap_or(0) as f64;
            for s in services {
                println!("  {:<23}  {:>5}  {}", s.display, s.count, bar(s.count as f64, max));
            }
        }
        None => println!("\nNo service information available"),
    }

    match &charts.timeline {
        Some(days) if !days.is_empty() => {
            println!("\n📅 Appointments Over Time");
            let max = days.iter().map(|(_, n)| *n).max().unwrap_or(0) as f64;
            for (day, n) in days {
                println!("  {}  {:>5}  {}", day, n, bar(*n as f64, max));
            }
        }
        Some(_) => println!("\nNo timeline data available"),
        None => println!("\nNo date information available"),
    }

    match &charts.status {
        Some(status) => {
            println!("\n📊 Status Distribution");
            count_bars(status);
        }
        None => println!("\nNo status information available"),
    }

    match &charts.roles {
        Some(roles) => {
            println!("\n💃 Role Distribution");
            count_bars(&roles.counts);
            println!("  📊 {}", roles.caption());
        }
        None => println!("\nNo role information available"),
    }

    if charts.revenue_by_country.is_some() || charts.revenue_by_day.is_some() {
        println!("\n💰 Revenue Analysis");
    }
    if let Some(countries) = &charts.revenue_by_country {
        println!("  Revenue by Country (Top {})", constants::TOP_REVENUE_COUNTRIES);
        let max = countries.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        for (country, revenue) in countries {
            println!("  {:<20}  {:>12}  {}", country, format_euros(*revenue), bar(*revenue, max));
        }
    }
    if let Some(days) = &charts.revenue_by_day {
        println!("  Daily Revenue");
        let max = days.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        for (day, revenue) in days {
            println!("  {}  {:>12}  {}", day, format_euros(*revenue), bar(*revenue, max));
        }
    }
}

/// First rows of the filtered table
pub fn preview(frame: &Frame, rows: usize) {
    section("📋 Appointments Data");
    let table = frame.head(rows).to_table();
    println!("{}", table.headers.join(" | "));
    println!("{}", "-".repeat(60));
    for row in &table.rows {
        println!("{}", row.join(" | "));
    }
    if frame.len() > rows {
        println!("... {} more", frame.len() - rows);
    }
    println!("\n📊 {} appointments, {} columns", frame.len(), frame.columns().len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euro_formatting() {
        assert_eq!(format_euros(0.0), "€0.00");
        assert_eq!(format_euros(45.5), "€45.50");
        assert_eq!(format_euros(1234.567), "€1,234.57");
        assert_eq!(format_euros(1_000_000.0), "€1,000,000.00");
    }

    #[test]
    fn test_thousands_grouping() {
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(48213), "48,213");
    }

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(10.0, 10.0).chars().count(), constants::BAR_WIDTH);
        assert_eq!(bar(5.0, 10.0).chars().count(), constants::BAR_WIDTH / 2);
        // tiny but present values still show
        assert_eq!(bar(0.01, 10.0).chars().count(), 1);
        assert_eq!(bar(0.0, 10.0), "");
    }
}
