//! Centralized constants for the appointments dashboard
//!
//! Column patterns are matched case-insensitively as substrings of the CSV
//! headers, in priority order.

// =============================================================================
// Column Patterns
// =============================================================================

/// Date range filter and timeline
pub const FILTER_DATE_PATTERNS: &[&str] = &["appointment date", "date", "start"];
pub const TIMELINE_DATE_PATTERNS: &[&str] = &["appointment date", "date", "created"];
pub const REVENUE_DATE_PATTERNS: &[&str] = &["created", "date"];

pub const STATUS_PATTERNS: &[&str] = &["status"];
pub const SERVICE_PATTERNS: &[&str] = &["service"];
pub const ROLE_PATTERNS: &[&str] = &["role"];
pub const COUNTRY_PATTERNS: &[&str] = &["country"];
pub const EMAIL_PATTERNS: &[&str] = &["email"];

/// Price range filter
pub const PRICE_PATTERNS: &[&str] = &["price"];

/// Revenue metrics and charts
pub const REVENUE_PATTERNS: &[&str] = &["payment", "price"];

// =============================================================================
// Derived Columns
// =============================================================================

/// Columns containing any of these are parsed as date-times
pub const DATE_COLUMN_MARKERS: &[&str] = &["date", "created"];

/// Text columns containing any of these get a `<col>_numeric` column
pub const CURRENCY_COLUMN_MARKERS: &[&str] = &["payment", "price"];

/// Numeric columns containing this get a `<col>_hours` column
pub const DURATION_COLUMN_MARKER: &str = "duration";

pub const NUMERIC_SUFFIX: &str = "_numeric";
pub const HOURS_SUFFIX: &str = "_hours";

/// Amount extraction from payment strings like "€45.50"
pub const CURRENCY_PATTERN: &str = r"€?(\d+\.?\d*)";

/// Leading `a/b/yyyy` of a slash date; `a` above 12 means day-first
pub const SLASH_DATE_PATTERN: &str = r"^(\d{1,2})/(\d{1,2})/\d{4}";

/// Durations are exported in minutes
pub const MINUTES_PER_HOUR: f64 = 60.0;

// =============================================================================
// Filter Options
// =============================================================================

/// Statuses offered even when absent from the data
pub const KNOWN_STATUSES: &[&str] = &[
    "Approved",
    "Pending",
    "Cancelled",
    "Rejected",
    "Done",
    "Confirmed",
    "No-show",
    "Rescheduled",
    "Completed",
    "In Progress",
    "Waiting",
    "Draft",
    "Expired",
];

/// Dance roles listed first, in this order, when present
pub const ROLE_ORDER: &[&str] = &["Leader", "Follower", "Both"];

// =============================================================================
// Charts
// =============================================================================

/// Label for records without a role
pub const NOT_SPECIFIED: &str = "Not Specified";

/// Service names longer than this are shortened for display
pub const SERVICE_LABEL_MAX_CHARS: usize = 20;

/// Countries shown in the revenue chart
pub const TOP_REVENUE_COUNTRIES: usize = 10;

/// Width of the longest text bar
pub const BAR_WIDTH: usize = 40;

// =============================================================================
// Files and Configuration
// =============================================================================

/// Default config file path
pub const CONFIG_FILE: &str = "dashboard.toml";

/// Environment variables consulted when the config file is absent
pub const ENV_USERNAME: &str = "DASHBOARD_USERNAME";
pub const ENV_PASSWORD: &str = "DASHBOARD_PASSWORD";

/// Password for the login itself, so it stays out of shell history
pub const ENV_LOGIN_PASSWORD: &str = "DASHBOARD_LOGIN_PASSWORD";

/// Prefix and timestamp format of downloaded CSV files
pub const EXPORT_FILE_PREFIX: &str = "appointments_";
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Collector subprocess budget (seconds)
pub const REFRESH_TIMEOUT_SECS: u64 = 300;

/// Rows shown in the table preview
pub const DEFAULT_PREVIEW_ROWS: usize = 10;
