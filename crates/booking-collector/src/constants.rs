//! Centralized constants for the appointments collector
//!
//! Endpoint paths are relative to the configured base URL of the WordPress
//! site running the booking plugin.

// =============================================================================
// Endpoints
// =============================================================================

/// Login form handler
pub const LOGIN_PATH: &str = "/wp-login.php";

/// Admin landing page (login redirect target)
pub const ADMIN_PATH: &str = "/wp-admin/";

/// Appointments listing page, scanned for the anti-forgery token
pub const APPOINTMENTS_PAGE_PATH: &str = "/wp-admin/admin.php?page=bookly-appointments";

/// AJAX endpoint serving the CSV export
pub const EXPORT_PATH: &str = "/wp-admin/admin-ajax.php";

/// Marker in a URL that means the session was bounced back to the login form
pub const LOGIN_REDIRECT_MARKER: &str = "wp-login";

/// Browser User-Agent sent with every request
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

// =============================================================================
// Login Heuristics
// =============================================================================

/// Lower-case body fragments that indicate a logged-in admin page
pub const LOGIN_SUCCESS_INDICATORS: &[&str] = &["dashboard", "wp-admin", "welcome", "howdy"];

/// Lower-case body fragments that indicate rejected credentials
pub const LOGIN_ERROR_INDICATORS: &[&str] = &["error", "incorrect"];

// =============================================================================
// Anti-forgery Token
// =============================================================================

/// Field/meta names checked for a token, in priority order
pub const TOKEN_FIELD_NAMES: &[&str] = &["csrf_token", "_wpnonce", "bookly_csrf_token", "_token", "nonce"];

/// Substring that marks any other input as a nonce field
pub const NONCE_MARKER: &str = "nonce";

/// Form field the token is submitted under
pub const TOKEN_FORM_FIELD: &str = "csrf_token";

// =============================================================================
// Export Request
// =============================================================================

/// AJAX action that produces the CSV export
pub const EXPORT_ACTION: &str = "bookly_pro_export_appointments";

/// Delimiter requested from the export
pub const EXPORT_DELIMITER: &str = ",";

/// Fields requested from the export, each sent as `exp[<field>]=on`
pub const EXPORT_FIELDS: &[&str] = &[
    "id",
    "start_date",
    "staff_name",
    "customer_full_name",
    "customer_phone",
    "customer_email",
    "service_title",
    "service_duration",
    "status",
    "payment",
    "notes",
    "created_date",
    "customer_address",
    "customer_birthday",
    "online_meeting",
    "custom_fields_23664",
    "custom_fields_19734",
];

/// Status filter covering every status the plugin assigns
pub const EXPORT_STATUSES: &[&str] = &["pending", "approved", "cancelled", "rejected", "done"];

/// Header of the record identifier column (compared ignoring case)
pub const ID_COLUMN: &str = "id";

// =============================================================================
// Configuration
// =============================================================================

/// Default config file path
pub const CONFIG_FILE: &str = "collector.toml";

/// Environment variables consulted when the config file is absent
pub const ENV_BASE_URL: &str = "WP_BASE_URL";
pub const ENV_USERNAME: &str = "WP_USERNAME";
pub const ENV_PASSWORD: &str = "WP_PASSWORD";

// =============================================================================
// Timeouts
// =============================================================================

/// Login and listing page requests (seconds)
pub const DEFAULT_PAGE_TIMEOUT_SECS: u64 = 30;

/// Each export request (seconds)
pub const DEFAULT_EXPORT_TIMEOUT_SECS: u64 = 60;

/// Whole collection run (seconds)
pub const DEFAULT_RUN_TIMEOUT_SECS: u64 = 300;

/// Rows shown in the saved-file preview
pub const PREVIEW_ROWS: usize = 3;
