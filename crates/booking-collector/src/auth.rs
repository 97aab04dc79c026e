//! Login form submission and response classification

use crate::constants;

/// How the login response reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginVerdict {
    /// The response looks like an admin page
    Success,
    /// The response carries an error message
    Rejected,
    /// Neither kind of marker was found
    Ambiguous,
}

/// Form fields for the WordPress login handler
pub fn login_form(username: &str, password: &str, admin_url: String) -> Vec<(&'static str, String)> {
    vec![
        ("log", username.to_string()),
        ("pwd", password.to_string()),
        ("rememberme", "forever".to_string()),
        ("wp-submit", "Log In".to_string()),
        ("redirect_to", admin_url),
    ]
}

/// Classify a login response body by keyword.
///
/// Success markers are checked first: an admin page containing the word
/// "error" somewhere in its markup still counts as logged in.
pub fn classify_login_response(body: &str) -> LoginVerdict {
    let body = body.to_lowercase();

    if constants::LOGIN_SUCCESS_INDICATORS
        .iter()
        .any(|marker| body.contains(marker))
    {
        LoginVerdict::Success
    } else if constants::LOGIN_ERROR_INDICATORS
        .iter()
        .any(|marker| body.contains(marker))
    {
        LoginVerdict::Rejected
    } else {
        LoginVerdict::Ambiguous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_page_is_success() {
        let body = "<html><body class=\"wp-admin\"><h1>Dashboard</h1>Howdy, admin</body></html>";
        assert_eq!(classify_login_response(body), LoginVerdict::Success);
    }

    #[test]
    fn test_success_markers_win_over_error_markers() {
        let body = "<div id=\"error-log\"></div><h1>Welcome</h1>";
        assert_eq!(classify_login_response(body), LoginVerdict::Success);
    }

    #[test]
    fn test_error_page_is_rejected() {
        let body = "<div id=\"login_error\">The password you entered is INCORRECT.</div>";
        assert_eq!(classify_login_response(body), LoginVerdict::Rejected);
    }

    #[test]
    fn test_plain_page_is_ambiguous() {
        assert_eq!(classify_login_response("<html>ok</html>"), LoginVerdict::Ambiguous);
    }

    #[test]
    fn test_login_form_fields() {
        let form = login_form("admin", "secret", "https://site.example/wp-admin/".to_string());
        assert!(form.contains(&("log", "admin".to_string())));
        assert!(form.contains(&("pwd", "secret".to_string())));
        assert!(form.contains(&("rememberme", "forever".to_string())));
        assert!(form.contains(&("redirect_to", "https://site.example/wp-admin/".to_string())));
    }
}
