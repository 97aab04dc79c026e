//! Dashboard login
//!
//! A [`Session`] exists only between a successful [`Session::login`] and
//! [`Session::logout`]; nothing about it is written to disk.

use chrono::{DateTime, Local};
use tracing::info;

use crate::config::DashboardCredentials;
use crate::error::LoginError;

#[derive(Debug)]
pub struct Session {
    username: String,
    started: DateTime<Local>,
}

impl Session {
    /// Check the supplied username/password against the configured account
    pub fn login(credentials: &DashboardCredentials, username: &str, password: &str) -> Result<Self, LoginError> {
        if username != credentials.username || password != credentials.password {
            return Err(LoginError::InvalidCredentials);
        }

        info!("dashboard login: {}", username);
        Ok(Self {
            username: username.to_string(),
            started: Local::now(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn started(&self) -> DateTime<Local> {
        self.started
    }

    /// End the session
    pub fn logout(self) {
        info!(
            "dashboard logout: {} (logged in at {})",
            self.username,
            self.started.format("%H:%M:%S")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> DashboardCredentials {
        DashboardCredentials {
            username: "organizer".to_string(),
            password: "salsa".to_string(),
        }
    }

    #[test]
    fn test_login_with_matching_credentials() {
        let session = Session::login(&credentials(), "organizer", "salsa").unwrap();
        assert_eq!(session.username(), "organizer");
        assert!(session.started() <= Local::now());
        session.logout();
    }

    #[test]
    fn test_wrong_password_or_user_rejected() {
        assert_eq!(
            Session::login(&credentials(), "organizer", "tango").unwrap_err(),
            LoginError::InvalidCredentials
        );
        assert!(Session::login(&credentials(), "Organizer", "salsa").is_err());
    }
}
