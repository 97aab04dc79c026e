//! The collection state machine
//!
//! Login, optional token discovery, two export requests, merge, save. The
//! first failure that has no fallback ends the run; the previous appointments
//! file is only ever replaced by a complete, validated export.

use std::path::Path;
use tracing::{debug, info, warn};

use shared::CollectOutcome;

use crate::auth::{self, LoginVerdict};
use crate::config::Credentials;
use crate::error::CollectError;
use crate::export::{self, DateFilter};
use crate::merge;
use crate::panel::AdminPanel;
use crate::persist::{self, SavedFile};
use crate::token;

pub struct Collector<P: AdminPanel> {
    panel: P,
    credentials: Credentials,
    /// Treat a login response with no recognizable markers as a rejection
    strict_login: bool,
}

impl<P: AdminPanel> Collector<P> {
    pub fn new(panel: P, credentials: Credentials) -> Self {
        Self {
            panel,
            credentials,
            strict_login: false,
        }
    }

    pub fn strict_login(mut self, strict: bool) -> Self {
        self.strict_login = strict;
        self
    }

    /// Log in. A rejection by keyword becomes [`CollectError::CredentialRejected`].
    pub async fn authenticate(&self) -> Result<(), CollectError> {
        info!("logging in as {}", self.credentials.username);
        let body = self
            .panel
            .submit_login(&self.credentials.username, &self.credentials.password)
            .await?;

        match auth::classify_login_response(&body) {
            LoginVerdict::Success => {
                info!("login successful");
                Ok(())
            }
            LoginVerdict::Rejected => Err(CollectError::CredentialRejected),
            LoginVerdict::Ambiguous if self.strict_login => {
                warn!("login response had no success marker; rejecting (strict login)");
                Err(CollectError::CredentialRejected)
            }
            LoginVerdict::Ambiguous => {
                warn!("login status unclear, continuing as if logged in");
                Ok(())
            }
        }
    }

    /// Look for the anti-forgery token. Never fails: a missing token is logged
    /// and the exports go out without one.
    pub async fn acquire_token(&self) -> Option<String> {
        let result = match self.panel.fetch_listing().await {
            Ok(page) if token::is_login_redirect(&page.url) => Err(CollectError::TokenMissing(
                "session was redirected to the login page".to_string(),
            )),
            Ok(page) => token::find_token(&page.body)
                .ok_or_else(|| CollectError::TokenMissing("no token field on the appointments page".to_string())),
            Err(e) => Err(e),
        };

        match result {
            Ok(token) => {
                debug!("found token: {}...", token::preview(&token));
                Some(token)
            }
            Err(e) => {
                warn!("{}; exporting without a token", e);
                None
            }
        }
    }

    async fn export(&self, date: DateFilter, token: Option<&str>) -> Result<Vec<u8>, CollectError> {
        info!("requesting export (date filter {})", date);
        let form = export::export_form(date, token);
        let bytes = self.panel.request_export(date, &form).await?;
        debug!("export (date filter {}) returned {} bytes", date, bytes.len());
        Ok(bytes)
    }

    /// Run every step and save the result to `destination`
    pub async fn run(&self, destination: &Path) -> Result<SavedFile, CollectError> {
        self.authenticate().await?;
        let token = self.acquire_token().await;

        let first = self.export(DateFilter::Any, token.as_deref()).await?;

        let contents = match self.export(DateFilter::Null, token.as_deref()).await {
            Ok(second) => match merge::merge_batches(&first, &second) {
                Ok(merged) => merged,
                Err(e) => {
                    warn!("{}; saving the first batch as-is", e);
                    first
                }
            },
            Err(e) => {
                warn!("{}; saving the first batch only", e);
                first
            }
        };

        let saved = persist::replace_file(destination, &contents).await?;
        info!("saved {} records to {}", saved.records, saved.path.display());
        Ok(saved)
    }
}

/// A finished run reduced to the outcome the dashboard consumes
pub fn outcome(result: &Result<SavedFile, CollectError>) -> CollectOutcome {
    match result {
        Ok(saved) => CollectOutcome::succeeded(saved.records),
        Err(e) => CollectOutcome::failed(e.to_string()),
    }
}
