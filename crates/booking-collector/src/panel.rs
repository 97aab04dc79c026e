//! Admin panel access
//!
//! [`AdminPanel`] is the seam between the collection state machine and the
//! network: [`HttpPanel`] talks to a real WordPress site, tests substitute a
//! scripted panel.

use reqwest::Client;

use crate::auth;
use crate::config::Config;
use crate::constants;
use crate::error::CollectError;
use crate::export::DateFilter;

/// Listing page after redirects
#[derive(Debug, Clone)]
pub struct ListingPage {
    /// Final URL (after any login bounce)
    pub url: String,
    pub body: String,
}

/// The three requests a collection run makes
#[allow(async_fn_in_trait)]
pub trait AdminPanel {
    /// Submit the login form and return the response body
    async fn submit_login(&self, username: &str, password: &str) -> Result<String, CollectError>;

    /// Fetch the appointments listing page
    async fn fetch_listing(&self) -> Result<ListingPage, CollectError>;

    /// Submit one export request and return the CSV bytes
    async fn request_export(&self, date: DateFilter, form: &[(String, String)]) -> Result<Vec<u8>, CollectError>;
}

/// reqwest-backed panel with a cookie session
pub struct HttpPanel {
    client: Client,
    config: Config,
}

impl HttpPanel {
    pub fn new(config: &Config) -> Result<Self, CollectError> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(constants::USER_AGENT)
            .connect_timeout(config.timeouts.page())
            .build()
            .map_err(|e| CollectError::Auth(format!("could not build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        self.config.url(path)
    }
}

impl AdminPanel for HttpPanel {
    async fn submit_login(&self, username: &str, password: &str) -> Result<String, CollectError> {
        let form = auth::login_form(username, password, self.url(constants::ADMIN_PATH));

        let response = self
            .client
            .post(self.url(constants::LOGIN_PATH))
            .form(&form)
            .timeout(self.config.timeouts.page())
            .send()
            .await
            .map_err(|e| CollectError::Auth(e.to_string()))?
            .error_for_status()
            .map_err(|e| CollectError::Auth(e.to_string()))?;

        response.text().await.map_err(|e| CollectError::Auth(e.to_string()))
    }

    async fn fetch_listing(&self) -> Result<ListingPage, CollectError> {
        let response = self
            .client
            .get(self.url(constants::APPOINTMENTS_PAGE_PATH))
            .timeout(self.config.timeouts.page())
            .send()
            .await
            .map_err(|e| CollectError::TokenMissing(format!("listing page request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| CollectError::TokenMissing(format!("listing page request failed: {}", e)))?;

        let url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| CollectError::TokenMissing(format!("reading listing page: {}", e)))?;

        Ok(ListingPage { url, body })
    }

    async fn request_export(&self, date: DateFilter, form: &[(String, String)]) -> Result<Vec<u8>, CollectError> {
        let export_error = |message: String| CollectError::Export {
            date: date.as_str(),
            message,
        };

        let response = self
            .client
            .post(self.url(constants::EXPORT_PATH))
            .form(form)
            .timeout(self.config.timeouts.export())
            .send()
            .await
            .map_err(|e| export_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(export_error(format!("HTTP status {}", status)));
        }

        let bytes = response.bytes().await.map_err(|e| export_error(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Credentials, Timeouts};
    use crate::export;
    use crate::token;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Raw requests (head and body) as the local site received them
    type Received = Arc<Mutex<Vec<String>>>;

    type Route = fn(&str, &str) -> String;

    /// Local site answering every request with `route(method, target)`
    async fn local_site(route: Route) -> (Config, Received) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let received: Received = Arc::default();

        let log = Arc::clone(&received);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(answer(stream, route, Arc::clone(&log)));
            }
        });

        let config = Config {
            base_url: format!("http://{}", addr),
            credentials: Credentials {
                username: "admin".to_string(),
                password: "secret".to_string(),
            },
            timeouts: Timeouts::default(),
        };
        (config, received)
    }

    async fn answer(mut stream: TcpStream, route: Route, log: Received) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let head_end = loop {
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
            match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
        let length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < head_end + length {
            match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
        }

        let mut request_line = head.split_whitespace();
        let method = request_line.next().unwrap_or_default();
        let target = request_line.next().unwrap_or_default();
        let response = route(method, target);

        log.lock().unwrap().push(String::from_utf8_lossy(&buf).to_string());
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
    }

    /// `headers` lines must each end in `\r\n`
    fn reply(status: &str, headers: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n{}",
            status,
            body.len(),
            headers,
            body
        )
    }

    #[tokio::test]
    async fn test_export_server_error_is_export_error() {
        let (config, received) = local_site(|_, target| {
            if target == constants::EXPORT_PATH {
                reply("500 Internal Server Error", "", "oops")
            } else {
                reply("404 Not Found", "", "")
            }
        })
        .await;
        let panel = HttpPanel::new(&config).unwrap();

        let form = export::export_form(DateFilter::Any, Some("tok-1"));
        let err = panel.request_export(DateFilter::Any, &form).await.unwrap_err();

        match err {
            CollectError::Export { date, message } => {
                assert_eq!(date, "any");
                assert!(message.contains("500"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
        let requests = received.lock().unwrap();
        assert!(requests[0].contains("action=bookly_pro_export_appointments"));
        assert!(requests[0].contains("csrf_token=tok-1"));
    }

    #[tokio::test]
    async fn test_listing_bounce_keeps_final_url() {
        let (config, _) = local_site(|_, target| {
            if target == constants::APPOINTMENTS_PAGE_PATH {
                reply("302 Found", "Location: /wp-login.php?redirect_to=admin\r\n", "")
            } else if target.starts_with(constants::LOGIN_PATH) {
                reply("200 OK", "", r#"<form id="loginform"></form>"#)
            } else {
                reply("404 Not Found", "", "")
            }
        })
        .await;
        let panel = HttpPanel::new(&config).unwrap();

        let page = panel.fetch_listing().await.unwrap();

        assert!(page.url.contains("wp-login"), "{}", page.url);
        assert!(token::is_login_redirect(&page.url));
    }

    #[tokio::test]
    async fn test_forbidden_login_is_auth_error() {
        let (config, _) = local_site(|_, _| reply("403 Forbidden", "", "forbidden")).await;
        let panel = HttpPanel::new(&config).unwrap();

        let err = panel.submit_login("admin", "secret").await.unwrap_err();

        assert!(matches!(err, CollectError::Auth(_)), "{err}");
    }

    #[tokio::test]
    async fn test_login_form_and_session_cookie_sent() {
        let (config, received) = local_site(|method, target| match (method, target) {
            ("POST", constants::LOGIN_PATH) => reply(
                "200 OK",
                "Set-Cookie: wordpress_logged_in=abc; Path=/\r\n",
                "<h1>Dashboard</h1>",
            ),
            ("POST", constants::EXPORT_PATH) => reply("200 OK", "", "ID\n1\n"),
            _ => reply("404 Not Found", "", ""),
        })
        .await;
        let panel = HttpPanel::new(&config).unwrap();

        let body = panel.submit_login("admin", "secret").await.unwrap();
        assert!(body.contains("Dashboard"));

        let form = export::export_form(DateFilter::Null, None);
        let bytes = panel.request_export(DateFilter::Null, &form).await.unwrap();
        assert_eq!(bytes, b"ID\n1\n");

        let requests = received.lock().unwrap();
        assert!(requests[0].contains("log=admin"));
        assert!(requests[0].contains("rememberme=forever"));
        assert!(
            requests[1]
                .to_lowercase()
                .contains("cookie: wordpress_logged_in=abc")
        );
    }
}
