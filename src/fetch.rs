//! Page fetching over HTTP.
//!
//! The rest of the pipeline only sees the [`PageFetcher`] trait, so listing
//! and article fetches can be served by [`HttpFetcher`] in production and by
//! an in-memory map in tests.
//!
//! # Failure Policy
//!
//! - One attempt per URL; nothing is retried
//! - Redirects are followed
//! - Every request carries the configured header set and timeout
//! - Failures come back as [`FetchError`] values and are turned into
//!   sentinels and notifications by the caller; they never abort a run

use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use thiserror::Error;
use crate::utils::truncate_for_log;
use tracing::{debug, instrument, warn};
use url::Url;

/// Maximum number of redirects followed for a single fetch.
const MAX_REDIRECTS: usize = 20;

/// Characters of an error response body kept in the log line.
const ERROR_BODY_PREVIEW: usize = 300;

/// Why a single fetch produced no body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request did not finish within the configured timeout.
    #[error("Timeout: unable to connect to {url}. Please try again.")]
    Timeout { url: String },

    /// The final response (after redirects) was not a 2xx.
    #[error("HTTP error: status {status} for url {url}")]
    HttpStatus { url: String, status: u16 },

    /// Connection, TLS, or body decoding failure.
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// The URL could not be parsed, including the `#` link sentinel.
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },
}

impl FetchError {
    fn from_reqwest(url: &str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Request {
                url: url.to_string(),
                message: e.to_string(),
            }
        }
    }
}

/// Source of raw page markup.
pub trait PageFetcher {
    /// Fetch `url` and return the response body as text.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// [`PageFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher that sends `headers` with every request and gives up
    /// after `timeout`.
    pub fn new(headers: HeaderMap, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::from_builder(client_builder(headers, timeout))
    }

    fn from_builder(builder: ClientBuilder) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: builder.build()?,
        })
    }
}

fn client_builder(headers: HeaderMap, timeout: Duration) -> ClientBuilder {
    Client::builder()
        .default_headers(headers)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .timeout(timeout)
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let final_url = response.url().clone();
            let body = response.text().await.unwrap_or_default();
            warn!(
                %status,
                %final_url,
                body_preview = %truncate_for_log(&body, ERROR_BODY_PREVIEW),
                "Non-success status"
            );
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, USER_AGENT};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    /// Serve `responses` to consecutive connections and forward each raw
    /// request head to the returned channel.
    async fn serve(responses: Vec<String>) -> (String, mpsc::UnboundedReceiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            for response in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = vec![0u8; 8192];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let _ = tx.send(String::from_utf8_lossy(&buf[..n]).into_owned());
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        (format!("http://{addr}"), rx)
    }

    fn ok(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        )
    }

    fn fetcher(timeout: Duration) -> HttpFetcher {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("test-agent/1.0"));
        HttpFetcher::from_builder(client_builder(headers, timeout).no_proxy()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_body_and_sends_headers() {
        let (base, mut requests) = serve(vec![ok("<html>hi</html>")]).await;
        let body = fetcher(Duration::from_secs(5))
            .fetch(&format!("{base}/indeks?page=1"))
            .await
            .unwrap();

        assert_eq!(body, "<html>hi</html>");
        let request = requests.recv().await.unwrap().to_lowercase();
        assert!(request.starts_with("get /indeks?page=1 "));
        assert!(request.contains("user-agent: test-agent/1.0"));
    }

    #[tokio::test]
    async fn test_fetch_reports_http_status() {
        let page = "<html>".to_string() + &"halaman tidak ditemukan ".repeat(100) + "</html>";
        let not_found = format!(
            "HTTP/1.1 404 Not Found\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            page.len(),
            page
        );
        let (base, _requests) = serve(vec![not_found]).await;
        let url = format!("{base}/missing");
        let err = fetcher(Duration::from_secs(5)).fetch(&url).await.unwrap_err();

        assert_eq!(err, FetchError::HttpStatus { url, status: 404 });
    }

    #[tokio::test]
    async fn test_fetch_follows_redirects() {
        let redirect = "HTTP/1.1 302 Found\r\nLocation: /moved\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            .to_string();
        let (base, mut requests) = serve(vec![redirect, ok("moved body")]).await;
        let body = fetcher(Duration::from_secs(5))
            .fetch(&format!("{base}/old"))
            .await
            .unwrap();

        assert_eq!(body, "moved body");
        let _first = requests.recv().await.unwrap();
        let second = requests.recv().await.unwrap();
        assert!(second.starts_with("GET /moved "));
    }

    #[tokio::test]
    async fn test_fetch_follows_long_redirect_chain() {
        let mut responses: Vec<String> = (1..=15)
            .map(|i| {
                format!(
                    "HTTP/1.1 301 Moved Permanently\r\nLocation: /hop/{i}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                )
            })
            .collect();
        responses.push(ok("arrived"));
        let (base, _requests) = serve(responses).await;

        let body = fetcher(Duration::from_secs(5))
            .fetch(&format!("{base}/start"))
            .await
            .unwrap();

        assert_eq!(body, "arrived");
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });
        let url = format!("http://{addr}/slow");
        let err = fetcher(Duration::from_millis(200))
            .fetch(&url)
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::Timeout { url });
    }

    #[tokio::test]
    async fn test_fetch_rejects_link_sentinel() {
        let err = fetcher(Duration::from_secs(1)).fetch("#").await.unwrap_err();
        assert_eq!(err, FetchError::InvalidUrl { url: "#".to_string() });
    }

    #[test]
    fn test_error_messages() {
        let err = FetchError::Timeout {
            url: "https://example.com".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Timeout: unable to connect to https://example.com. Please try again."
        );
    }
}
