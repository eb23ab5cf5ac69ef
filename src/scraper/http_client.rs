use crate::config::HttpConfig;
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::debug;

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Thin wrapper around `reqwest::Client`. One request at a time, no retries.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            // Yahoo hands out its session cookie on a separate request
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { inner })
    }

    /// GET a URL and return status + body, whatever the status.
    pub async fn get(&self, url: &str, referer: Option<&str>) -> Result<HttpResponse, reqwest::Error> {
        debug!("GET {}", url);

        let mut request = self.inner.get(url);
        if let Some(referer) = referer {
            request = request.header(reqwest::header::REFERER, referer);
        }

        let resp = request.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(HttpResponse { status, body })
    }

    /// GET a URL as text; any non-2xx status is an error.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let resp = self
            .get(url, None)
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        if !resp.is_success() {
            anyhow::bail!("HTTP error {} for {}", resp.status, url);
        }
        Ok(resp.body)
    }
}
