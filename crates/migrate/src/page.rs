// ABOUTME: HTTP page fetcher returning an owned page handle with a parseable DOM.
// ABOUTME: Bounded timeouts, status checks, and raw-document snapshots for auditing.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use scraper::Html;
use tracing::debug;
use url::Url;

use crate::error::{MigrateError, Result};

const USER_AGENT: &str = "ue-migrate/0.1 (content migration)";

/// Default per-page timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longer timeout used by the full-site pass.
pub const SITE_PASS_TIMEOUT: Duration = Duration::from_secs(60);

/// A fetched page: the final URL after redirects and the raw document text.
///
/// The handle owns plain text rather than a parsed DOM so it can be held
/// across await points; `document()` parses on demand.
#[derive(Debug, Clone)]
pub struct PageHandle {
    final_url: Url,
    html: String,
}

impl PageHandle {
    /// The URL the fetch ended up at after redirects.
    pub fn final_url(&self) -> &Url {
        &self.final_url
    }

    /// The raw document text as fetched.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Parse the document for selector queries.
    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }

    /// Write the raw fetched document to `path` as the page-capture audit
    /// artifact.
    pub async fn save_snapshot(&self, path: &Path) -> Result<()> {
        tokio::fs::write(path, &self.html).await.map_err(|e| {
            MigrateError::output(path.display().to_string(), "SaveSnapshot", Some(e.into()))
        })
    }
}

/// Fetches pages with a bounded timeout.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Build a fetcher with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| MigrateError::config("http client", "BuildFetcher", Some(e.into())))?;
        Ok(Self { client })
    }

    /// Fetch `url` and return a handle to the loaded page.
    ///
    /// A malformed URL, a network failure, a timeout, or a non-2xx status
    /// fails the call. Callers in the scrape loops log and move on.
    pub async fn load(&self, url: &str) -> Result<PageHandle> {
        let parsed = Url::parse(url)
            .map_err(|e| MigrateError::invalid_url(url, "LoadPage", Some(e.into())))?;

        let response = self.client.get(parsed).send().await.map_err(|e| {
            if e.is_timeout() {
                MigrateError::timeout(url, "LoadPage", Some(e.into()))
            } else {
                MigrateError::fetch(url, "LoadPage", Some(e.into()))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MigrateError::fetch(
                url,
                "LoadPage",
                Some(anyhow::anyhow!("HTTP status {}", status)),
            ));
        }

        let final_url = response.url().clone();
        let html = response
            .text()
            .await
            .map_err(|e| MigrateError::fetch(url, "LoadPage", Some(e.into())))?;
        debug!(url = %final_url, bytes = html.len(), "page loaded");

        Ok(PageHandle { final_url, html })
    }
}
