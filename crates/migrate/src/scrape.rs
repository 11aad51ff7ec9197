// ABOUTME: Full-site scrape: fixed URL list, link discovery, and asset download.
// ABOUTME: Produces site-data.json, content-summary.md, snapshots, and downloaded assets.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use reqwest::redirect;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::config::Paths;
use crate::error::{MigrateError, Result};
use crate::extract;
use crate::page::{PageFetcher, SITE_PASS_TIMEOUT};

/// Paths scraped on every run, relative to the site base URL.
const FIXED_PATHS: &[&str] = &["", "/about", "/properties", "/tours", "/contact", "/car-hire"];

/// Maximum number of discovered detail pages scraped beyond the fixed list.
const MAX_DETAIL_PAGES: usize = 10;

/// Everything recorded for one scraped page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPageRecord {
    pub url: String,
    pub title: String,
    #[serde(rename = "metaDescription", skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(rename = "allText")]
    pub all_text: String,
    pub headings: Vec<HeadingRecord>,
    pub paragraphs: Vec<String>,
    pub links: Vec<LinkRecord>,
    pub images: Vec<ImageRecord>,
    pub buttons: Vec<String>,
    #[serde(rename = "backgroundImages")]
    pub background_images: Vec<String>,
    pub colors: Vec<String>,
    pub fonts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadingRecord {
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkRecord {
    pub text: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    pub src: String,
    pub alt: String,
}

/// The pretty-printed audit bundle written as `site-data.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteData {
    #[serde(rename = "scrapedAt")]
    pub scraped_at: String,
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    pub pages: Vec<RawPageRecord>,
}

/// Mutable scrape state threaded through the pass.
///
/// Holds the visited set and the ordered image-URL set; nothing here is
/// process-global.
#[derive(Debug, Default)]
pub struct ScrapeContext {
    visited: HashSet<String>,
    image_urls: Vec<String>,
}

impl ScrapeContext {
    fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    fn record_image(&mut self, src: &str) {
        if !self.image_urls.iter().any(|u| u == src) {
            self.image_urls.push(src.to_string());
        }
    }
}

/// Counts reported at the end of a scrape run.
#[derive(Debug, Default)]
pub struct ScrapeSummary {
    pub pages: usize,
    pub images_downloaded: usize,
    pub images_skipped: usize,
    pub images_failed: usize,
}

/// Scrape the whole site: fixed pages, discovered detail pages, then a
/// global asset-download pass. Per-page failures are logged and skipped.
pub async fn run_scrape(base_url: &str, paths: &Paths) -> Result<ScrapeSummary> {
    let base = Url::parse(base_url)
        .map_err(|e| MigrateError::invalid_url(base_url, "Scrape", Some(e.into())))?;
    let fetcher = PageFetcher::new(SITE_PASS_TIMEOUT)?;

    tokio::fs::create_dir_all(&paths.scrape_dir).await.map_err(|e| {
        MigrateError::output(paths.scrape_dir.display().to_string(), "Scrape", Some(e.into()))
    })?;
    tokio::fs::create_dir_all(paths.assets_dir()).await.map_err(|e| {
        MigrateError::output(paths.assets_dir().display().to_string(), "Scrape", Some(e.into()))
    })?;

    let mut ctx = ScrapeContext::default();
    let mut pages = Vec::new();

    for path in FIXED_PATHS {
        let url = format!("{}{}", base_url.trim_end_matches('/'), path);
        if let Some(record) = scrape_page(&fetcher, &url, path, &mut ctx, paths).await {
            pages.push(record);
        }
    }

    // Same-origin links collected so far, recursed into for detail pages only.
    let detail_urls = discover_detail_urls(&base, &pages, &ctx);
    for url in detail_urls {
        let name = page_name(&base, &url);
        if let Some(record) = scrape_page(&fetcher, &url, &name, &mut ctx, paths).await {
            pages.push(record);
        }
    }

    let site_data = SiteData {
        scraped_at: Utc::now().to_rfc3339(),
        base_url: base_url.to_string(),
        pages,
    };
    write_site_data(&site_data, paths).await?;
    write_summary_markdown(&site_data, paths).await?;

    let mut summary = ScrapeSummary {
        pages: site_data.pages.len(),
        ..ScrapeSummary::default()
    };
    download_images(&base, &ctx.image_urls, &paths.assets_dir(), &mut summary).await?;

    info!(
        pages = summary.pages,
        downloaded = summary.images_downloaded,
        skipped = summary.images_skipped,
        failed = summary.images_failed,
        "scrape complete"
    );
    Ok(summary)
}

async fn scrape_page(
    fetcher: &PageFetcher,
    url: &str,
    path: &str,
    ctx: &mut ScrapeContext,
    paths: &Paths,
) -> Option<RawPageRecord> {
    if !ctx.mark_visited(url) {
        return None;
    }
    let page = match fetcher.load(url).await {
        Ok(page) => page,
        Err(e) => {
            warn!(url, error = %e, "page skipped");
            return None;
        }
    };

    let snapshot = paths
        .scrape_dir
        .join(format!("snapshot_{}.html", snapshot_name(path)));
    if let Err(e) = page.save_snapshot(&snapshot).await {
        warn!(url, error = %e, "snapshot not written");
    }

    let doc = page.document();
    let record = RawPageRecord {
        url: url.to_string(),
        // Pages without a <title> fall back to their first heading.
        title: extract::page_title(&doc)
            .or_else(|| extract::headings(&doc).first().map(|(_, t)| t.clone()))
            .unwrap_or_default(),
        meta_description: extract::meta_description(&doc),
        all_text: extract::body_text(&doc),
        headings: extract::headings(&doc)
            .into_iter()
            .map(|(level, text)| HeadingRecord { level, text })
            .collect(),
        paragraphs: extract::try_selector(&doc, "p")
            .iter()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        links: extract::link_pairs(&doc)
            .into_iter()
            .map(|(text, href)| LinkRecord { text, href })
            .collect(),
        images: extract::image_tags(&doc)
            .into_iter()
            .map(|(src, alt)| ImageRecord { src, alt })
            .collect(),
        buttons: extract::cta_texts(&doc),
        background_images: extract::background_image_urls(&doc),
        colors: extract::declared_colors(&doc),
        fonts: extract::declared_fonts(&doc),
    };

    for img in &record.images {
        ctx.record_image(&img.src);
    }
    for src in &record.background_images {
        ctx.record_image(src);
    }
    info!(url, headings = record.headings.len(), images = record.images.len(), "page scraped");
    Some(record)
}

/// Same-origin links pointing at property or tour detail pages, not yet
/// visited, fragments dropped, capped at MAX_DETAIL_PAGES.
fn discover_detail_urls(base: &Url, pages: &[RawPageRecord], ctx: &ScrapeContext) -> Vec<String> {
    let mut out = Vec::new();
    for page in pages {
        for link in &page.links {
            if link.href.starts_with('#') {
                continue;
            }
            let Ok(resolved) = base.join(&link.href) else {
                continue;
            };
            if resolved.host_str() != base.host_str() {
                continue;
            }
            let mut resolved = resolved;
            resolved.set_fragment(None);
            let path = resolved.path().to_string();
            if !(path.contains("/properties/") || path.contains("/tours/")) {
                continue;
            }
            let url = resolved.to_string();
            if ctx.visited.contains(&url) || out.contains(&url) {
                continue;
            }
            out.push(url);
            if out.len() == MAX_DETAIL_PAGES {
                return out;
            }
        }
    }
    out
}

fn snapshot_name(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "home".to_string()
    } else {
        trimmed.replace('/', "-")
    }
}

fn page_name(base: &Url, url: &str) -> String {
    Url::parse(url)
        .ok()
        .filter(|u| u.host_str() == base.host_str())
        .map(|u| u.path().to_string())
        .unwrap_or_else(|| url.to_string())
}

async fn write_site_data(data: &SiteData, paths: &Paths) -> Result<()> {
    let path = paths.scrape_dir.join("site-data.json");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| MigrateError::output(path.display().to_string(), "WriteSiteData", Some(e.into())))?;
    tokio::fs::write(&path, json)
        .await
        .map_err(|e| MigrateError::output(path.display().to_string(), "WriteSiteData", Some(e.into())))
}

async fn write_summary_markdown(data: &SiteData, paths: &Paths) -> Result<()> {
    let mut md = String::new();
    md.push_str("# Content Summary\n\n");
    md.push_str(&format!("Scraped {} at {}\n\n", data.base_url, data.scraped_at));
    for page in &data.pages {
        md.push_str(&format!("## {}\n\n", if page.title.is_empty() { &page.url } else { &page.title }));
        md.push_str(&format!("- URL: {}\n", page.url));
        if let Some(desc) = &page.meta_description {
            md.push_str(&format!("- Description: {}\n", desc));
        }
        md.push_str(&format!("- Headings: {}\n", page.headings.len()));
        md.push_str(&format!("- Paragraphs: {}\n", page.paragraphs.len()));
        md.push_str(&format!("- Images: {}\n", page.images.len()));
        md.push_str(&format!("- Links: {}\n\n", page.links.len()));
    }
    let path = paths.scrape_dir.join("content-summary.md");
    tokio::fs::write(&path, md)
        .await
        .map_err(|e| MigrateError::output(path.display().to_string(), "WriteSummary", Some(e.into())))
}

/// Resolve an image `src` to an absolute URL against the site base.
///
/// Protocol-relative srcs get `https:`; root-relative and bare srcs resolve
/// against the base. `data:` URLs are not downloadable and yield `None`.
pub fn resolve_asset_url(base: &Url, src: &str) -> Option<String> {
    if src.starts_with("data:") || src.is_empty() {
        return None;
    }
    if src.starts_with("//") {
        return Some(format!("https:{}", src));
    }
    if src.starts_with("http://") || src.starts_with("https://") {
        return Some(src.to_string());
    }
    base.join(src).ok().map(|u| u.to_string())
}

/// Filename for a downloaded asset: the URL path basename with query and
/// fragment stripped, defaulting to a `.png` extension when none is present.
pub fn asset_filename(url: &str) -> String {
    let basename = url
        .rsplit('/')
        .next()
        .unwrap_or(url)
        .split(['?', '#'])
        .next()
        .unwrap_or("")
        .to_string();
    let basename = if basename.is_empty() {
        "asset".to_string()
    } else {
        basename
    };
    if basename.contains('.') {
        basename
    } else {
        format!("{}.png", basename)
    }
}

/// Download every recorded image into `dir`, skipping files already present.
///
/// Redirects are followed for at most one hop; any failure is a logged
/// per-item miss, never fatal.
pub async fn download_images(
    base: &Url,
    sources: &[String],
    dir: &Path,
    summary: &mut ScrapeSummary,
) -> Result<()> {
    let client = reqwest::Client::builder()
        .user_agent("ue-migrate/0.1 (content migration)")
        .redirect(redirect::Policy::none())
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| MigrateError::config("http client", "DownloadImages", Some(e.into())))?;

    for src in sources {
        let Some(url) = resolve_asset_url(base, src) else {
            continue;
        };
        let filename = asset_filename(&url);
        let target = dir.join(&filename);
        if target.exists() {
            summary.images_skipped += 1;
            continue;
        }
        match fetch_with_one_redirect(&client, &url).await {
            Ok(bytes) => {
                if let Err(e) = tokio::fs::write(&target, &bytes).await {
                    warn!(url = %url, error = %e, "asset not written");
                    summary.images_failed += 1;
                } else {
                    info!(file = %filename, bytes = bytes.len(), "asset downloaded");
                    summary.images_downloaded += 1;
                }
            }
            Err(e) => {
                warn!(url = %url, error = %e, "asset download failed");
                summary.images_failed += 1;
            }
        }
    }
    Ok(())
}

async fn fetch_with_one_redirect(client: &reqwest::Client, url: &str) -> Result<bytes::Bytes> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| MigrateError::fetch(url, "DownloadImage", Some(e.into())))?;

    let status = response.status();
    if status.as_u16() == 301 || status.as_u16() == 302 {
        let location = response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                MigrateError::fetch(url, "DownloadImage", Some(anyhow::anyhow!("redirect without location")))
            })?;
        let next = response
            .url()
            .join(location)
            .map_err(|e| MigrateError::invalid_url(location, "DownloadImage", Some(e.into())))?;
        let followed = client
            .get(next)
            .send()
            .await
            .map_err(|e| MigrateError::fetch(url, "DownloadImage", Some(e.into())))?;
        if !followed.status().is_success() {
            return Err(MigrateError::fetch(
                url,
                "DownloadImage",
                Some(anyhow::anyhow!("HTTP status {} after redirect", followed.status())),
            ));
        }
        return followed
            .bytes()
            .await
            .map_err(|e| MigrateError::fetch(url, "DownloadImage", Some(e.into())));
    }

    if !status.is_success() {
        return Err(MigrateError::fetch(
            url,
            "DownloadImage",
            Some(anyhow::anyhow!("HTTP status {}", status)),
        ));
    }
    response
        .bytes()
        .await
        .map_err(|e| MigrateError::fetch(url, "DownloadImage", Some(e.into())))
}
