// ABOUTME: Environment-driven configuration for the migration pipeline.
// ABOUTME: Sanity credentials, legacy endpoints, and the on-disk directory layout.

use std::env;
use std::path::PathBuf;

use crate::error::MigrateError;

/// Default public site to scrape. Override with SITE_BASE_URL.
pub const DEFAULT_SITE_URL: &str = "https://www.urbanelephant.co.za";

/// Default legacy Strapi deployment. Override with STRAPI_URL.
pub const DEFAULT_STRAPI_URL: &str = "https://octopus-app-5f2hl.ondigitalocean.app";

/// Sanity HTTP API version used for asset uploads and patches.
pub const SANITY_API_VERSION: &str = "2024-01-01";

/// Write-capable Sanity credentials, read from the environment.
///
/// Required by the asset-upload stage only; the scrape and import stages
/// produce files for `sanity dataset import` and need no token.
#[derive(Debug, Clone)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    pub token: String,
}

impl SanityConfig {
    /// Read credentials from SANITY_PROJECT_ID, SANITY_DATASET (default
    /// "production"), and SANITY_API_TOKEN.
    ///
    /// Missing required variables is a fatal pre-flight error naming every
    /// variable that is absent, so an operator can fix them in one pass.
    pub fn from_env() -> Result<Self, MigrateError> {
        let project_id = env::var("SANITY_PROJECT_ID").ok().filter(|v| !v.is_empty());
        let token = env::var("SANITY_API_TOKEN").ok().filter(|v| !v.is_empty());
        let dataset = env::var("SANITY_DATASET")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "production".to_string());

        let mut missing = Vec::new();
        if project_id.is_none() {
            missing.push("SANITY_PROJECT_ID");
        }
        if token.is_none() {
            missing.push("SANITY_API_TOKEN");
        }
        if !missing.is_empty() {
            return Err(MigrateError::config(
                missing.join(", "),
                "Preflight",
                Some(anyhow::anyhow!("required environment variables not set")),
            ));
        }

        Ok(Self {
            project_id: project_id.unwrap(),
            dataset,
            token: token.unwrap(),
        })
    }
}

/// Base URL of the public site, with environment override.
pub fn site_base_url() -> String {
    env::var("SITE_BASE_URL")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_SITE_URL.to_string())
}

/// Base URL of the legacy Strapi API, with environment override.
pub fn strapi_base_url() -> String {
    env::var("STRAPI_URL")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_STRAPI_URL.to_string())
}

/// On-disk layout shared by the pipeline stages.
///
/// `scrape_dir` holds the raw site bundle and page snapshots, with downloaded
/// assets under `scrape_dir/assets`. `media_dir` is the curated flat media
/// directory the uploader reads. `import_dir` holds the bulk-import payload,
/// audit copies, and the image mapping.
#[derive(Debug, Clone)]
pub struct Paths {
    pub scrape_dir: PathBuf,
    pub media_dir: PathBuf,
    pub import_dir: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            scrape_dir: PathBuf::from("scraped-content"),
            media_dir: PathBuf::from("scraped-media"),
            import_dir: PathBuf::from("sanity-import"),
        }
    }
}

impl Paths {
    /// Default layout with MIGRATE_OUTPUT_DIR / MIGRATE_MEDIA_DIR overrides.
    pub fn from_env() -> Self {
        let mut paths = Self::default();
        if let Ok(dir) = env::var("MIGRATE_OUTPUT_DIR") {
            if !dir.is_empty() {
                paths.import_dir = PathBuf::from(dir);
            }
        }
        if let Ok(dir) = env::var("MIGRATE_MEDIA_DIR") {
            if !dir.is_empty() {
                paths.media_dir = PathBuf::from(dir);
            }
        }
        paths
    }

    /// Directory for downloaded site assets.
    pub fn assets_dir(&self) -> PathBuf {
        self.scrape_dir.join("assets")
    }

    /// Path of the bulk-import NDJSON payload.
    pub fn ndjson_path(&self) -> PathBuf {
        self.import_dir.join("sanity-import.ndjson")
    }

    /// Path of the slug-to-filename image mapping.
    pub fn mapping_path(&self) -> PathBuf {
        self.import_dir.join("image-mapping.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let paths = Paths::default();
        assert_eq!(paths.assets_dir(), PathBuf::from("scraped-content/assets"));
        assert_eq!(
            paths.ndjson_path(),
            PathBuf::from("sanity-import/sanity-import.ndjson")
        );
        assert_eq!(
            paths.mapping_path(),
            PathBuf::from("sanity-import/image-mapping.json")
        );
    }
}
