// ABOUTME: Sanity asset uploads and document patches over the HTTP API.
// ABOUTME: Memoizes uploads per filename and patches hero/gallery atomically.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::config::{Paths, SanityConfig, SANITY_API_VERSION};
use crate::error::{MigrateError, Result};
use crate::mapping::{ImageMapping, PropertyImages, SiteImages};
use crate::normalize::document_id;

/// Extensions stored as plain file assets rather than images.
const FILE_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "svg"];

/// Which asset endpoint a file goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    File,
}

impl AssetKind {
    /// Route by extension: video and vector files are file assets,
    /// everything else an image.
    pub fn for_filename(filename: &str) -> Self {
        let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
        if FILE_EXTENSIONS.contains(&ext.as_str()) {
            AssetKind::File
        } else {
            AssetKind::Image
        }
    }

    fn path_segment(self) -> &'static str {
        match self {
            AssetKind::Image => "images",
            AssetKind::File => "files",
        }
    }

    fn ref_type(self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::File => "file",
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    document: UploadedDocument,
}

#[derive(Debug, Deserialize)]
struct UploadedDocument {
    #[serde(rename = "_id")]
    id: String,
}

/// A stored asset: its document id and the kind it was uploaded as.
#[derive(Debug, Clone)]
pub struct AssetRef {
    pub id: String,
    pub kind: AssetKind,
}

impl AssetRef {
    /// The `{ _type, asset: { _ref } }` value a patch sets.
    pub fn to_value(&self) -> Value {
        json!({
            "_type": self.kind.ref_type(),
            "asset": { "_type": "reference", "_ref": self.id }
        })
    }

    fn to_keyed_value(&self, key: &str) -> Value {
        let mut value = self.to_value();
        value["_key"] = Value::String(key.to_string());
        value
    }
}

/// Thin client for the Sanity assets and mutate endpoints.
#[derive(Debug, Clone)]
pub struct SanityClient {
    http: reqwest::Client,
    endpoint: String,
    dataset: String,
    token: String,
}

impl SanityClient {
    pub fn new(config: &SanityConfig) -> Result<Self> {
        let endpoint = format!(
            "https://{}.api.sanity.io/v{}",
            config.project_id, SANITY_API_VERSION
        );
        Self::with_endpoint(endpoint, &config.dataset, &config.token)
    }

    /// Client against an explicit endpoint. Lets tests point at a local
    /// server.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        dataset: &str,
        token: &str,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| MigrateError::config("http client", "BuildSanityClient", Some(e.into())))?;
        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            dataset: dataset.to_string(),
            token: token.to_string(),
        })
    }

    /// Upload raw bytes as an asset, returning the stored asset reference.
    pub async fn upload_asset(
        &self,
        kind: AssetKind,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<AssetRef> {
        let url = format!(
            "{}/assets/{}/{}?filename={}",
            self.endpoint,
            kind.path_segment(),
            self.dataset,
            filename
        );
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header("content-type", "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| MigrateError::upload(filename, "UploadAsset", Some(e.into())))?;
        let status = response.status();
        if !status.is_success() {
            return Err(MigrateError::upload(
                filename,
                "UploadAsset",
                Some(anyhow::anyhow!("HTTP status {}", status)),
            ));
        }
        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| MigrateError::upload(filename, "UploadAsset", Some(e.into())))?;
        Ok(AssetRef {
            id: parsed.document.id,
            kind,
        })
    }

    /// Apply a single `set` patch to one document.
    pub async fn patch(&self, id: &str, set: Value) -> Result<()> {
        let url = format!("{}/data/mutate/{}", self.endpoint, self.dataset);
        let body = json!({ "mutations": [ { "patch": { "id": id, "set": set } } ] });
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| MigrateError::api(id, "PatchDocument", Some(e.into())))?;
        let status = response.status();
        if !status.is_success() {
            return Err(MigrateError::api(
                id,
                "PatchDocument",
                Some(anyhow::anyhow!("HTTP status {}", status)),
            ));
        }
        Ok(())
    }
}

/// Counts reported at the end of an upload run.
#[derive(Debug, Default)]
pub struct UploadSummary {
    pub uploaded: usize,
    pub reused: usize,
    pub patched: usize,
    pub failed: usize,
}

/// Uploads local media and patches documents with asset references.
///
/// Uploads are memoized by filename, so a file shared between documents is
/// sent once per run.
pub struct AssetUploader {
    client: SanityClient,
    media_dir: PathBuf,
    cache: HashMap<String, AssetRef>,
    pub summary: UploadSummary,
}

impl AssetUploader {
    pub fn new(client: SanityClient, media_dir: PathBuf) -> Self {
        Self {
            client,
            media_dir,
            cache: HashMap::new(),
            summary: UploadSummary::default(),
        }
    }

    /// Upload one local file, reusing the cached asset id when this
    /// filename was already uploaded this run.
    pub async fn upload_file(&mut self, filename: &str) -> Result<AssetRef> {
        if let Some(cached) = self.cache.get(filename) {
            self.summary.reused += 1;
            return Ok(cached.clone());
        }
        let path = self.media_dir.join(filename);
        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            MigrateError::upload(filename, "ReadMedia", Some(e.into()))
        })?;
        let kind = AssetKind::for_filename(filename);
        let asset = self.client.upload_asset(kind, filename, bytes).await?;
        info!(filename, asset = %asset.id, "asset uploaded");
        self.summary.uploaded += 1;
        self.cache.insert(filename.to_string(), asset.clone());
        Ok(asset)
    }

    /// Upload a property's hero and gallery, then patch both fields in one
    /// mutation.
    ///
    /// A failed hero upload aborts the property entirely; a failed gallery
    /// item is omitted from the gallery array.
    pub async fn update_property(&mut self, slug: &str, images: &PropertyImages) -> Result<()> {
        let hero = self.upload_file(&images.hero_image).await.map_err(|e| {
            warn!(slug, error = %e, "hero upload failed, property skipped");
            self.summary.failed += 1;
            e
        })?;

        let mut gallery = Vec::new();
        for (index, filename) in images.gallery.iter().enumerate() {
            match self.upload_file(filename).await {
                Ok(asset) => {
                    gallery.push(asset.to_keyed_value(&format!("gallery-{}", index)));
                }
                Err(e) => {
                    warn!(slug, filename, error = %e, "gallery image skipped");
                    self.summary.failed += 1;
                }
            }
        }

        let id = document_id("property", slug);
        let gallery_count = gallery.len();
        self.client
            .patch(&id, json!({ "heroImage": hero.to_value(), "gallery": gallery }))
            .await?;
        self.summary.patched += 1;
        info!(slug, gallery = gallery_count, "property patched");
        Ok(())
    }

    /// Upload a tour's image and patch its `image` field.
    pub async fn update_tour(&mut self, slug: &str, filename: &str) -> Result<()> {
        let asset = self.upload_file(filename).await?;
        let id = document_id("tour", slug);
        self.client
            .patch(&id, json!({ "image": asset.to_value() }))
            .await?;
        self.summary.patched += 1;
        Ok(())
    }

    /// Upload site media and patch only the fields whose upload succeeded.
    pub async fn update_site_settings(&mut self, site: &SiteImages) -> Result<()> {
        let mut set = serde_json::Map::new();
        for (field, filename) in [
            ("logo", site.logo.as_str()),
            ("elephantIcon", site.elephant_icon.as_str()),
            ("heroVideo", site.hero_video.as_str()),
        ] {
            if filename.is_empty() {
                continue;
            }
            match self.upload_file(filename).await {
                Ok(asset) => {
                    set.insert(field.to_string(), asset.to_value());
                }
                Err(e) => {
                    warn!(field, filename, error = %e, "site asset skipped");
                    self.summary.failed += 1;
                }
            }
        }
        if set.is_empty() {
            warn!("no site assets uploaded, settings not patched");
            return Ok(());
        }
        self.client.patch("siteSettings", Value::Object(set)).await?;
        self.summary.patched += 1;
        Ok(())
    }
}

/// Run the whole upload stage against the mapping file.
///
/// Per-document failures are logged and the run continues; the summary
/// carries the failure count.
pub async fn run_upload(config: &SanityConfig, paths: &Paths) -> Result<UploadSummary> {
    let mapping = ImageMapping::load(&paths.mapping_path()).await?;
    let client = SanityClient::new(config)?;
    let mut uploader = AssetUploader::new(client, paths.media_dir.clone());

    for (slug, images) in &mapping.properties {
        if let Err(e) = uploader.update_property(slug, images).await {
            warn!(slug, error = %e, "property not updated");
        }
    }
    for (slug, filename) in &mapping.tours {
        if let Err(e) = uploader.update_tour(slug, filename).await {
            warn!(slug, error = %e, "tour not updated");
            uploader.summary.failed += 1;
        }
    }
    if let Err(e) = uploader.update_site_settings(&mapping.site).await {
        warn!(error = %e, "site settings not updated");
    }

    Ok(uploader.summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;

    fn uploader_for(server: &MockServer, media_dir: &std::path::Path) -> AssetUploader {
        let client = SanityClient::with_endpoint(server.base_url(), "production", "tkn").unwrap();
        AssetUploader::new(client, media_dir.to_path_buf())
    }

    fn write_media(dir: &std::path::Path, names: &[&str]) {
        for name in names {
            std::fs::write(dir.join(name), b"bytes").unwrap();
        }
    }

    #[test]
    fn extension_routing() {
        assert_eq!(AssetKind::for_filename("hero.jpg"), AssetKind::Image);
        assert_eq!(AssetKind::for_filename("photo.JPEG"), AssetKind::Image);
        assert_eq!(AssetKind::for_filename("logo.svg"), AssetKind::File);
        assert_eq!(AssetKind::for_filename("intro.mp4"), AssetKind::File);
        assert_eq!(AssetKind::for_filename("clip.MOV"), AssetKind::File);
    }

    #[tokio::test]
    async fn upload_is_memoized_per_filename() {
        let server = MockServer::start_async().await;
        let upload = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/assets/images/production")
                    .query_param("filename", "shared.jpg");
                then.status(200)
                    .json_body(serde_json::json!({ "document": { "_id": "image-shared" } }));
            })
            .await;
        let mutate = server
            .mock_async(|when, then| {
                when.method(POST).path("/data/mutate/production");
                then.status(200).json_body(serde_json::json!({ "transactionId": "t" }));
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        write_media(dir.path(), &["shared.jpg"]);
        let mut uploader = uploader_for(&server, dir.path());

        uploader.update_tour("aquila-safari", "shared.jpg").await.unwrap();
        uploader.update_tour("boat-cruises", "shared.jpg").await.unwrap();

        upload.assert_calls_async(1).await;
        mutate.assert_calls_async(2).await;
        assert_eq!(uploader.summary.uploaded, 1);
        assert_eq!(uploader.summary.reused, 1);
    }

    #[tokio::test]
    async fn hero_failure_means_no_patch() {
        let server = MockServer::start_async().await;
        let mutate = server
            .mock_async(|when, then| {
                when.method(POST).path("/data/mutate/production");
                then.status(200).json_body(serde_json::json!({ "transactionId": "t" }));
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        // Hero file missing on disk; gallery file present.
        write_media(dir.path(), &["g1.jpg"]);
        let mut uploader = uploader_for(&server, dir.path());

        let images = PropertyImages {
            hero_image: "missing-hero.jpg".to_string(),
            gallery: vec!["g1.jpg".to_string()],
        };
        let err = uploader.update_property("the-rose", &images).await.unwrap_err();
        assert!(err.is_upload());
        mutate.assert_calls_async(0).await;
        assert_eq!(uploader.summary.patched, 0);
    }

    #[tokio::test]
    async fn gallery_failures_are_omitted_from_single_patch() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/assets/images/production")
                    .query_param("filename", "hero.jpg");
                then.status(200)
                    .json_body(serde_json::json!({ "document": { "_id": "image-hero" } }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/assets/images/production")
                    .query_param("filename", "g2.jpg");
                then.status(200)
                    .json_body(serde_json::json!({ "document": { "_id": "image-g2" } }));
            })
            .await;
        let mutate = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/data/mutate/production")
                    .json_body_includes(
                        r#"{ "mutations": [ { "patch": { "id": "property-the-rose" } } ] }"#,
                    );
                then.status(200).json_body(serde_json::json!({ "transactionId": "t" }));
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        // g1.jpg deliberately absent.
        write_media(dir.path(), &["hero.jpg", "g2.jpg"]);
        let mut uploader = uploader_for(&server, dir.path());

        let images = PropertyImages {
            hero_image: "hero.jpg".to_string(),
            gallery: vec!["g1.jpg".to_string(), "g2.jpg".to_string()],
        };
        uploader.update_property("the-rose", &images).await.unwrap();

        mutate.assert_calls_async(1).await;
        assert_eq!(uploader.summary.patched, 1);
        assert_eq!(uploader.summary.failed, 1);
    }

    #[tokio::test]
    async fn svg_and_video_go_to_the_files_endpoint() {
        let server = MockServer::start_async().await;
        let files = server
            .mock_async(|when, then| {
                when.method(POST).path("/assets/files/production");
                then.status(200)
                    .json_body(serde_json::json!({ "document": { "_id": "file-abc" } }));
            })
            .await;
        let mutate = server
            .mock_async(|when, then| {
                when.method(POST).path("/data/mutate/production");
                then.status(200).json_body(serde_json::json!({ "transactionId": "t" }));
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        write_media(dir.path(), &["logo.svg", "home.mp4"]);
        let mut uploader = uploader_for(&server, dir.path());

        let site = SiteImages {
            logo: "logo.svg".to_string(),
            elephant_icon: String::new(),
            hero_video: "home.mp4".to_string(),
        };
        uploader.update_site_settings(&site).await.unwrap();

        files.assert_calls_async(2).await;
        mutate.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn site_settings_skip_patch_when_nothing_uploaded() {
        let server = MockServer::start_async().await;
        let mutate = server
            .mock_async(|when, then| {
                when.method(POST).path("/data/mutate/production");
                then.status(200).json_body(serde_json::json!({ "transactionId": "t" }));
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut uploader = uploader_for(&server, dir.path());
        let site = SiteImages {
            logo: "absent.svg".to_string(),
            elephant_icon: String::new(),
            hero_video: String::new(),
        };
        uploader.update_site_settings(&site).await.unwrap();
        mutate.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn run_upload_walks_the_mapping() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path_includes("/assets/");
                then.status(200)
                    .json_body(serde_json::json!({ "document": { "_id": "image-x" } }));
            })
            .await;
        let mutate = server
            .mock_async(|when, then| {
                when.method(POST).path("/data/mutate/production");
                then.status(200).json_body(serde_json::json!({ "transactionId": "t" }));
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("media");
        std::fs::create_dir_all(&media).unwrap();
        write_media(&media, &["hero.jpg", "tour.jpg"]);

        let mut mapping = ImageMapping::default();
        mapping.properties.insert(
            "the-rose".to_string(),
            PropertyImages { hero_image: "hero.jpg".to_string(), gallery: vec![] },
        );
        mapping.tours.insert("aquila-safari".to_string(), "tour.jpg".to_string());

        let paths = Paths {
            scrape_dir: dir.path().join("scraped-content"),
            media_dir: media,
            import_dir: dir.path().join("sanity-import"),
        };
        mapping.save(&paths.mapping_path()).await.unwrap();

        let client = SanityClient::with_endpoint(server.base_url(), "production", "tkn").unwrap();
        let mut uploader = AssetUploader::new(client, paths.media_dir.clone());
        for (slug, images) in &mapping.properties {
            uploader.update_property(slug, images).await.unwrap();
        }
        for (slug, filename) in &mapping.tours {
            uploader.update_tour(slug, filename).await.unwrap();
        }
        // Empty site images: no further patch.
        uploader.update_site_settings(&mapping.site).await.unwrap();

        mutate.assert_calls_async(2).await;
        assert_eq!(uploader.summary.uploaded, 2);
    }
}
