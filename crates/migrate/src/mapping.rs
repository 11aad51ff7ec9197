// ABOUTME: The image-mapping join table between document slugs and media filenames.
// ABOUTME: Written by the seed stage, read by the asset uploader.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, Result};

/// Hero plus gallery filenames for one property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyImages {
    #[serde(rename = "heroImage")]
    pub hero_image: String,
    #[serde(default)]
    pub gallery: Vec<String>,
}

/// Site-wide media: logo, icon, and the homepage hero video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteImages {
    pub logo: String,
    #[serde(rename = "elephantIcon")]
    pub elephant_icon: String,
    #[serde(rename = "heroVideo")]
    pub hero_video: String,
}

/// The full slug-to-filename mapping the uploader consumes.
///
/// Maps are ordered so the file serializes deterministically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageMapping {
    pub properties: BTreeMap<String, PropertyImages>,
    pub tours: BTreeMap<String, String>,
    pub site: SiteImages,
    #[serde(rename = "mediaDir", skip_serializing_if = "Option::is_none")]
    pub media_dir: Option<String>,
}

impl ImageMapping {
    /// Read and decode the mapping file. A missing or malformed file is a
    /// configuration error: the uploader cannot run without it.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            MigrateError::config(path.display().to_string(), "LoadImageMapping", Some(e.into()))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            MigrateError::config(path.display().to_string(), "LoadImageMapping", Some(e.into()))
        })
    }

    /// Write the mapping as pretty JSON.
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                MigrateError::output(parent.display().to_string(), "SaveImageMapping", Some(e.into()))
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            MigrateError::output(path.display().to_string(), "SaveImageMapping", Some(e.into()))
        })?;
        tokio::fs::write(path, json).await.map_err(|e| {
            MigrateError::output(path.display().to_string(), "SaveImageMapping", Some(e.into()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn round_trips_through_disk() {
        let mut mapping = ImageMapping::default();
        mapping.properties.insert(
            "the-rose".to_string(),
            PropertyImages {
                hero_image: "rose-hero.jpg".to_string(),
                gallery: vec!["rose-1.jpg".to_string()],
            },
        );
        mapping
            .tours
            .insert("aquila-safari".to_string(), "aquila.jpg".to_string());
        mapping.site.logo = "logo.svg".to_string();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image-mapping.json");
        mapping.save(&path).await.unwrap();
        let loaded = ImageMapping::load(&path).await.unwrap();
        assert_eq!(loaded, mapping);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["properties"]["the-rose"]["heroImage"], "rose-hero.jpg");
    }

    #[tokio::test]
    async fn missing_file_is_config_error() {
        let err = ImageMapping::load(Path::new("/nonexistent/image-mapping.json"))
            .await
            .unwrap_err();
        assert!(err.is_config());
    }
}
