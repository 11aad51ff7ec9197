// ABOUTME: Bulk-import writer: one JSON document per line, input order preserved.
// ABOUTME: Strips transient local-asset fields before anything reaches the import file.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::documents::CanonicalDocument;
use crate::error::{MigrateError, Result};

/// True for transient local-asset keys (`_heroImageFile`, `_galleryFiles`,
/// `_imageFile`): leading underscore, `File`/`Files` suffix.
fn is_transient_key(key: &str) -> bool {
    key.starts_with('_') && (key.ends_with("File") || key.ends_with("Files"))
}

/// Remove every transient asset key from a serialized document.
pub fn strip_transient(value: &mut Value) {
    if let Value::Object(map) = value {
        map.retain(|key, _| !is_transient_key(key));
    }
}

/// Write the newline-delimited bulk-import file.
///
/// Documents are serialized in input order so re-runs produce diffable
/// output. Any write failure is fatal.
pub async fn write_ndjson(docs: &[CanonicalDocument], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            MigrateError::output(parent.display().to_string(), "WriteImportFile", Some(e.into()))
        })?;
    }
    let mut out = String::new();
    for doc in docs {
        let mut value = serde_json::to_value(doc).map_err(|e| {
            MigrateError::output(doc.id().to_string(), "WriteImportFile", Some(e.into()))
        })?;
        strip_transient(&mut value);
        let line = serde_json::to_string(&value).map_err(|e| {
            MigrateError::output(doc.id().to_string(), "WriteImportFile", Some(e.into()))
        })?;
        out.push_str(&line);
        out.push('\n');
    }
    tokio::fs::write(path, out).await.map_err(|e| {
        MigrateError::output(path.display().to_string(), "WriteImportFile", Some(e.into()))
    })?;
    info!(path = %path.display(), documents = docs.len(), "import file written");
    Ok(())
}

/// Write the pre-strip pretty-JSON audit copy alongside the import file.
pub async fn write_pretty_audit(docs: &[CanonicalDocument], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            MigrateError::output(parent.display().to_string(), "WriteAudit", Some(e.into()))
        })?;
    }
    let json = serde_json::to_string_pretty(docs)
        .map_err(|e| MigrateError::output(path.display().to_string(), "WriteAudit", Some(e.into())))?;
    tokio::fs::write(path, json).await.map_err(|e| {
        MigrateError::output(path.display().to_string(), "WriteAudit", Some(e.into()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{PropertyDoc, Slug, TourDoc};
    use pretty_assertions::assert_eq;

    fn property_with_assets() -> CanonicalDocument {
        CanonicalDocument::Property(PropertyDoc {
            id: "property-the-rose".to_string(),
            name: "The Rose".to_string(),
            slug: Slug::new("the-rose"),
            tagline: None,
            description: None,
            location: None,
            featured: true,
            star_rating: 5,
            amenities: Vec::new(),
            highlights: Vec::new(),
            nights_bridge_url: None,
            seo: None,
            hero_image_file: Some("the-rose-hero.jpg".to_string()),
            gallery_files: Some(vec!["g1.jpg".to_string(), "g2.jpg".to_string()]),
        })
    }

    fn tour_with_asset() -> CanonicalDocument {
        CanonicalDocument::Tour(TourDoc {
            id: "tour-wine-tasting".to_string(),
            name: "Wine Tasting".to_string(),
            slug: Slug::new("wine-tasting"),
            category: None,
            price: Some(950),
            duration: None,
            short_description: None,
            featured: true,
            image_file: Some("wine.jpg".to_string()),
        })
    }

    #[test]
    fn transient_key_shapes() {
        assert!(is_transient_key("_heroImageFile"));
        assert!(is_transient_key("_galleryFiles"));
        assert!(is_transient_key("_imageFile"));
        assert!(!is_transient_key("heroImage"));
        assert!(!is_transient_key("_id"));
        assert!(!is_transient_key("_type"));
    }

    #[tokio::test]
    async fn ndjson_strips_transients_and_preserves_order() {
        let docs = vec![property_with_assets(), tour_with_asset()];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sanity-import.ndjson");
        write_ndjson(&docs, &path).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["_id"], "property-the-rose");
        assert!(first.get("_heroImageFile").is_none());
        assert!(first.get("_galleryFiles").is_none());

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["_id"], "tour-wine-tasting");
        assert!(second.get("_imageFile").is_none());
        assert_eq!(second["price"], 950);
    }

    #[tokio::test]
    async fn audit_copy_keeps_transients() {
        let docs = vec![property_with_assets()];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strapi-content.json");
        write_pretty_audit(&docs, &path).await.unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json[0]["_heroImageFile"], "the-rose-hero.jpg");
    }
}
