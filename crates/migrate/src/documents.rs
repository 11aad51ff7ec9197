// ABOUTME: Canonical Sanity document shapes: property, tour, review, site settings.
// ABOUTME: A closed tagged union serializing to the {_id, _type, ...} wire form.

use serde::{Deserialize, Serialize};

/// Sanity slug object, `{ "_type": "slug", "current": "..." }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slug {
    #[serde(rename = "_type")]
    pub type_tag: SlugTag,
    pub current: String,
}

/// Marker for the constant `"slug"` type tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SlugTag {
    #[serde(rename = "slug")]
    Slug,
}

impl Slug {
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            type_tag: SlugTag::Slug,
            current: current.into(),
        }
    }
}

/// Reference to another document, `{ "_type": "reference", "_ref": "..." }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "_type")]
    pub type_tag: ReferenceTag,
    #[serde(rename = "_ref")]
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReferenceTag {
    #[serde(rename = "reference")]
    Reference,
}

impl Reference {
    pub fn to(id: impl Into<String>) -> Self {
        Self {
            type_tag: ReferenceTag::Reference,
            id: id.into(),
        }
    }
}

/// Keyed amenity entry inside a property document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    #[serde(rename = "_key")]
    pub key: String,
    pub name: String,
    pub category: String,
}

/// Keyed highlight entry inside a property document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    #[serde(rename = "_key")]
    pub key: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// SEO metadata carried through from the legacy CMS when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seo {
    #[serde(rename = "metaTitle", skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(rename = "metaDescription", skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
}

/// An apartment property.
///
/// `hero_image_file` and `gallery_files` are transient local-asset names; the
/// import-file writer strips them before anything reaches the content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub slug: Slug,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub featured: bool,
    #[serde(rename = "starRating")]
    pub star_rating: u8,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub amenities: Vec<Amenity>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub highlights: Vec<Highlight>,
    #[serde(rename = "nightsBridgeUrl", skip_serializing_if = "Option::is_none")]
    pub nights_bridge_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo: Option<Seo>,
    #[serde(rename = "_heroImageFile", skip_serializing_if = "Option::is_none")]
    pub hero_image_file: Option<String>,
    #[serde(rename = "_galleryFiles", skip_serializing_if = "Option::is_none")]
    pub gallery_files: Option<Vec<String>>,
}

/// A bookable tour or experience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub slug: Slug,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(rename = "shortDescription", skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    pub featured: bool,
    #[serde(rename = "_imageFile", skip_serializing_if = "Option::is_none")]
    pub image_file: Option<String>,
}

/// A guest review, optionally referencing the property it concerns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub author: String,
    pub content: String,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<Reference>,
}

/// Contact details on the site-settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    pub phone: String,
    pub whatsapp: String,
    #[serde(rename = "operationsHours")]
    pub operations_hours: String,
    #[serde(rename = "afterHoursPhone", skip_serializing_if = "Option::is_none")]
    pub after_hours_phone: Option<String>,
}

/// Social links on the site-settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Social {
    pub instagram: String,
    pub facebook: String,
}

/// Postal locality on the site-settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    pub city: String,
    pub country: String,
}

/// Singleton site-settings document (`_id` is always `siteSettings`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteSettingsDoc {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "siteName")]
    pub site_name: String,
    pub contact: Contact,
    pub social: Social,
    pub address: Address,
    #[serde(rename = "bookNowUrl", skip_serializing_if = "Option::is_none")]
    pub book_now_url: Option<String>,
}

impl SiteSettingsDoc {
    /// The singleton, pre-filled with the brand's published contact details.
    /// Footer metadata from the legacy CMS overrides these when present.
    pub fn singleton() -> Self {
        Self {
            id: "siteSettings".to_string(),
            site_name: "Urban Elephant".to_string(),
            contact: Contact {
                email: "reservations@urbanelephant.co.za".to_string(),
                phone: "+27 21 300 1044".to_string(),
                whatsapp: "+27 72 618 8140".to_string(),
                operations_hours: "Mon-Fri 9am-5pm".to_string(),
                after_hours_phone: None,
            },
            social: Social {
                instagram: "https://www.instagram.com/urbanelephantsa/".to_string(),
                facebook: "https://www.facebook.com/urbanelephantsa/".to_string(),
            },
            address: Address {
                street: None,
                city: "Cape Town".to_string(),
                country: "South Africa".to_string(),
            },
            book_now_url: None,
        }
    }
}

/// Every document kind the pipeline can emit.
///
/// The `_type` tag is the discriminant on the wire; downstream code pattern
/// matches on the variant rather than probing untyped maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum CanonicalDocument {
    #[serde(rename = "property")]
    Property(PropertyDoc),
    #[serde(rename = "tour")]
    Tour(TourDoc),
    #[serde(rename = "review")]
    Review(ReviewDoc),
    #[serde(rename = "siteSettings")]
    SiteSettings(SiteSettingsDoc),
}

impl CanonicalDocument {
    /// The document id, regardless of kind.
    pub fn id(&self) -> &str {
        match self {
            CanonicalDocument::Property(d) => &d.id,
            CanonicalDocument::Tour(d) => &d.id,
            CanonicalDocument::Review(d) => &d.id,
            CanonicalDocument::SiteSettings(d) => &d.id,
        }
    }

    /// The `_type` tag this document serializes under.
    pub fn kind(&self) -> &'static str {
        match self {
            CanonicalDocument::Property(_) => "property",
            CanonicalDocument::Tour(_) => "tour",
            CanonicalDocument::Review(_) => "review",
            CanonicalDocument::SiteSettings(_) => "siteSettings",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn slug_wire_shape() {
        let json = serde_json::to_value(Slug::new("the-rose")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "_type": "slug", "current": "the-rose" })
        );
    }

    #[test]
    fn reference_wire_shape() {
        let json = serde_json::to_value(Reference::to("property-the-rose")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "_type": "reference", "_ref": "property-the-rose" })
        );
    }

    #[test]
    fn tour_serializes_with_type_tag_and_omits_absent_price() {
        let doc = CanonicalDocument::Tour(TourDoc {
            id: "tour-cape-point-penguins".to_string(),
            name: "Cape Point & Penguins".to_string(),
            slug: Slug::new("cape-point-penguins"),
            category: Some("nature".to_string()),
            price: None,
            duration: None,
            short_description: None,
            featured: true,
            image_file: None,
        });
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["_type"], "tour");
        assert_eq!(json["_id"], "tour-cape-point-penguins");
        assert!(json.get("price").is_none());
        assert!(json.get("_imageFile").is_none());
    }

    #[test]
    fn property_round_trips_through_the_tag() {
        let doc = CanonicalDocument::Property(PropertyDoc {
            id: "property-the-rose".to_string(),
            name: "The Rose".to_string(),
            slug: Slug::new("the-rose"),
            tagline: None,
            description: None,
            location: Some("Cape Town".to_string()),
            featured: true,
            star_rating: 5,
            amenities: vec![Amenity {
                key: "amenity-0".to_string(),
                name: "WiFi".to_string(),
                category: "general".to_string(),
            }],
            highlights: Vec::new(),
            nights_bridge_url: None,
            seo: None,
            hero_image_file: Some("the-rose-hero.jpg".to_string()),
            gallery_files: None,
        });
        let json = serde_json::to_string(&doc).unwrap();
        let back: CanonicalDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
        assert_eq!(back.kind(), "property");
    }

    #[test]
    fn site_settings_singleton_id() {
        let doc = CanonicalDocument::SiteSettings(SiteSettingsDoc::singleton());
        assert_eq!(doc.id(), "siteSettings");
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["_type"], "siteSettings");
        assert_eq!(json["siteName"], "Urban Elephant");
        assert_eq!(json["contact"]["operationsHours"], "Mon-Fri 9am-5pm");
        assert_eq!(json["address"]["city"], "Cape Town");
    }
}
