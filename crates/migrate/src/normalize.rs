// ABOUTME: Pure normalization rules: slugs, document ids, price parsing, and keyed arrays.
// ABOUTME: Turns raw scraped records into canonical Sanity documents.

use crate::documents::{
    Amenity, CanonicalDocument, PropertyDoc, ReviewDoc, Slug, TourDoc,
};
use crate::harvest::{ScrapedProperty, ScrapedReview, ScrapedTour};

/// Derive a URL-safe lowercase slug from a display name.
///
/// Lowercases, collapses every run of non-alphanumeric characters into a
/// single hyphen, and trims leading/trailing hyphens. Idempotent.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch);
        } else {
            pending_hyphen = true;
        }
    }
    out
}

/// Deterministic document id for a `(kind, slug)` pair.
///
/// Joins with a hyphen, lowercases, and replaces anything outside
/// `[a-zA-Z0-9-]` with a hyphen. Governs import idempotence: a re-run
/// produces the same ids and the destination store replaces by id.
pub fn document_id(kind: &str, slug: &str) -> String {
    format!("{}-{}", kind, slug)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect::<String>()
        .to_lowercase()
}

/// Parse a human price string ("R 2,500") into an integer amount.
///
/// Strips every non-digit character and parses what remains. An empty or
/// unparseable result yields `None` rather than a fabricated zero price.
pub fn parse_price(raw: &str) -> Option<u32> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Id for a review, which has no natural external identifier.
///
/// Defaults to the author slug; when a disambiguator is needed (scraped
/// reviews can recur across runs with no stable key) the capture timestamp
/// is appended.
pub fn review_id(author: &str, captured_at: Option<i64>) -> String {
    let slug = slugify(author);
    match captured_at {
        Some(ts) => document_id("review", &format!("{}-{}", slug, ts)),
        None => document_id("review", &slug),
    }
}

/// Assign stable per-item keys to a list of amenity names.
///
/// Keys are `amenity-<index>`; index-based keys are acceptable because these
/// arrays are not reordered after import.
pub fn keyed_amenities(names: &[String]) -> Vec<Amenity> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Amenity {
            key: format!("amenity-{}", i),
            name: name.clone(),
            category: "general".to_string(),
        })
        .collect()
}

/// Build a canonical property document from a scraped property record.
pub fn property_document(prop: &ScrapedProperty) -> CanonicalDocument {
    CanonicalDocument::Property(PropertyDoc {
        id: document_id("property", &prop.slug),
        name: prop.name.clone(),
        slug: Slug::new(&prop.slug),
        tagline: prop.tagline.clone(),
        description: prop.description.clone(),
        location: Some("Cape Town".to_string()),
        featured: true,
        star_rating: 5,
        amenities: keyed_amenities(&prop.amenities),
        highlights: Vec::new(),
        nights_bridge_url: prop.booking_url.clone(),
        seo: None,
        hero_image_file: None,
        gallery_files: None,
    })
}

/// Build a canonical tour document from a scraped tour record.
pub fn tour_document(tour: &ScrapedTour) -> CanonicalDocument {
    CanonicalDocument::Tour(TourDoc {
        id: document_id("tour", &tour.slug),
        name: tour.name.clone(),
        slug: Slug::new(&tour.slug),
        category: None,
        price: tour.price.as_deref().and_then(parse_price),
        duration: None,
        short_description: tour.description.clone(),
        featured: true,
        image_file: None,
    })
}

/// Build a canonical review document from a scraped review record.
///
/// `captured_at` disambiguates ids across repeated scrape runs.
pub fn review_document(review: &ScrapedReview, captured_at: Option<i64>) -> CanonicalDocument {
    CanonicalDocument::Review(ReviewDoc {
        id: review_id(&review.author, captured_at),
        author: review.author.clone(),
        content: review.content.clone(),
        rating: review.rating,
        source: review.source.clone(),
        featured: true,
        property: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("The Rose"), "the-rose");
        assert_eq!(slugify("16 On Bree"), "16-on-bree");
        assert_eq!(slugify("Cape Point & Penguins"), "cape-point-penguins");
    }

    #[test]
    fn slugify_trims_and_collapses() {
        assert_eq!(slugify("  --Hello,   World!--  "), "hello-world");
        assert_eq!(slugify("a---b"), "a-b");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slugify_is_idempotent() {
        for input in ["Cape Point & Penguins", "The Rose", "a  b--c", "Füße 12"] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once);
        }
    }

    #[test]
    fn document_id_is_deterministic() {
        assert_eq!(
            document_id("tour", "cape-point-penguins"),
            "tour-cape-point-penguins"
        );
        assert_eq!(document_id("tour", "cape-point-penguins"), document_id("tour", "cape-point-penguins"));
        assert_ne!(document_id("tour", "a"), document_id("property", "a"));
    }

    #[test]
    fn document_id_sanitizes() {
        assert_eq!(document_id("review", "sarah m."), "review-sarah-m-");
        assert_eq!(document_id("Property", "The-Rose"), "property-the-rose");
    }

    #[test]
    fn parse_price_strips_currency() {
        assert_eq!(parse_price("R 2,500"), Some(2500));
        assert_eq!(parse_price("R2500.00"), Some(250000));
        assert_eq!(parse_price("1200"), Some(1200));
    }

    #[test]
    fn parse_price_absent_not_zero() {
        assert_eq!(parse_price("Free"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("POA"), None);
    }

    #[test]
    fn review_id_disambiguation() {
        assert_eq!(review_id("Sarah M.", None), "review-sarah-m");
        assert_eq!(
            review_id("Sarah M.", Some(1700000000000)),
            "review-sarah-m-1700000000000"
        );
    }

    #[test]
    fn keyed_amenities_index_keys() {
        let keys: Vec<String> = keyed_amenities(&["WiFi".into(), "Pool".into()])
            .into_iter()
            .map(|a| a.key)
            .collect();
        assert_eq!(keys, vec!["amenity-0", "amenity-1"]);
    }

    #[test]
    fn tour_document_scenario() {
        let tour = ScrapedTour {
            name: "Cape Point & Penguins".to_string(),
            slug: slugify("Cape Point & Penguins"),
            description: None,
            price: Some("R 1,200".to_string()),
            image: None,
        };
        let doc = tour_document(&tour);
        assert_eq!(doc.id(), "tour-cape-point-penguins");
        match doc {
            CanonicalDocument::Tour(t) => assert_eq!(t.price, Some(1200)),
            _ => panic!("expected tour"),
        }
    }
}
