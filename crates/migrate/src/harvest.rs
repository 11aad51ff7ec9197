// ABOUTME: Targeted harvest of property pages, tour cards, and testimonials.
// ABOUTME: Produces ScrapedContent, a raw audit file, and the bulk-import payload.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Paths;
use crate::documents::{CanonicalDocument, SiteSettingsDoc};
use crate::error::{MigrateError, Result};
use crate::extract;
use crate::import_file;
use crate::normalize;
use crate::page::{PageFetcher, DEFAULT_TIMEOUT};

/// Property detail pages harvested on every run.
pub const KNOWN_PROPERTY_SLUGS: &[&str] =
    &["the-rose", "16-on-bree", "the-docklands", "the-flamingo"];

const MAX_TOUR_CARDS: usize = 20;
const MAX_REVIEWS: usize = 10;

static PRICE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"R\s?[\d,]+\d").unwrap());

/// Raw property record from one detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedProperty {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub images: Vec<String>,
    pub amenities: Vec<String>,
    #[serde(rename = "bookingUrl", skip_serializing_if = "Option::is_none")]
    pub booking_url: Option<String>,
}

/// Raw tour record from one experiences-page card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedTour {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Raw review record from a homepage testimonial block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedReview {
    pub author: String,
    pub content: String,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Contact and social links lifted from the homepage footer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapedSite {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
}

/// Everything one harvest run collected, written verbatim as the audit file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapedContent {
    pub properties: Vec<ScrapedProperty>,
    pub tours: Vec<ScrapedTour>,
    pub reviews: Vec<ScrapedReview>,
    pub site: ScrapedSite,
}

/// Counts reported at the end of a harvest run.
#[derive(Debug, Default)]
pub struct HarvestSummary {
    pub properties: usize,
    pub tours: usize,
    pub reviews: usize,
}

fn select_in<'a>(el: &ElementRef<'a>, selector: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector) {
        Ok(sel) => el.select(&sel).collect(),
        Err(_) => Vec::new(),
    }
}

fn text_of(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Display name fallback when a page has no hero heading.
fn title_case_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract one property record from its detail page.
pub fn property_from_page(slug: &str, doc: &Html) -> ScrapedProperty {
    let heroes = extract::hero_texts(doc);
    let name = heroes
        .first()
        .cloned()
        .unwrap_or_else(|| title_case_slug(slug));
    let tagline = heroes.iter().skip(1).find(|t| **t != name).cloned();

    let mut images = extract::upload_image_sources(doc);
    if images.is_empty() {
        images = extract::image_sources(doc);
    }

    ScrapedProperty {
        name,
        slug: slug.to_string(),
        tagline,
        description: extract::description(doc),
        images,
        amenities: extract::amenity_texts(doc),
        booking_url: extract::booking_href(doc),
    }
}

/// Extract tour cards from the experiences page: name required and unique,
/// price left raw for the normalizer, capped at MAX_TOUR_CARDS.
pub fn tours_from_page(doc: &Html) -> Vec<ScrapedTour> {
    let mut out: Vec<ScrapedTour> = Vec::new();
    for card in extract::try_selector(doc, "[class*='tour'], [class*='experience'], [class*='card']")
    {
        let Some(name_el) = select_in(&card, "h2, h3, h4").into_iter().next() else {
            continue;
        };
        let name = text_of(&name_el);
        if name.is_empty() {
            continue;
        }
        let slug = normalize::slugify(&name);
        if out.iter().any(|t| t.slug == slug) {
            continue;
        }
        let card_text = card.text().collect::<String>();
        out.push(ScrapedTour {
            name,
            slug,
            description: select_in(&card, "p")
                .first()
                .map(text_of)
                .filter(|t| !t.is_empty()),
            price: PRICE_RE.find(&card_text).map(|m| m.as_str().to_string()),
            image: select_in(&card, "img")
                .first()
                .and_then(|el| el.value().attr("src"))
                .map(str::to_string),
        });
        if out.len() == MAX_TOUR_CARDS {
            break;
        }
    }
    out
}

/// Extract testimonial blocks from the homepage, capped at MAX_REVIEWS.
pub fn reviews_from_page(doc: &Html) -> Vec<ScrapedReview> {
    let mut out = Vec::new();
    for block in extract::try_selector(doc, "[class*='review'], [class*='testimonial']") {
        let content = select_in(&block, "p")
            .first()
            .map(text_of)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| text_of(&block));
        if content.is_empty() {
            continue;
        }
        let author = select_in(&block, "cite, strong, h4, [class*='name']")
            .first()
            .map(text_of)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Guest".to_string());
        out.push(ScrapedReview {
            author,
            content,
            rating: 5,
            source: Some("Website".to_string()),
        });
        if out.len() == MAX_REVIEWS {
            break;
        }
    }
    out
}

/// Contact and social hrefs from the page's anchors.
pub fn site_links_from_page(doc: &Html) -> ScrapedSite {
    let links = extract::link_pairs(doc);
    let find = |pred: fn(&str) -> bool| {
        links
            .iter()
            .map(|(_, href)| href.as_str())
            .find(|href| pred(href))
            .map(str::to_string)
    };
    ScrapedSite {
        phone: find(|h| h.starts_with("tel:")),
        email: find(|h| h.starts_with("mailto:")),
        instagram: find(|h| h.contains("instagram.com")),
        facebook: find(|h| h.contains("facebook.com")),
    }
}

/// Site settings built from the brand defaults, with scraped footer links
/// overriding where present. `mailto:` and `tel:` prefixes are dropped.
pub fn site_settings_from_links(site: &ScrapedSite) -> SiteSettingsDoc {
    let mut settings = SiteSettingsDoc::singleton();
    if let Some(email) = &site.email {
        settings.contact.email = email.trim_start_matches("mailto:").to_string();
    }
    if let Some(phone) = &site.phone {
        settings.contact.phone = phone.trim_start_matches("tel:").to_string();
    }
    if let Some(instagram) = &site.instagram {
        settings.social.instagram = instagram.clone();
    }
    if let Some(facebook) = &site.facebook {
        settings.social.facebook = facebook.clone();
    }
    settings
}

/// Harvest the known detail pages, normalize, and write the audit file plus
/// the bulk-import payload. Per-page failures are logged and skipped.
pub async fn run_harvest(base_url: &str, paths: &Paths) -> Result<HarvestSummary> {
    let fetcher = PageFetcher::new(DEFAULT_TIMEOUT)?;
    let base = base_url.trim_end_matches('/');
    let mut content = ScrapedContent::default();

    for slug in KNOWN_PROPERTY_SLUGS {
        let url = format!("{}/properties/{}", base, slug);
        match fetcher.load(&url).await {
            Ok(page) => {
                let prop = property_from_page(slug, &page.document());
                info!(slug, amenities = prop.amenities.len(), "property harvested");
                content.properties.push(prop);
            }
            Err(e) => warn!(url = %url, error = %e, "property page skipped"),
        }
    }

    let tours_url = format!("{}/tours", base);
    match fetcher.load(&tours_url).await {
        Ok(page) => {
            content.tours = tours_from_page(&page.document());
            info!(count = content.tours.len(), "tours harvested");
        }
        Err(e) => warn!(url = %tours_url, error = %e, "tours page skipped"),
    }

    match fetcher.load(base).await {
        Ok(page) => {
            let doc = page.document();
            content.reviews = reviews_from_page(&doc);
            content.site = site_links_from_page(&doc);
            info!(count = content.reviews.len(), "reviews harvested");
        }
        Err(e) => warn!(url = base, error = %e, "homepage skipped"),
    }

    tokio::fs::create_dir_all(&paths.import_dir).await.map_err(|e| {
        MigrateError::output(paths.import_dir.display().to_string(), "Harvest", Some(e.into()))
    })?;
    let audit_path = paths.import_dir.join("scraped-content.json");
    let audit = serde_json::to_string_pretty(&content).map_err(|e| {
        MigrateError::output(audit_path.display().to_string(), "WriteAudit", Some(e.into()))
    })?;
    tokio::fs::write(&audit_path, audit).await.map_err(|e| {
        MigrateError::output(audit_path.display().to_string(), "WriteAudit", Some(e.into()))
    })?;

    let mut docs = Vec::new();
    for prop in &content.properties {
        docs.push(normalize::property_document(prop));
    }
    for tour in &content.tours {
        docs.push(normalize::tour_document(tour));
    }
    let captured_at = chrono::Utc::now().timestamp_millis();
    for review in &content.reviews {
        docs.push(normalize::review_document(review, Some(captured_at)));
    }
    docs.push(CanonicalDocument::SiteSettings(site_settings_from_links(
        &content.site,
    )));
    import_file::write_ndjson(&docs, &paths.ndjson_path()).await?;

    Ok(HarvestSummary {
        properties: content.properties.len(),
        tours: content.tours.len(),
        reviews: content.reviews.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn property_scenario_hero_paragraphs_uploads() {
        let long = "This apartment paragraph is comfortably longer than fifty characters in total.";
        let html = format!(
            "<h1>The Rose</h1><p>{p}</p><p>{p}</p><p>{p}</p><img src='/uploads/a.jpg'>",
            p = long
        );
        let prop = property_from_page("the-rose", &Html::parse_document(&html));
        assert_eq!(prop.name, "The Rose");
        assert_eq!(prop.tagline, None);
        assert_eq!(prop.images, vec!["/uploads/a.jpg"]);
        let desc = prop.description.unwrap();
        assert_eq!(desc.matches("\n\n").count(), 2);
    }

    #[test]
    fn property_name_falls_back_to_slug() {
        let prop = property_from_page("16-on-bree", &Html::parse_document("<div></div>"));
        assert_eq!(prop.name, "16 On Bree");
        assert_eq!(prop.tagline, None);
    }

    #[test]
    fn tagline_must_differ_from_name() {
        let html = "<h1>The Rose</h1><div class='hero'><p>The Rose</p><p>City living</p></div>";
        let prop = property_from_page("the-rose", &Html::parse_document(html));
        assert_eq!(prop.tagline, Some("City living".to_string()));
    }

    #[test]
    fn tour_cards_dedup_by_slug_and_keep_raw_price() {
        let html = "\
            <div class='tour-card'><h3>Cape Point &amp; Penguins</h3>\
              <p>Full day trip.</p><span>R 1,200</span><img src='/uploads/cp.jpg'></div>\
            <div class='tour-card'><h3>Cape Point &amp; Penguins</h3></div>\
            <div class='experience'><h3>Wine Tasting</h3></div>\
            <div class='card'><p>No heading here</p></div>";
        let tours = tours_from_page(&Html::parse_document(html));
        assert_eq!(tours.len(), 2);
        assert_eq!(tours[0].slug, "cape-point-penguins");
        assert_eq!(tours[0].price, Some("R 1,200".to_string()));
        assert_eq!(tours[0].image, Some("/uploads/cp.jpg".to_string()));
        assert_eq!(tours[1].price, None);
    }

    #[test]
    fn reviews_default_author_and_rating() {
        let html = "\
            <div class='testimonial'><p>Wonderful stay, spotless rooms.</p><cite>Sarah M.</cite></div>\
            <div class='review'><p>Great location.</p></div>\
            <div class='review'></div>";
        let reviews = reviews_from_page(&Html::parse_document(html));
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].author, "Sarah M.");
        assert_eq!(reviews[1].author, "Guest");
        assert_eq!(reviews[1].rating, 5);
    }

    #[test]
    fn site_links_pick_first_matching_href() {
        let html = "\
            <footer><a href='tel:+27213001044'>Call</a>\
            <a href='mailto:reservations@urbanelephant.co.za'>Mail</a>\
            <a href='https://www.instagram.com/urbanelephantsa/'>IG</a></footer>";
        let site = site_links_from_page(&Html::parse_document(html));
        assert_eq!(site.phone, Some("tel:+27213001044".to_string()));
        assert_eq!(
            site.email,
            Some("mailto:reservations@urbanelephant.co.za".to_string())
        );
        assert!(site.instagram.is_some());
        assert_eq!(site.facebook, None);
    }

    #[test]
    fn scraped_links_override_brand_defaults() {
        let site = ScrapedSite {
            phone: Some("tel:+27210000000".to_string()),
            email: Some("mailto:stay@urbanelephant.co.za".to_string()),
            instagram: None,
            facebook: None,
        };
        let settings = site_settings_from_links(&site);
        assert_eq!(settings.contact.phone, "+27210000000");
        assert_eq!(settings.contact.email, "stay@urbanelephant.co.za");
        // Untouched fields keep the published defaults.
        assert_eq!(
            settings.social.instagram,
            "https://www.instagram.com/urbanelephantsa/"
        );
        assert_eq!(settings.id, "siteSettings");
    }

    #[tokio::test]
    async fn run_harvest_writes_audit_and_ndjson() {
        use httpmock::prelude::*;
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/properties/the-rose");
                then.status(200).body("<html><h1>The Rose</h1></html>");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/tours");
                then.status(200).body(
                    "<div class='tour-card'><h3>Wine Tasting</h3><span>R 950</span></div>",
                );
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/");
                then.status(200).body(
                    "<div class='review'><p>Lovely place to stay.</p></div>\
                     <footer><a href='mailto:stay@urbanelephant.co.za'>Mail</a>\
                     <a href='tel:+27210000000'>Call</a></footer>",
                );
            })
            .await;
        // Other property pages 404 and are skipped.

        let dir = tempfile::tempdir().unwrap();
        let paths = Paths {
            scrape_dir: dir.path().join("scraped-content"),
            media_dir: dir.path().join("scraped-media"),
            import_dir: dir.path().join("sanity-import"),
        };
        let summary = run_harvest(&server.base_url(), &paths).await.unwrap();
        assert_eq!(summary.properties, 1);
        assert_eq!(summary.tours, 1);
        assert_eq!(summary.reviews, 1);

        let ndjson = std::fs::read_to_string(paths.ndjson_path()).unwrap();
        let lines: Vec<&str> = ndjson.lines().collect();
        assert_eq!(lines.len(), 4);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["_id"], "property-the-rose");
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["_id"], "tour-wine-tasting");
        assert_eq!(second["price"], 950);

        // The footer links end up on a siteSettings document.
        let last: serde_json::Value = serde_json::from_str(lines[3]).unwrap();
        assert_eq!(last["_type"], "siteSettings");
        assert_eq!(last["contact"]["email"], "stay@urbanelephant.co.za");
        assert_eq!(last["contact"]["phone"], "+27210000000");

        assert!(paths.import_dir.join("scraped-content.json").exists());
    }
}
