// ABOUTME: Pure DOM field extractors built on a single selector boundary.
// ABOUTME: Absent elements and invalid selectors yield None/empty, never a panic.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static BG_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"url\(["']?([^"')]+)["']?\)"#).unwrap());
static COLOR_DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[;{\s])(?:background-color|border-color|color)\s*:\s*([^;}]+)").unwrap()
});
static FONT_DECL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|[;{\s])font-family\s*:\s*([^;}]+)").unwrap());

/// Select all elements matching `selector`, or an empty list when the
/// selector fails to parse or matches nothing.
///
/// Every extractor goes through this boundary so a malformed selector or an
/// unexpected page shape degrades to "no data" rather than an error.
pub fn try_selector<'a>(doc: &'a Html, selector: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector) {
        Ok(sel) => doc.select(&sel).collect(),
        Err(_) => Vec::new(),
    }
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// The document `<title>`, trimmed. `None` when absent or empty.
pub fn page_title(doc: &Html) -> Option<String> {
    try_selector(doc, "title")
        .first()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

/// The `meta[name=description]` content, trimmed. `None` when absent or empty.
pub fn meta_description(doc: &Html) -> Option<String> {
    try_selector(doc, "meta[name='description']")
        .first()
        .and_then(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Full page text with runs of whitespace collapsed to single spaces.
pub fn body_text(doc: &Html) -> String {
    let raw: String = match try_selector(doc, "body").first() {
        Some(body) => body.text().collect(),
        None => doc.root_element().text().collect(),
    };
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Texts of the hero region, in document order: the `<h1>`, hero headings,
/// and hero paragraphs. The first entry is the page's display name; a later
/// distinct entry serves as the tagline.
pub fn hero_texts(doc: &Html) -> Vec<String> {
    try_selector(doc, "h1, .hero h2, [class*='hero'] p")
        .iter()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Long-form description: paragraphs longer than 50 characters, capped at
/// three, joined with blank lines. `None` when no paragraph qualifies.
pub fn description(doc: &Html) -> Option<String> {
    let paras: Vec<String> = try_selector(doc, "p")
        .iter()
        .map(element_text)
        .filter(|t| t.len() > 50)
        .take(3)
        .collect();
    if paras.is_empty() {
        None
    } else {
        Some(paras.join("\n\n"))
    }
}

/// `src` values of images served from the CMS uploads directory.
pub fn upload_image_sources(doc: &Html) -> Vec<String> {
    try_selector(doc, "img[src*='uploads']")
        .iter()
        .filter_map(|el| el.value().attr("src"))
        .map(str::to_string)
        .collect()
}

/// `src` values of every image on the page.
pub fn image_sources(doc: &Html) -> Vec<String> {
    try_selector(doc, "img")
        .iter()
        .filter_map(|el| el.value().attr("src"))
        .map(str::to_string)
        .collect()
}

/// `(src, alt)` pairs for every image on the page.
pub fn image_tags(doc: &Html) -> Vec<(String, String)> {
    try_selector(doc, "img")
        .iter()
        .filter_map(|el| {
            el.value()
                .attr("src")
                .map(|src| (src.to_string(), el.value().attr("alt").unwrap_or("").to_string()))
        })
        .collect()
}

/// Short amenity-like texts: under 50 characters, order-preserving dedup,
/// capped at 15.
pub fn amenity_texts(doc: &Html) -> Vec<String> {
    let mut seen = Vec::new();
    for el in try_selector(doc, "[class*='amenity'], [class*='feature'] li, ul li") {
        let text = element_text(&el);
        if text.len() >= 3 && text.len() < 50 && !seen.contains(&text) {
            seen.push(text);
            if seen.len() == 15 {
                break;
            }
        }
    }
    seen
}

/// First booking-engine link on the page.
pub fn booking_href(doc: &Html) -> Option<String> {
    try_selector(doc, "a[href*='nightsbridge'], a[href*='book']")
        .iter()
        .filter_map(|el| el.value().attr("href"))
        .map(str::to_string)
        .next()
}

/// Headings with their level, `h1` through `h6`, in document order.
pub fn headings(doc: &Html) -> Vec<(u8, String)> {
    let mut out = Vec::new();
    for level in 1..=6u8 {
        let sel = format!("h{}", level);
        for el in try_selector(doc, &sel) {
            let text = element_text(&el);
            if !text.is_empty() {
                out.push((level, text));
            }
        }
    }
    out
}

/// Texts of buttons and button-styled links.
pub fn cta_texts(doc: &Html) -> Vec<String> {
    try_selector(doc, "button, .btn, [class*='button'], [class*='btn']")
        .iter()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}

/// `(text, href)` pairs for every anchor carrying an href.
pub fn link_pairs(doc: &Html) -> Vec<(String, String)> {
    try_selector(doc, "a[href]")
        .iter()
        .filter_map(|el| {
            el.value()
                .attr("href")
                .map(|href| (element_text(el), href.to_string()))
        })
        .collect()
}

/// All declared style text on the page: inline `style=` attributes plus the
/// contents of `<style>` blocks.
fn style_texts(doc: &Html) -> Vec<String> {
    let mut texts: Vec<String> = try_selector(doc, "[style]")
        .iter()
        .filter_map(|el| el.value().attr("style"))
        .map(str::to_string)
        .collect();
    for el in try_selector(doc, "style") {
        texts.push(el.text().collect::<String>());
    }
    texts
}

/// Background-image URLs declared in style text, `url(...)` parsed out.
pub fn background_image_urls(doc: &Html) -> Vec<String> {
    let mut out = Vec::new();
    for text in style_texts(doc) {
        for cap in BG_IMAGE_RE.captures_iter(&text) {
            let url = cap[1].to_string();
            if !out.contains(&url) {
                out.push(url);
            }
        }
    }
    out
}

/// Colors declared via `color` / `background-color` / `border-color`,
/// deduplicated, excluding transparent values.
pub fn declared_colors(doc: &Html) -> Vec<String> {
    let mut out = Vec::new();
    for text in style_texts(doc) {
        for cap in COLOR_DECL_RE.captures_iter(&text) {
            let value = cap[1].trim().to_string();
            if value == "transparent" || value == "rgba(0, 0, 0, 0)" {
                continue;
            }
            if !out.contains(&value) {
                out.push(value);
            }
        }
    }
    out
}

/// Font families declared in style text, deduplicated.
pub fn declared_fonts(doc: &Html) -> Vec<String> {
    let mut out = Vec::new();
    for text in style_texts(doc) {
        for cap in FONT_DECL_RE.captures_iter(&text) {
            let value = cap[1].trim().to_string();
            if !value.is_empty() && !out.contains(&value) {
                out.push(value);
            }
        }
    }
    out
}
