// ABOUTME: Hand-curated seed dataset: properties, tours, reviews, site settings.
// ABOUTME: Writes the bulk-import payload and the image mapping the uploader needs.

use tracing::info;

use crate::config::Paths;
use crate::documents::{
    Amenity, CanonicalDocument, Contact, Highlight, PropertyDoc, Reference, ReviewDoc, Seo,
    SiteSettingsDoc, Slug, TourDoc,
};
use crate::error::Result;
use crate::import_file;
use crate::mapping::{ImageMapping, PropertyImages};
use crate::normalize::document_id;
use crate::strapi::NIGHTSBRIDGE_URL;

struct SeedProperty {
    slug: &'static str,
    name: &'static str,
    tagline: &'static str,
    description: &'static str,
    star_rating: u8,
    amenities: &'static [(&'static str, &'static str)],
    highlights: &'static [(&'static str, &'static str)],
    hero_image: &'static str,
    gallery: &'static [&'static str],
}

struct SeedTour {
    slug: &'static str,
    name: &'static str,
    category: &'static str,
    price: u32,
    duration: &'static str,
    description: &'static str,
    image: Option<&'static str>,
}

struct SeedReview {
    author: &'static str,
    content: &'static str,
    source: &'static str,
    property: &'static str,
}

const SEED_PROPERTIES: &[SeedProperty] = &[
    SeedProperty {
        slug: "the-rose",
        name: "The Rose",
        tagline: "Boutique flair meets rooftop views",
        description: "Stylish, design-led apartments at 117 Strand Street, Cape Town. The Rose offers boutique flair, rooftop views, and hotel-level comfort in the city's heart.",
        star_rating: 5,
        amenities: &[
            ("Rooftop Pool", "building"),
            ("Table Mountain Views", "room"),
            ("Fully Equipped Kitchen", "kitchen"),
            ("High-Speed WiFi", "general"),
            ("Air Conditioning", "room"),
            ("Smart TV", "entertainment"),
            ("Secure Parking", "building"),
            ("24/7 Security", "building"),
        ],
        highlights: &[
            ("Rooftop Pool", "Stunning infinity pool with panoramic city views"),
            ("Central Location", "Walking distance to V&A Waterfront and CBD"),
            ("Design-Led Interiors", "Contemporary African aesthetic throughout"),
        ],
        hero_image: "img_large_The_Rose_Table_Mountain_View_header_3d9d860d38.jpg",
        gallery: &[
            "img_large_The_Rose_Rooftop_slide_image_2_bb8cd84166.jpg",
            "img_large_The_Rose_Rooftop_Pool_slide_4_06dafc4537.jpg",
            "img_large_The_Rose_slide_3_672cd608b5.jpg",
            "img_large_The_Rose_Building_place_image_a1a5e741d7.jpg",
        ],
    },
    SeedProperty {
        slug: "16-on-bree",
        name: "16 On Bree",
        tagline: "Luxury living in the heart of Cape Town",
        description: "Experience luxury at 16 on Bree with Urban Elephant. Discover this exclusive Cape Town property, offering elegance and comfort in the heart of the city.",
        star_rating: 5,
        amenities: &[
            ("Gym Access", "building"),
            ("Rooftop Terrace", "building"),
            ("Fully Equipped Kitchen", "kitchen"),
            ("High-Speed WiFi", "general"),
            ("Air Conditioning", "room"),
            ("Smart TV", "entertainment"),
            ("Secure Parking", "building"),
            ("Concierge Service", "general"),
        ],
        highlights: &[
            ("Prime Location", "In the heart of Cape Town's vibrant Bree Street"),
            ("Modern Luxury", "Sleek, contemporary design with premium finishes"),
            ("City Living", "Walk to top restaurants, bars, and attractions"),
        ],
        hero_image: "img_large_1_header_upgrade_9cd5834783.jpeg",
        gallery: &[
            "img_large_UE_14_85f2fd561a.jpeg",
            "img_large_UE_38_f33d4be4cc.jpeg",
            "img_large_UE_40_f65491f255.jpeg",
            "img_large_UE_42_001be185e9.jpeg",
            "img_large_UE_45_fefcd55e0b.jpeg",
            "img_large_UE_52_fefec70e43.jpeg",
            "img_large_3_16onbree_0f8bc499d1.jpg",
        ],
    },
    SeedProperty {
        slug: "the-docklands",
        name: "The Docklands",
        tagline: "Premium waterfront living",
        description: "Stay at The Docklands, an Urban Elephant property in Cape Town. Enjoy waterfront luxury, modern amenities, and easy access to the city's best attractions.",
        star_rating: 5,
        amenities: &[
            ("Waterfront Views", "room"),
            ("Swimming Pool", "building"),
            ("Fully Equipped Kitchen", "kitchen"),
            ("High-Speed WiFi", "general"),
            ("Air Conditioning", "room"),
            ("Smart TV", "entertainment"),
            ("Secure Parking", "building"),
            ("Gym Access", "building"),
        ],
        highlights: &[
            ("Waterfront Location", "Steps from the V&A Waterfront"),
            ("Harbor Views", "Watch the boats from your private balcony"),
            ("Premium Amenities", "Pool, gym, and concierge services"),
        ],
        hero_image: "img_large_docklands_header_bd45ce5211.jpeg",
        gallery: &[
            "img_large_UE_65_637ec09a6b.jpeg",
            "img_large_UE_66_eaafcb4ac1.jpeg",
            "img_large_UE_67_9191b5c12e.jpeg",
            "img_large_UE_69_fe8fc54c82.jpeg",
            "img_large_UE_71_9de58fa86f.jpeg",
            "img_large_UE_72_95f4eafcdd.jpeg",
        ],
    },
    SeedProperty {
        slug: "the-flamingo",
        name: "The Flamingo",
        tagline: "Coastal cool meets city chic",
        description: "Stylish studio apartments in Sea Point. Urban Elephant's Flamingo blends beachside elegance with city buzz - your Atlantic-side sanctuary awaits.",
        star_rating: 4,
        amenities: &[
            ("Ocean Views", "room"),
            ("Rooftop Deck", "building"),
            ("Kitchenette", "kitchen"),
            ("High-Speed WiFi", "general"),
            ("Air Conditioning", "room"),
            ("Smart TV", "entertainment"),
            ("Secure Parking", "building"),
            ("Beach Access", "general"),
        ],
        highlights: &[
            ("Sea Point Promenade", "Direct access to Cape Town's famous beachfront"),
            ("Sunset Views", "Watch the Atlantic sun set from your room"),
            ("Vibrant Neighborhood", "Cafes, restaurants, and beaches at your doorstep"),
        ],
        hero_image: "img_large_Whats_App_Image_2025_05_15_at_10_22_18_aed73151bf.jpeg",
        gallery: &[
            "img_large_Whats_App_Image_2025_05_15_at_10_22_16_1_f45c5b5a90.jpeg",
            "img_large_Whats_App_Image_2025_05_15_at_10_22_18_1_08a75bbd38.jpeg",
            "img_large_Whats_App_Image_2025_05_15_at_10_22_21_5ab745d7c5.jpeg",
            "img_large_Whats_App_Image_2025_05_15_at_10_22_20_87cdfdf3a5.jpeg",
            "img_large_Whats_App_Image_2025_05_15_at_10_22_20_1_28667891b4.jpeg",
        ],
    },
];

const SEED_TOURS: &[SeedTour] = &[
    SeedTour { slug: "aquila-safari", name: "Aquila Safari", category: "wildlife", price: 2500, duration: "Full Day", description: "Experience the Big 5 at Aquila Private Game Reserve, just 2 hours from Cape Town.", image: Some("img_large_Aquila_7ae5dadd9a.jpg") },
    SeedTour { slug: "cape-point-penguins", name: "Cape Point & Penguins", category: "sightseeing", price: 1200, duration: "Full Day", description: "Visit the Cape of Good Hope and meet the famous Boulders Beach penguins.", image: Some("img_large_Cape_of_Good_Hope_a86613cce3.jpg") },
    SeedTour { slug: "winelands-tour", name: "Winelands Tour", category: "wine-food", price: 1500, duration: "Full Day", description: "Explore Stellenbosch, Franschhoek, and Paarl wine regions with tastings at premium estates.", image: Some("img_large_Winelands_Tour_3135c8ec7b.jpg") },
    SeedTour { slug: "table-mountain-hike", name: "Table Mountain Hike", category: "adventure", price: 800, duration: "Half Day", description: "Guided hike up one of the New7Wonders of Nature with breathtaking views.", image: Some("img_large_tablemountain_86cfecd042.jpg") },
    SeedTour { slug: "shark-cage-diving", name: "Shark Cage Diving", category: "adventure", price: 2200, duration: "Full Day", description: "Get up close with great white sharks in Gansbaai, the shark capital of the world.", image: Some("img_large_CROPPED_Shark_Cage_Diving_6ee9d1b42c.JPG") },
    SeedTour { slug: "boat-cruises", name: "Boat Cruises", category: "sightseeing", price: 600, duration: "2-3 Hours", description: "Sunset cruises and harbor tours departing from the V&A Waterfront.", image: Some("img_large_CROPPED_Boat_Cruises_b0364cf95b.JPG") },
    SeedTour { slug: "surf-lessons", name: "Surf Lessons", category: "water-sports", price: 500, duration: "2 Hours", description: "Learn to surf with experienced instructors at Muizenberg Beach.", image: Some("img_large_Surf_Lessions_38695cff23.JPEG") },
    SeedTour { slug: "kirstenbosch-gardens", name: "Kirstenbosch Gardens", category: "sightseeing", price: 400, duration: "Half Day", description: "Explore one of the world's great botanical gardens on the slopes of Table Mountain.", image: Some("img_large_Kirstenbosch_c1d9239b04.jpg") },
    SeedTour { slug: "bo-kaap-walking-tour", name: "Bo-Kaap Walking Tour", category: "cultural", price: 350, duration: "2 Hours", description: "Discover the colorful history and culture of Cape Town's iconic Bo-Kaap neighborhood.", image: Some("img_large_bokaap_5debd990cd.jpg") },
    SeedTour { slug: "kayaking-adventures", name: "Kayaking Adventures", category: "water-sports", price: 700, duration: "3 Hours", description: "Paddle through kelp forests and spot seals and penguins from the water.", image: Some("img_large_kayaking_dbbe334ef4.png") },
    SeedTour { slug: "harley-davidson-tours", name: "Harley Davidson Tours", category: "adventure", price: 3000, duration: "Full Day", description: "Ride along the stunning Cape Peninsula on a classic Harley Davidson.", image: Some("img_large_Harley_Davidson_1867a1784d.jpeg") },
    SeedTour { slug: "full-day-chauffeur-service", name: "Full Day Chauffeur Service", category: "sightseeing", price: 4500, duration: "Full Day", description: "Private chauffeur service to customize your perfect Cape Town day.", image: Some("img_large_Full_Day_Chauffeur_Service_2b06e499a0.png") },
    SeedTour { slug: "cooking-experience", name: "Cooking Experience", category: "cultural", price: 1200, duration: "4 Hours", description: "Learn to cook traditional Cape Malay cuisine with local chefs.", image: Some("img_large_cooking_experience_2ca53d8f11.jpg") },
];

const SEED_REVIEWS: &[SeedReview] = &[
    SeedReview { author: "Sarah M.", content: "Absolutely stunning property with breathtaking views of Table Mountain. The staff went above and beyond to make our stay special. The rooftop pool is a highlight!", source: "google", property: "the-rose" },
    SeedReview { author: "James K.", content: "Perfect location in the heart of Cape Town. The apartment was immaculate and had everything we needed. Will definitely be coming back!", source: "booking", property: "16-on-bree" },
    SeedReview { author: "Emma L.", content: "The rooftop pool is amazing! We loved watching the sunset over the city. The team arranged incredible tours for us too.", source: "airbnb", property: "the-rose" },
    SeedReview { author: "Michael R.", content: "Best accommodation we've stayed at in Cape Town. The waterfront views from The Docklands are spectacular.", source: "tripadvisor", property: "the-docklands" },
    SeedReview { author: "Lisa T.", content: "The Flamingo exceeded our expectations. Loved being so close to the beach and the Sea Point promenade.", source: "google", property: "the-flamingo" },
];

const SITE_LOGO: &str = "img_full_logo_ae69785bc0.svg";
const SITE_ICON: &str = "img_elephant_icon_1_8f1cc50866.svg";
const SITE_HERO_VIDEO: &str = "home_video_1_b763e0e2e8.mp4";

fn site_settings() -> SiteSettingsDoc {
    let mut settings = SiteSettingsDoc::singleton();
    settings.contact = Contact {
        email: "karin@urbanelephant.co.za".to_string(),
        phone: "+27 21 300 1044".to_string(),
        whatsapp: "+27 72 618 8140".to_string(),
        operations_hours: "Mon-Fri 9am-5pm".to_string(),
        after_hours_phone: Some("+27 72 618 8140".to_string()),
    };
    settings.address.street = Some("117 Strand Street".to_string());
    settings.book_now_url = Some(NIGHTSBRIDGE_URL.to_string());
    settings
}

fn property_doc(seed: &SeedProperty) -> PropertyDoc {
    PropertyDoc {
        id: document_id("property", seed.slug),
        name: seed.name.to_string(),
        slug: Slug::new(seed.slug),
        tagline: Some(seed.tagline.to_string()),
        description: Some(seed.description.to_string()),
        location: Some("Cape Town, South Africa".to_string()),
        featured: true,
        star_rating: seed.star_rating,
        amenities: seed
            .amenities
            .iter()
            .enumerate()
            .map(|(i, (name, category))| Amenity {
                key: format!("amenity-{}", i),
                name: name.to_string(),
                category: category.to_string(),
            })
            .collect(),
        highlights: seed
            .highlights
            .iter()
            .enumerate()
            .map(|(i, (title, description))| Highlight {
                key: format!("highlight-{}", i),
                title: title.to_string(),
                description: Some(description.to_string()),
            })
            .collect(),
        nights_bridge_url: Some(NIGHTSBRIDGE_URL.to_string()),
        seo: Some(Seo {
            meta_title: Some(format!("{} | Urban Elephant", seed.name)),
            meta_description: Some(seed.description.to_string()),
        }),
        hero_image_file: Some(seed.hero_image.to_string()),
        gallery_files: Some(seed.gallery.iter().map(|s| s.to_string()).collect()),
    }
}

fn tour_doc(seed: &SeedTour) -> TourDoc {
    TourDoc {
        id: document_id("tour", seed.slug),
        name: seed.name.to_string(),
        slug: Slug::new(seed.slug),
        category: Some(seed.category.to_string()),
        price: Some(seed.price),
        duration: Some(seed.duration.to_string()),
        short_description: Some(seed.description.to_string()),
        featured: true,
        image_file: seed.image.map(str::to_string),
    }
}

fn review_doc(seed: &SeedReview) -> ReviewDoc {
    ReviewDoc {
        id: document_id("review", &crate::normalize::slugify(seed.author)),
        author: seed.author.to_string(),
        content: seed.content.to_string(),
        rating: 5,
        source: Some(seed.source.to_string()),
        featured: true,
        property: Some(Reference::to(document_id("property", seed.property))),
    }
}

/// The full curated document set: site settings, then properties, tours,
/// and reviews.
pub fn seed_documents() -> Vec<CanonicalDocument> {
    let mut docs = vec![CanonicalDocument::SiteSettings(site_settings())];
    docs.extend(SEED_PROPERTIES.iter().map(|p| CanonicalDocument::Property(property_doc(p))));
    docs.extend(SEED_TOURS.iter().map(|t| CanonicalDocument::Tour(tour_doc(t))));
    docs.extend(SEED_REVIEWS.iter().map(|r| CanonicalDocument::Review(review_doc(r))));
    docs
}

/// The image mapping matching the curated documents.
pub fn seed_mapping(media_dir: &str) -> ImageMapping {
    let mut mapping = ImageMapping {
        media_dir: Some(media_dir.to_string()),
        ..ImageMapping::default()
    };
    for prop in SEED_PROPERTIES {
        mapping.properties.insert(
            prop.slug.to_string(),
            PropertyImages {
                hero_image: prop.hero_image.to_string(),
                gallery: prop.gallery.iter().map(|s| s.to_string()).collect(),
            },
        );
    }
    for tour in SEED_TOURS {
        if let Some(image) = tour.image {
            mapping.tours.insert(tour.slug.to_string(), image.to_string());
        }
    }
    mapping.site.logo = SITE_LOGO.to_string();
    mapping.site.elephant_icon = SITE_ICON.to_string();
    mapping.site.hero_video = SITE_HERO_VIDEO.to_string();
    mapping
}

/// Counts reported at the end of a seed run.
#[derive(Debug, Default)]
pub struct SeedSummary {
    pub properties: usize,
    pub tours: usize,
    pub reviews: usize,
    pub total: usize,
}

/// Write the curated import payload and the image mapping.
pub async fn run_seed(paths: &Paths) -> Result<SeedSummary> {
    let docs = seed_documents();
    import_file::write_ndjson(&docs, &paths.ndjson_path()).await?;
    let mapping = seed_mapping(&paths.media_dir.display().to_string());
    mapping.save(&paths.mapping_path()).await?;
    info!(documents = docs.len(), "seed content written");

    Ok(SeedSummary {
        properties: SEED_PROPERTIES.len(),
        tours: SEED_TOURS.len(),
        reviews: SEED_REVIEWS.len(),
        total: docs.len(),
    })
}
