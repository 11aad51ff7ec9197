// ABOUTME: Content-migration library: scrape, import, normalize, write, upload.
// ABOUTME: Each pipeline stage is a module with a run_* entry point.

//! Migration toolchain for moving the Urban Elephant site into Sanity.
//!
//! The pipeline has five stages, each runnable on its own:
//! site scrape ([`scrape`]), targeted harvest ([`harvest`]), legacy CMS
//! import ([`strapi`]), curated seed ([`seed`]), and asset upload
//! ([`upload`]). The middle of every path is the same: normalize raw
//! records into [`documents::CanonicalDocument`] values and write them
//! with [`import_file`].

pub mod config;
pub mod documents;
pub mod error;
pub mod extract;
pub mod harvest;
pub mod import_file;
pub mod mapping;
pub mod normalize;
pub mod page;
pub mod scrape;
pub mod seed;
pub mod strapi;
pub mod upload;

pub use config::{Paths, SanityConfig};
pub use documents::CanonicalDocument;
pub use error::{ErrorCode, MigrateError, Result};
