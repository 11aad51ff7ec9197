// ABOUTME: Command-line entry point: one subcommand per pipeline stage.
// ABOUTME: Initializes logging, reads env configuration, and prints run summaries.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ue_migrate::config::{self, Paths, SanityConfig};

#[derive(Parser)]
#[command(
    name = "ue-migrate",
    version,
    about = "Content migration pipeline: scrape, import, and upload to Sanity"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape the whole public site into an audit bundle with assets
    Scrape,
    /// Harvest property, tour, and review content into an import file
    Harvest,
    /// Import pages from the legacy Strapi API into an import file
    Import,
    /// Write the curated seed dataset and image mapping
    Seed,
    /// Upload media to Sanity and patch documents with asset references
    Upload,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let paths = Paths::from_env();

    match cli.command {
        Command::Scrape => {
            let summary = ue_migrate::scrape::run_scrape(&config::site_base_url(), &paths).await?;
            println!("Scrape complete:");
            println!("  Pages:      {}", summary.pages);
            println!("  Downloaded: {}", summary.images_downloaded);
            println!("  Skipped:    {}", summary.images_skipped);
            println!("  Failed:     {}", summary.images_failed);
        }
        Command::Harvest => {
            let summary =
                ue_migrate::harvest::run_harvest(&config::site_base_url(), &paths).await?;
            println!("Harvest complete:");
            println!("  Properties:    {}", summary.properties);
            println!("  Tours:         {}", summary.tours);
            println!("  Reviews:       {}", summary.reviews);
            println!("  Site settings: 1");
            println!("Import file: {}", paths.ndjson_path().display());
        }
        Command::Import => {
            let summary =
                ue_migrate::strapi::run_import(&config::strapi_base_url(), &paths).await?;
            println!("Import complete:");
            println!("  Site settings: 1");
            println!("  Properties:    {}", summary.properties);
            println!("  Tours:         {}", summary.tours);
            println!("  Reviews:       {}", summary.reviews);
            println!("  Total:         {}", summary.total);
            println!("Import file: {}", paths.ndjson_path().display());
        }
        Command::Seed => {
            let summary = ue_migrate::seed::run_seed(&paths).await?;
            println!("Seed complete:");
            println!("  Site settings: 1");
            println!("  Properties:    {}", summary.properties);
            println!("  Tours:         {}", summary.tours);
            println!("  Reviews:       {}", summary.reviews);
            println!("Import file:   {}", paths.ndjson_path().display());
            println!("Image mapping: {}", paths.mapping_path().display());
        }
        Command::Upload => {
            // Credentials are validated before any network traffic.
            let sanity = SanityConfig::from_env()?;
            let summary = ue_migrate::upload::run_upload(&sanity, &paths).await?;
            println!("Upload complete:");
            println!("  Uploaded: {}", summary.uploaded);
            println!("  Reused:   {}", summary.reused);
            println!("  Patched:  {}", summary.patched);
            println!("  Failed:   {}", summary.failed);
        }
    }

    Ok(())
}
