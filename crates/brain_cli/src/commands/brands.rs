//! Brands command - List the brands the service knows about.

use anyhow::Result;
use clap::Args;
use tracing::info;

use brain_chat::{BrandBrainApi, ClientConfig, HttpApiClient};

#[derive(Args)]
pub struct BrandsArgs {
    /// Print the listing as JSON
    #[arg(long)]
    json: bool,
}

pub async fn execute(config: ClientConfig, args: BrandsArgs) -> Result<()> {
    info!("Listing brands from {}", config.base_url);

    let client = HttpApiClient::new(config);
    let listing = client.list_brands().await;

    if let Some(reason) = listing.failure() {
        eprintln!("⚠️  Brand fetch failed: {}", reason);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&listing.brands)?);
        return Ok(());
    }

    if listing.is_empty() {
        println!("No brands found");
        return Ok(());
    }

    for brand in &listing.brands {
        println!("{:<24} {}", brand.id, brand.display_name());
    }

    Ok(())
}
