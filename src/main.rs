use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use facility2osm::apis::anleggsregisteret::{FacilityFeed, FileFeed, RegistryFeed};
use facility2osm::apis::geonorge::GeonorgeClient;
use facility2osm::apis::tagging;
use facility2osm::constants::{CORRECTED_TAGGING_FILE, OSM_OUTPUT_FILE};
use facility2osm::logging;
use facility2osm::osm::OsmWriter;
use facility2osm::pipeline::{Converter, ReferenceData, RunSummary};

#[derive(Parser)]
#[command(name = "facility2osm")]
#[command(about = "Converts Anleggsregisteret sports facilities to OSM format for import/update")]
#[command(version)]
struct Cli {
    /// Read facilities from a local JSON file instead of the registry feed
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();
    let cli = Cli::parse();

    print!("\nLoading municipality data... ");
    std::io::stdout().flush()?;

    let client = reqwest::Client::new();
    let tagging = tagging::fetch_tag_reference(&client).await?;
    let boundaries = GeonorgeClient::new().load_bounding_boxes().await?;

    let feed: Box<dyn FacilityFeed> = match &cli.input {
        Some(path) => Box::new(FileFeed::from_path(path)?),
        None => Box::new(RegistryFeed::new()),
    };

    println!("\nConverting facilities...");

    let file = File::create(OSM_OUTPUT_FILE)?;
    let mut writer = OsmWriter::new(BufWriter::new(file))?;

    let converter = Converter::new(ReferenceData {
        tagging,
        boundaries,
    });
    let summary = converter.run(feed.as_ref(), &mut writer).await?;
    writer.finish()?;
    info!("Wrote {}", OSM_OUTPUT_FILE);

    if let Some(corrected) = &summary.corrected_mapping {
        fs::write(CORRECTED_TAGGING_FILE, corrected)?;
    }

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    let c = &summary.counters;
    println!("\rFacilities saved to file '{}'", OSM_OUTPUT_FILE);
    println!("  Loaded from Anleggsregisteret: {}", c.total);
    println!("  Not existing                 : {}", c.inactive);
    println!("  With correct coordinates     : {}", c.coordinates_ok);
    println!("  With fixed coordinates       : {}", c.coordinates_fixed);
    println!("  With incorrect coordinates   : {}", c.coordinates_not_fixed);
    println!("  Without coordinates          : {}", c.no_coordinates);

    if !summary.undefined_types.is_empty() {
        println!("\nFacility types without tagging:");
        for (category, type_description) in &summary.undefined_types {
            println!("  {category} / {type_description}");
        }
    }

    if summary.corrected_mapping.is_some() {
        if summary.structure_changed {
            println!("\nCategory/type structure has changed, please review '{CORRECTED_TAGGING_FILE}'");
        } else {
            println!("\nCorrected tagging saved to '{CORRECTED_TAGGING_FILE}'");
        }
    }
}
