//! Advanced usage example for addrparse.
//!
//! This example demonstrates:
//! - Custom configuration and reference data
//! - Geocode reconciliation with a stand-in geocoder
//! - Batch parsing
//! - Error handling patterns
//!
//! Run with: cargo run --example advanced_usage

use std::collections::HashSet;
use std::time::Instant;

use addrparse::{
    AddressNormalizer, AddressParser, Backend, DataManager, Error, GeocodeRecord, ParserConfig,
    Result,
};

/// A geocoder that only knows one address.
fn toy_geocoder(address: &str) -> Result<Option<GeocodeRecord>> {
    if !address.starts_with("2 N. Park") {
        return Ok(None);
    }
    Ok(Some(GeocodeRecord {
        confidence: Some(0.92),
        street_address: Some("2 N Park St".to_string()),
        street_number: Some("2".to_string()),
        street_name: Some("N Park St".to_string()),
        locality: Some("Madison".to_string()),
        region: Some("WI".to_string()),
        latitude: Some(43.0766),
        longitude: Some(-89.4006),
    }))
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("addrparse Advanced Usage Example");
    println!("================================\n");

    // Example 1: Reference data from a directory
    println!("1. Reference Data");
    println!("-----------------");

    let manager = DataManager::new();
    println!("Data directory: {}", manager.data_dir().display());
    println!("All table files present: {}", manager.is_data_available());
    let gazetteer = manager.load().await?;
    let stats = gazetteer.stats();
    println!(
        "Loaded {} suffixes, {} cities, {} streets, {} zips\n",
        stats.suffixes, stats.cities, stats.streets, stats.zips
    );

    // Example 2: Custom configuration
    println!("2. Custom Configuration");
    println!("----------------------");

    let config = ParserConfig::builder()
        .gazetteer(gazetteer)
        .streets(HashSet::from(["broadway".to_string()]))
        .build();
    let parser = AddressParser::with_config(config)?;
    let parsed = parser.parse("1200 Broadway, Madison, WI")?;
    println!("Street table lookup: {parsed}\n");

    // Example 3: Batch parsing
    println!("3. Batch Parsing");
    println!("----------------");

    let addresses = [
        "2 N. Park Street, Madison, WI 53703",
        "416/418 N. Carroll St.",
        "407 West Doty St. #2",
        "Park Street, Madison, WI 53703",
    ];
    let start = Instant::now();
    let results = parser.parse_batch(&addresses);
    println!("Parsed {} addresses in {:?}", addresses.len(), start.elapsed());
    for (address, result) in addresses.iter().zip(&results) {
        match result {
            Ok(parsed) => println!("  ✓ {address} -> {parsed}"),
            Err(e) => println!("  ✗ {address}: {e}"),
        }
    }
    println!();

    // Example 4: Zip lookup
    println!("4. Zip Lookup");
    println!("-------------");

    let madison = parser.parse(addresses[0])?;
    if let Some(info) = madison.zip_info(parser.gazetteer()) {
        println!(
            "{} is {}, {} ({}, {}), UTC{:+}\n",
            info.zip, info.city, info.state, info.lat, info.lng, info.timezone
        );
    }

    // Example 5: Geocode reconciliation
    println!("5. Geocode Reconciliation");
    println!("-------------------------");

    let config = ParserConfig::builder()
        .backend(Backend::Geocode)
        .required_confidence(0.8)
        .geocoder(toy_geocoder)
        .build();
    let geocoding = AddressParser::with_config(config)?;

    for (address, result) in geocoding.parse_many(&addresses[..2])? {
        match result {
            Ok(parsed) => println!(
                "  ✓ {address} -> {parsed} at ({:?}, {:?}), confidence {}",
                parsed.lat(),
                parsed.lng(),
                parsed.confidence()
            ),
            Err(e) => println!("  ✗ {address}: {e}"),
        }
    }

    let normalizer = AddressNormalizer::new(parser.gazetteer());
    let overlap = normalizer.overlap(addresses[0], "2 N Park St");
    println!(
        "  Token overlap with geocoder: {} only in input, {} only in return\n",
        overlap.original_only, overlap.returned_only
    );

    // Example 6: Error handling
    println!("6. Error Handling");
    println!("-----------------");

    let shaky = GeocodeRecord {
        confidence: Some(0.4),
        ..toy_geocoder(addresses[0])?.unwrap_or_default()
    };
    match geocoding.parse_with_record(addresses[0], &shaky) {
        Err(Error::LowConfidence {
            required, actual, ..
        }) => println!("  Rejected: confidence {actual} below {required}"),
        Err(e) => println!("  Rejected: {e}"),
        Ok(parsed) => println!("  Accepted: {parsed}"),
    }

    match parser.parse("Park Street, Madison, WI 53703") {
        Err(Error::InvalidAddress { message, .. }) => println!("  Invalid: {message}"),
        other => println!("  Unexpected: {other:?}"),
    }

    Ok(())
}
