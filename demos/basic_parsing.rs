//! Basic address parsing example
//!
//! This example parses a handful of addresses with the bundled tables
//! and prints the fields found in each.
//!
//! Run with: cargo run --example basic_parsing

use addrparse::AddressParser;

fn main() {
    println!("addrparse Basic Parsing Example");
    println!("===============================");

    let addresses = [
        "2 N. Park Street, Madison, WI 53703",
        "416/418 N. Carroll St.",
        "407 West Doty St. - #2",
        "431 West Johnson, Madison, WI",
        "351 King St. #400, San Francisco, CA, 94158",
        "1200 120th Pl NE, Kirkland, WA",
        "Park Street, Madison, WI 53703",
    ];

    let parser = AddressParser::new();

    println!("\nParsing addresses:");
    println!("-----------------");

    for address in addresses {
        println!("\nOriginal: {address}");

        match parser.parse(address) {
            Ok(parsed) => {
                println!("  House number: {}", parsed.primary_number());
                println!(
                    "  Predirection: {}",
                    parsed.street_predirection().unwrap_or_default()
                );
                println!("  Street: {}", parsed.street_name());
                println!("  Suffix: {}", parsed.street_suffix().unwrap_or_default());
                println!(
                    "  Unit: {}",
                    parsed.secondary_designator().unwrap_or_default()
                );
                println!("  City: {}", parsed.city().unwrap_or_default());
                println!("  State: {}", parsed.state().unwrap_or_default());
                println!("  Zip: {}", parsed.zip().unwrap_or_default());
                if parsed.unmatched() {
                    println!("  (some tokens could not be placed)");
                }
                println!("  Canonical: {parsed}");
            }
            Err(e) => {
                println!("  Error: {e}");
            }
        }
    }
}
