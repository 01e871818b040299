use std::hint::black_box;

use addrparse::{AddressParser, GeocodeRecord};
use criterion::{Criterion, criterion_group, criterion_main};

const ADDRESSES: [&str; 6] = [
    "2 N. Park Street, Madison, WI 53703",
    "416/418 N. Carroll St.",
    "407 West Doty St. - #2",
    "431 West Johnson, Madison, WI",
    "351 King St. #400, San Francisco, CA, 94158",
    "1200 120th Pl NE, Kirkland, WA",
];

fn bench_address_parsing(c: &mut Criterion) {
    let parser = AddressParser::new();

    c.bench_function("parse_simple_address", |b| {
        b.iter(|| parser.parse(black_box("2 N. Park Street, Madison, WI 53703")))
    });

    c.bench_function("parse_complex_address", |b| {
        b.iter(|| parser.parse(black_box("351 King St. #400, San Francisco, CA, 94158")))
    });

    c.bench_function("parse_batch", |b| {
        b.iter(|| parser.parse_batch(black_box(&ADDRESSES)))
    });
}

fn bench_reconciliation(c: &mut Criterion) {
    let parser = AddressParser::new();
    let record = GeocodeRecord {
        confidence: Some(0.9),
        street_address: Some("2 N Park St".to_string()),
        street_number: Some("2".to_string()),
        street_name: Some("N Park St".to_string()),
        locality: Some("Madison".to_string()),
        region: Some("WI".to_string()),
        latitude: Some(43.07),
        longitude: Some(-89.38),
    };

    c.bench_function("parse_with_record", |b| {
        b.iter(|| parser.parse_with_record(black_box(ADDRESSES[0]), black_box(&record)))
    });
}

criterion_group!(benches, bench_address_parsing, bench_reconciliation);
criterion_main!(benches);
