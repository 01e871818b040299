//! # addrparse
//!
//! Heuristic parsing of free-form US street addresses.
//!
//! Addresses are read right to left: zip, state and city are peeled off the
//! end, then the street suffix, street name, directional and house number.
//! Every decision is a lookup against a [`Gazetteer`] of USPS suffixes,
//! directionals, states, cities and zip codes, so no training data is needed.
//!
//! ## Features
//!
//! - **Classification**: an ordered chain of token classifiers with a fallback guesser
//! - **Unit extraction**: `#2`, `apt 5`, `unit B`, `rm 7` and friends are pulled out first
//! - **Geocode reconciliation**: validate an external geocoder's answer against the input
//! - **Reference data**: bundled tables, or load your own from a data directory
//! - **Thread safe**: one parser can serve any number of threads
//!
//! ## Quick Start
//!
//! ```rust
//! use addrparse::AddressParser;
//!
//! let parser = AddressParser::new();
//! let address = parser.parse("2 N. Park Street, Madison, WI 53703")?;
//!
//! assert_eq!(address.primary_number(), "2");
//! assert_eq!(address.street_predirection(), Some("N."));
//! assert_eq!(address.street_name(), "Park");
//! assert_eq!(address.street_suffix(), Some("St."));
//! assert_eq!(address.city(), Some("Madison"));
//! assert_eq!(address.state(), Some("WI"));
//! assert_eq!(address.zip(), Some("53703"));
//! # Ok::<(), addrparse::Error>(())
//! ```

#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, LazyLock};

pub mod address;
pub mod apartment;
pub mod classifier;
pub mod data;
pub mod error;
pub mod gazetteer;
pub mod geocode;
pub mod normalizer;
pub mod parser;
pub mod preprocess;
pub mod reconcile;
pub mod tokenizer;
pub mod types;

// Re-export main API
pub use address::{FieldAssignment, PartialAddress, StructuredAddress};
pub use data::{DataConfig, DataManager};
pub use error::{Error, Result};
pub use gazetteer::{Gazetteer, GazetteerStats};
#[cfg(feature = "dstk")]
pub use geocode::DstkClient;
pub use geocode::Geocoder;
pub use normalizer::{AddressNormalizer, NormalizedAddress, TokenOverlap};
pub use parser::AddressParser;
pub use types::*;

/// Confidence a geocode return needs unless configured otherwise.
pub const DEFAULT_REQUIRED_CONFIDENCE: f64 = 0.65;

static DEFAULT_PARSER: LazyLock<AddressParser> = LazyLock::new(AddressParser::new);

/// Parse an address with a shared parser over the bundled tables.
///
/// # Errors
///
/// See [`AddressParser::parse`].
///
/// # Examples
///
/// ```rust
/// let address = addrparse::parse("416/418 N. Carroll St.")?;
/// assert_eq!(address.primary_number(), "416");
/// # Ok::<(), addrparse::Error>(())
/// ```
pub fn parse(address: &str) -> Result<StructuredAddress> {
    DEFAULT_PARSER.parse(address)
}

/// Configuration for an [`AddressParser`].
///
/// Each parser takes its own copy of the gazetteer, so tables changed for one
/// parser never leak into another.
#[derive(Clone)]
pub struct ParserConfig {
    /// Reference tables
    pub gazetteer: Gazetteer,

    /// Classification or geocode reconciliation
    pub backend: Backend,

    /// Minimum geocoder confidence, geocode backend only
    pub required_confidence: f64,

    /// Geocoding collaborator, required by the geocode backend
    pub geocoder: Option<Arc<dyn Geocoder>>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            gazetteer: Gazetteer::bundled(),
            backend: Backend::Default,
            required_confidence: DEFAULT_REQUIRED_CONFIDENCE,
            geocoder: None,
        }
    }
}

impl fmt::Debug for ParserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserConfig")
            .field("gazetteer", &self.gazetteer.stats())
            .field("backend", &self.backend)
            .field("required_confidence", &self.required_confidence)
            .field("geocoder", &self.geocoder.is_some())
            .finish()
    }
}

impl ParserConfig {
    /// Create a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use addrparse::{Backend, ParserConfig};
    /// use std::collections::HashSet;
    ///
    /// let config = ParserConfig::builder()
    ///     .cities(HashSet::from(["madison".to_string(), "verona".to_string()]))
    ///     .required_confidence(0.8)
    ///     .build();
    ///
    /// assert_eq!(config.backend, Backend::Default);
    /// assert!(config.gazetteer.is_city("Verona"));
    /// ```
    pub fn builder() -> ParserConfigBuilder {
        ParserConfigBuilder::new()
    }
}

/// Builder for ParserConfig.
#[derive(Debug, Clone, Default)]
pub struct ParserConfigBuilder {
    config: ParserConfig,
}

impl ParserConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every reference table.
    pub fn gazetteer(mut self, gazetteer: Gazetteer) -> Self {
        self.config.gazetteer = gazetteer;
        self
    }

    /// Set the street suffix table, long form to abbreviation.
    pub fn suffixes(mut self, suffixes: HashMap<String, String>) -> Self {
        self.config.gazetteer = self.config.gazetteer.with_suffixes(suffixes);
        self
    }

    /// Set the directional table.
    pub fn prefixes(mut self, prefixes: HashMap<String, String>) -> Self {
        self.config.gazetteer = self.config.gazetteer.with_prefixes(prefixes);
        self
    }

    /// Set the state table, full name to abbreviation.
    pub fn states(mut self, states: HashMap<String, String>) -> Self {
        self.config.gazetteer = self.config.gazetteer.with_states(states);
        self
    }

    /// Set the known cities.
    pub fn cities(mut self, cities: HashSet<String>) -> Self {
        self.config.gazetteer = self.config.gazetteer.with_cities(cities);
        self
    }

    /// Set the known streets.
    pub fn streets(mut self, streets: HashSet<String>) -> Self {
        self.config.gazetteer = self.config.gazetteer.with_streets(streets);
        self
    }

    /// Set the zip table.
    pub fn zip_table(mut self, zips: HashMap<String, ZipInfo>) -> Self {
        self.config.gazetteer = self.config.gazetteer.with_zips(zips);
        self
    }

    /// Set the backend.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.config.backend = backend;
        self
    }

    /// Set the minimum geocoder confidence.
    pub fn required_confidence(mut self, required_confidence: f64) -> Self {
        self.config.required_confidence = required_confidence;
        self
    }

    /// Set the geocoding collaborator.
    pub fn geocoder(mut self, geocoder: impl Geocoder + 'static) -> Self {
        self.config.geocoder = Some(Arc::new(geocoder));
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ParserConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParserConfig::default();
        assert_eq!(config.backend, Backend::Default);
        assert_eq!(config.required_confidence, DEFAULT_REQUIRED_CONFIDENCE);
        assert!(config.geocoder.is_none());
        assert_eq!(config.gazetteer, Gazetteer::bundled());
    }

    #[test]
    fn test_builder_replaces_single_tables() {
        let config = ParserConfig::builder()
            .streets(HashSet::from(["broadway".to_string()]))
            .states(HashMap::from([("Wisconsin".to_string(), "WI".to_string())]))
            .build();
        assert!(config.gazetteer.is_street("Broadway"));
        assert_eq!(config.gazetteer.state_abbreviation("wisconsin").as_deref(), Some("WI"));
        assert_eq!(config.gazetteer.state_abbreviation("Ohio"), None);
        assert!(config.gazetteer.is_city("madison"));
    }

    #[test]
    fn test_builder_backend_and_geocoder() {
        let config = ParserConfig::builder()
            .backend("dstk".parse().unwrap())
            .geocoder(|_: &str| -> Result<Option<GeocodeRecord>> { Ok(None) })
            .required_confidence(0.9)
            .build();
        assert_eq!(config.backend, Backend::Geocode);
        assert_eq!(config.required_confidence, 0.9);
        assert!(config.geocoder.is_some());
        assert!(format!("{config:?}").contains("geocoder: true"));
    }

    #[test]
    fn test_configs_do_not_share_tables() {
        let custom = ParserConfig::builder().cities(HashSet::new()).build();
        let fresh = ParserConfig::default();
        assert!(!custom.gazetteer.is_city("madison"));
        assert!(fresh.gazetteer.is_city("madison"));
    }

    #[test]
    fn test_top_level_parse() {
        let address = parse("407 West Doty St. #2").unwrap();
        assert_eq!(address.secondary_designator(), Some("#2"));
    }
}
