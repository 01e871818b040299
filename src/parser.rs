//! The address parsing engine.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::ParserConfig;
use crate::address::{PartialAddress, StructuredAddress};
use crate::apartment;
use crate::classifier;
use crate::error::{Error, Result};
use crate::gazetteer::Gazetteer;
use crate::geocode::Geocoder;
use crate::preprocess::preprocess;
use crate::reconcile::Reconciler;
use crate::tokenizer::tokenize;
use crate::types::{Backend, GeocodeRecord, ZipInfo};

/// Parses free-form US addresses into [`StructuredAddress`] values.
///
/// The gazetteer is fixed at construction, so one parser can be shared
/// freely between threads.
#[derive(Clone)]
pub struct AddressParser {
    gazetteer: Gazetteer,
    backend: Backend,
    required_confidence: f64,
    geocoder: Option<Arc<dyn Geocoder>>,
}

impl AddressParser {
    /// Create a parser over the bundled tables with the default backend.
    pub fn new() -> Self {
        let config = ParserConfig::default();
        Self {
            gazetteer: config.gazetteer,
            backend: config.backend,
            required_confidence: config.required_confidence,
            geocoder: None,
        }
    }

    /// Create a parser from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] when the geocode backend is selected
    /// without a geocoder.
    ///
    /// # Example
    ///
    /// ```rust
    /// use addrparse::{AddressParser, ParserConfig};
    /// use std::collections::HashSet;
    ///
    /// let config = ParserConfig::builder()
    ///     .streets(HashSet::from(["broadway".to_string()]))
    ///     .build();
    /// let parser = AddressParser::with_config(config)?;
    /// assert_eq!(parser.parse("1200 Broadway")?.street_name(), "Broadway");
    /// # Ok::<(), addrparse::Error>(())
    /// ```
    pub fn with_config(config: ParserConfig) -> Result<Self> {
        if config.backend == Backend::Geocode && config.geocoder.is_none() {
            return Err(Error::config_error(
                "The geocode backend needs a geocoder",
            ));
        }
        let stats = config.gazetteer.stats();
        tracing::debug!(
            backend = %config.backend,
            suffixes = stats.suffixes,
            cities = stats.cities,
            streets = stats.streets,
            zips = stats.zips,
            "Creating address parser"
        );
        Ok(Self {
            gazetteer: config.gazetteer,
            backend: config.backend,
            required_confidence: config.required_confidence,
            geocoder: config.geocoder,
        })
    }

    /// Create a default-backend parser over tables loaded from `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tables cannot be read or parsed.
    #[cfg(feature = "runtime-data")]
    pub async fn from_data_dir<P: AsRef<std::path::Path>>(data_dir: P) -> Result<Self> {
        let gazetteer = crate::data::DataManager::with_data_dir(data_dir).load().await?;
        Self::with_config(ParserConfig::builder().gazetteer(gazetteer).build())
    }

    /// Reference tables this parser classifies against.
    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    /// Backend selected at construction.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Parse an address string into structured fields.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidAddress`] when no house number or street name can be
    ///   established, or when a geocode return fails reconciliation.
    /// - [`Error::LowConfidence`] when the geocoder is not confident enough.
    /// - [`Error::GeocoderError`] when the geocoder itself fails.
    ///
    /// # Example
    ///
    /// ```rust
    /// use addrparse::AddressParser;
    ///
    /// let parser = AddressParser::new();
    /// let address = parser.parse("2 N. Park Street, Madison, WI 53703")?;
    /// assert_eq!(address.street_name(), "Park");
    /// assert_eq!(address.to_string(), "2 N. Park St., Madison, WI 53703");
    /// # Ok::<(), addrparse::Error>(())
    /// ```
    pub fn parse(&self, address: &str) -> Result<StructuredAddress> {
        match (self.backend, self.geocoder.as_deref()) {
            (Backend::Geocode, Some(geocoder)) => {
                let cleaned = preprocess(address).cleaned;
                match geocoder.geocode(&cleaned)? {
                    Some(record) => self.parse_with_record(address, &record),
                    None => Err(Error::invalid_address(
                        "Geocoder returned no result",
                        address,
                    )),
                }
            }
            _ => self.classify(address),
        }
    }

    /// Reconcile an already fetched geocode record with `address`.
    ///
    /// Works under either backend.
    ///
    /// # Errors
    ///
    /// Same as the geocode path of [`AddressParser::parse`].
    pub fn parse_with_record(
        &self,
        address: &str,
        record: &GeocodeRecord,
    ) -> Result<StructuredAddress> {
        let preprocessed = preprocess(address);
        let partial = Reconciler::new(&self.gazetteer, self.required_confidence)
            .reconcile(
                address,
                &preprocessed.cleaned,
                preprocessed.secondary_designator,
                record,
            )
            .inspect_err(|e| tracing::debug!(address, error = %e, "Geocode return rejected"))?;
        partial.finalize(address)
    }

    /// Geocode and parse a batch with a single geocoder call.
    ///
    /// Results are keyed by the input strings. An address the geocoder had no
    /// answer for gets its own [`Error::InvalidAddress`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] under the default backend, and the
    /// geocoder's error if the batch call itself fails.
    pub fn parse_many(
        &self,
        addresses: &[&str],
    ) -> Result<HashMap<String, Result<StructuredAddress>>> {
        let (Backend::Geocode, Some(geocoder)) = (self.backend, self.geocoder.as_deref()) else {
            return Err(Error::config_error(
                "parse_many is only available with the geocode backend",
            ));
        };

        let records = geocoder.geocode_many(addresses)?;
        tracing::debug!(
            requested = addresses.len(),
            returned = records.len(),
            "Batch geocoded"
        );

        Ok(addresses
            .iter()
            .map(|&address| {
                let parsed = match records.get(address).and_then(Option::as_ref) {
                    Some(record) => self.parse_with_record(address, record),
                    None => Err(Error::invalid_address(
                        "Geocoder returned no result",
                        address,
                    )),
                };
                (address.to_string(), parsed)
            })
            .collect())
    }

    /// Parse addresses one after another, keeping input order.
    pub fn parse_batch(&self, addresses: &[&str]) -> Vec<Result<StructuredAddress>> {
        addresses.iter().map(|address| self.parse(address)).collect()
    }

    /// Parse addresses on the rayon thread pool, keeping input order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use addrparse::AddressParser;
    ///
    /// let parser = AddressParser::new();
    /// let results = parser.parse_batch_parallel(&[
    ///     "416/418 N. Carroll St.",
    ///     "Park Street, Madison, WI 53703",
    /// ]);
    /// assert!(results[0].is_ok());
    /// assert!(results[1].is_err());
    /// ```
    #[cfg(feature = "parallel")]
    pub fn parse_batch_parallel(&self, addresses: &[&str]) -> Vec<Result<StructuredAddress>> {
        use rayon::prelude::*;

        addresses
            .par_iter()
            .map(|address| self.parse(address))
            .collect()
    }

    /// Zip table entry for the first five digits of `zip`.
    pub fn zip_info(&self, zip: &str) -> Option<&ZipInfo> {
        self.gazetteer.zip_info(zip)
    }

    fn classify(&self, address: &str) -> Result<StructuredAddress> {
        let preprocessed = preprocess(address);
        let tokens = tokenize(&preprocessed.cleaned);
        let mut partial =
            PartialAddress::new(preprocessed.secondary_designator, tokens.comma_segment_count);

        let leftover = classifier::scan(&tokens.reversed, &mut partial, &self.gazetteer);
        apartment::resolve_unmatched(&leftover, &mut partial);
        if partial.unmatched {
            tracing::debug!(address, leftover = ?leftover, "Address has unmatched tokens");
        }
        partial.finalize(address)
    }
}

impl Default for AddressParser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AddressParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressParser")
            .field("backend", &self.backend)
            .field("required_confidence", &self.required_confidence)
            .field("gazetteer", &self.gazetteer.stats())
            .field("geocoder", &self.geocoder.is_some())
            .finish()
    }
}
