//! Turning a geocoder's structured return into address fields.
//!
//! Geocoders will happily answer with a house number or city that never
//! appeared in the input, so every piece taken from the return is checked
//! against the (preprocessed) input before it is accepted.

use crate::address::PartialAddress;
use crate::error::{Error, Result};
use crate::gazetteer::Gazetteer;
use crate::normalizer::AddressNormalizer;
use crate::types::GeocodeRecord;

/// Validates and decomposes geocode returns against one gazetteer.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler<'a> {
    gazetteer: &'a Gazetteer,
    required_confidence: f64,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler rejecting returns below `required_confidence`.
    pub fn new(gazetteer: &'a Gazetteer, required_confidence: f64) -> Self {
        Self {
            gazetteer,
            required_confidence,
        }
    }

    /// Reconcile `record` with `address`.
    ///
    /// `address` is the preprocessed input and `secondary_designator` the
    /// unit the preprocessor pulled out of it. `original` is only used to
    /// label errors.
    ///
    /// # Errors
    ///
    /// - [`Error::LowConfidence`] when the confidence is under the threshold;
    ///   nothing else is looked at in that case.
    /// - [`Error::InvalidAddress`] when the confidence is missing, the street
    ///   address is empty, the number or street name is missing, the number,
    ///   city or derived street cannot be found in the input, or the street
    ///   appears after the city.
    pub fn reconcile(
        &self,
        original: &str,
        address: &str,
        secondary_designator: Option<String>,
        record: &GeocodeRecord,
    ) -> Result<PartialAddress> {
        let fail = |message: String| Error::invalid_geocode(message, original, record);

        let confidence = record
            .confidence
            .ok_or_else(|| fail("Geocode return has no confidence".to_string()))?;
        if confidence < self.required_confidence {
            return Err(Error::low_confidence(
                self.required_confidence,
                confidence,
                original,
                record,
            ));
        }

        let street_address = record
            .street_address
            .as_deref()
            .filter(|street| !street.is_empty())
            .ok_or_else(|| fail("Empty street address in geocode return".to_string()))?;
        let (Some(number), Some(_)) = (record.street_number.as_deref(), record.street_name.as_deref())
        else {
            return Err(fail("House number or street name missing in geocode return".to_string()));
        };

        if !address.contains(number) {
            return Err(fail(format!(
                "Geocoder returned house number {number:?} not in the original address"
            )));
        }
        if let Some(ref locality) = record.locality {
            if !address.contains(locality.as_str()) {
                return Err(fail(format!(
                    "Geocoder returned city {locality:?} not in the original address"
                )));
            }
        }

        let overlap = AddressNormalizer::new(self.gazetteer).overlap(address, street_address);
        tracing::debug!(
            confidence,
            original_only = overlap.original_only,
            returned_only = overlap.returned_only,
            "Reconciling geocode return"
        );

        let mut partial = PartialAddress {
            primary_number: Some(number.to_string()),
            secondary_designator,
            city: record.locality.clone(),
            state: record.region.clone(),
            lat: record.latitude,
            lng: record.longitude,
            confidence,
            ..PartialAddress::default()
        };

        let street_line = match partial.secondary_designator {
            Some(ref unit) if !unit.is_empty() => street_address.replace(unit.as_str(), ""),
            _ => street_address.to_string(),
        };
        let mut words: Vec<&str> = street_line.split_whitespace().collect();
        if words.is_empty() {
            return Err(fail(format!("Could not split street address {street_address:?}")));
        }
        if words[0] == number {
            words.remove(0);
        }
        if let Some(suffix) = words.last().and_then(|last| self.gazetteer.canonical_suffix(last)) {
            partial.street_suffix = Some(suffix);
            words.pop();
        }
        if let Some(prefix) = words.first().and_then(|first| self.gazetteer.canonical_prefix(first)) {
            partial.street_predirection = Some(prefix.to_string());
            words.remove(0);
        }
        let street_name = words.join(" ");

        let Some(street_start) = address.find(&street_name) else {
            return Err(fail(format!(
                "Geocoder picked a street not in the original address: {street_name:?}"
            )));
        };
        if let Some(ref city) = partial.city {
            let Some(city_start) = address.find(city.as_str()) else {
                return Err(fail(format!(
                    "Geocoder picked a city not in the original address: {city:?}"
                )));
            };
            if city_start < street_start + street_name.len() {
                return Err(fail(format!(
                    "Geocoder picked a street that comes after the city. Street: {street_name:?}, city: {city:?}"
                )));
            }
        }

        partial.street_name = Some(street_name);
        Ok(partial)
    }
}
