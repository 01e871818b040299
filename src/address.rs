//! Address field model: the mutable per-parse state, the assignments
//! classifiers make to it, and the finished immutable address.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::gazetteer::Gazetteer;
use crate::types::ZipInfo;

/// A value a classifier wants written into a [`PartialAddress`].
///
/// Multi-word fields (street name, city) carry the full extended value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAssignment {
    /// Zip code as written
    Zip(String),
    /// Two letter state
    State(String),
    /// City, possibly extended with an earlier word
    City(String),
    /// Canonical `"Abbrev."` suffix
    StreetSuffix(String),
    /// House number
    PrimaryNumber(String),
    /// Canonical directional before the street name
    StreetPredirection(String),
    /// Street name, possibly extended with an earlier word
    StreetName(String),
    /// Unit, suite, apartment or room
    SecondaryDesignator(String),
    /// Token consumed without setting a field
    Noise,
}

/// Fields gathered while one address is being parsed.
///
/// Owned by a single parse call and discarded once finalized.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialAddress {
    /// House or building number
    pub primary_number: Option<String>,
    /// Street name without directionals or suffix
    pub street_name: Option<String>,
    /// Directional before the street name
    pub street_predirection: Option<String>,
    /// Directional after the street name
    pub street_postdirection: Option<String>,
    /// Canonical street suffix such as `"St."`
    pub street_suffix: Option<String>,
    /// Number part of the secondary unit
    pub secondary_number: Option<String>,
    /// Unit, suite, apartment or room
    pub secondary_designator: Option<String>,
    /// Subsequent designator, e.g. the room in "suite 300 room 7"
    pub extra_secondary_designator: Option<String>,
    /// Private mailbox marker
    pub pmb_designator: Option<String>,
    /// Private mailbox number
    pub pmb_number: Option<String>,
    /// City
    pub city: Option<String>,
    /// Two letter state
    pub state: Option<String>,
    /// Zip code, five digits with an optional plus four
    pub zip: Option<String>,
    /// Four digit zip extension
    pub plus4: Option<String>,
    /// Latitude, geocode path only
    pub lat: Option<f64>,
    /// Longitude, geocode path only
    pub lng: Option<f64>,
    /// Geocoder confidence, -1 when not geocoded
    pub confidence: f64,
    /// Some token could not be placed
    pub unmatched: bool,
    /// Comma separated segments in the cleaned input
    pub comma_segment_count: usize,
}

impl Default for PartialAddress {
    fn default() -> Self {
        Self {
            primary_number: None,
            street_name: None,
            street_predirection: None,
            street_postdirection: None,
            street_suffix: None,
            secondary_number: None,
            secondary_designator: None,
            extra_secondary_designator: None,
            pmb_designator: None,
            pmb_number: None,
            city: None,
            state: None,
            zip: None,
            plus4: None,
            lat: None,
            lng: None,
            confidence: -1.0,
            unmatched: false,
            comma_segment_count: 1,
        }
    }
}

impl PartialAddress {
    /// Start a parse with the preprocessor's designator candidate.
    pub fn new(secondary_designator: Option<String>, comma_segment_count: usize) -> Self {
        Self {
            secondary_designator,
            comma_segment_count,
            ..Self::default()
        }
    }

    /// Write a classifier's assignment into the matching field.
    pub fn apply(&mut self, assignment: FieldAssignment) {
        match assignment {
            FieldAssignment::Zip(zip) => self.zip = Some(zip),
            FieldAssignment::State(state) => self.state = Some(state),
            FieldAssignment::City(city) => self.city = Some(city),
            FieldAssignment::StreetSuffix(suffix) => self.street_suffix = Some(suffix),
            FieldAssignment::PrimaryNumber(number) => self.primary_number = Some(number),
            FieldAssignment::StreetPredirection(dir) => self.street_predirection = Some(dir),
            FieldAssignment::StreetName(street) => self.street_name = Some(street),
            FieldAssignment::SecondaryDesignator(unit) => self.secondary_designator = Some(unit),
            FieldAssignment::Noise => {}
        }
    }

    /// Check the required fields and freeze the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] when the house number is missing or
    /// not a positive integer, or the street name is missing.
    pub fn finalize(self, address: &str) -> Result<StructuredAddress> {
        let has_number = self.primary_number.as_deref().is_some_and(|number| {
            !number.is_empty()
                && number.chars().all(|c| c.is_ascii_digit())
                && number.chars().any(|c| c != '0')
        });
        if !has_number {
            return Err(Error::invalid_address(
                "Addresses must have house numbers",
                address,
            ));
        }
        if self.street_name.as_deref().is_none_or(str::is_empty) {
            return Err(Error::invalid_address("Addresses must have streets", address));
        }

        Ok(StructuredAddress {
            primary_number: self.primary_number.unwrap_or_default(),
            street_name: self.street_name.unwrap_or_default(),
            street_predirection: self.street_predirection,
            street_postdirection: self.street_postdirection,
            street_suffix: self.street_suffix,
            secondary_number: self.secondary_number,
            secondary_designator: self.secondary_designator,
            extra_secondary_designator: self.extra_secondary_designator,
            pmb_designator: self.pmb_designator,
            pmb_number: self.pmb_number,
            city: self.city,
            state: self.state,
            zip: self.zip,
            plus4: self.plus4,
            lat: self.lat,
            lng: self.lng,
            confidence: self.confidence,
            unmatched: self.unmatched,
        })
    }
}

/// A successfully parsed address.
///
/// `Display` renders the canonical single-line form, which parses back to
/// the same fields.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructuredAddress {
    primary_number: String,
    street_name: String,
    street_predirection: Option<String>,
    street_postdirection: Option<String>,
    street_suffix: Option<String>,
    secondary_number: Option<String>,
    secondary_designator: Option<String>,
    extra_secondary_designator: Option<String>,
    pmb_designator: Option<String>,
    pmb_number: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
    plus4: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
    confidence: f64,
    unmatched: bool,
}

impl StructuredAddress {
    /// House or building number (e.g. "416" for "416/418")
    pub fn primary_number(&self) -> &str {
        &self.primary_number
    }

    /// Street name (e.g. "Park")
    pub fn street_name(&self) -> &str {
        &self.street_name
    }

    /// Directional before the street name (e.g. "N.")
    pub fn street_predirection(&self) -> Option<&str> {
        self.street_predirection.as_deref()
    }

    /// Directional after the street suffix (e.g. "NE.")
    pub fn street_postdirection(&self) -> Option<&str> {
        self.street_postdirection.as_deref()
    }

    /// Canonical suffix (e.g. "St.")
    pub fn street_suffix(&self) -> Option<&str> {
        self.street_suffix.as_deref()
    }

    /// Number part of the secondary unit
    pub fn secondary_number(&self) -> Option<&str> {
        self.secondary_number.as_deref()
    }

    /// Unit, suite, apartment or room (e.g. "#2")
    pub fn secondary_designator(&self) -> Option<&str> {
        self.secondary_designator.as_deref()
    }

    /// Subsequent designator
    pub fn extra_secondary_designator(&self) -> Option<&str> {
        self.extra_secondary_designator.as_deref()
    }

    /// Private mailbox marker
    pub fn pmb_designator(&self) -> Option<&str> {
        self.pmb_designator.as_deref()
    }

    /// Private mailbox number
    pub fn pmb_number(&self) -> Option<&str> {
        self.pmb_number.as_deref()
    }

    /// City
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// Two letter state
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Zip code exactly as written in the input
    pub fn zip(&self) -> Option<&str> {
        self.zip.as_deref()
    }

    /// Four digit zip extension
    pub fn plus4(&self) -> Option<&str> {
        self.plus4.as_deref()
    }

    /// Latitude reported by the geocoder
    pub fn lat(&self) -> Option<f64> {
        self.lat
    }

    /// Longitude reported by the geocoder
    pub fn lng(&self) -> Option<f64> {
        self.lng
    }

    /// Geocoder confidence, -1 when the address was not geocoded
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Whether some input token could not be placed in any field.
    pub fn unmatched(&self) -> bool {
        self.unmatched
    }

    /// Zip table entry for this address's zip, if both exist.
    pub fn zip_info<'a>(&self, gazetteer: &'a Gazetteer) -> Option<&'a ZipInfo> {
        self.zip.as_deref().and_then(|zip| gazetteer.zip_info(zip))
    }

    /// Get all present components as a map keyed by field name.
    pub fn components(&self) -> HashMap<&'static str, String> {
        let mut map = HashMap::new();
        map.insert("primary_number", self.primary_number.clone());
        map.insert("street_name", self.street_name.clone());

        macro_rules! add_component {
            ($field:ident) => {
                if let Some(ref value) = self.$field {
                    map.insert(stringify!($field), value.clone());
                }
            };
        }

        add_component!(street_predirection);
        add_component!(street_postdirection);
        add_component!(street_suffix);
        add_component!(secondary_number);
        add_component!(secondary_designator);
        add_component!(extra_secondary_designator);
        add_component!(pmb_designator);
        add_component!(pmb_number);
        add_component!(city);
        add_component!(state);
        add_component!(zip);
        add_component!(plus4);

        map
    }
}

impl fmt::Display for StructuredAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.primary_number)?;
        if let Some(ref dir) = self.street_predirection {
            write!(f, " {dir}")?;
        }
        write!(f, " {}", self.street_name)?;
        for part in [&self.street_suffix, &self.secondary_designator]
            .into_iter()
            .flatten()
        {
            write!(f, " {part}")?;
        }
        if let Some(ref city) = self.city {
            write!(f, ", {city}")?;
        }
        if let Some(ref state) = self.state {
            write!(f, ", {state}")?;
        }
        if let Some(ref zip) = self.zip {
            write!(f, " {zip}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn partial() -> PartialAddress {
        let mut partial = PartialAddress::new(Some("#2".to_string()), 3);
        partial.apply(FieldAssignment::PrimaryNumber("2".to_string()));
        partial.apply(FieldAssignment::StreetPredirection("N.".to_string()));
        partial.apply(FieldAssignment::StreetName("Park".to_string()));
        partial.apply(FieldAssignment::StreetSuffix("St.".to_string()));
        partial.apply(FieldAssignment::City("Madison".to_string()));
        partial.apply(FieldAssignment::State("WI".to_string()));
        partial.apply(FieldAssignment::Zip("53703".to_string()));
        partial
    }

    #[test]
    fn test_partial_defaults() {
        let partial = PartialAddress::default();
        assert_eq!(partial.confidence, -1.0);
        assert!(!partial.unmatched);
        assert_eq!(partial.comma_segment_count, 1);
    }

    #[test]
    fn test_noise_changes_nothing() {
        let mut partial = PartialAddress::default();
        partial.apply(FieldAssignment::Noise);
        assert_eq!(partial, PartialAddress::default());
    }

    #[test]
    fn test_finalize_and_render() {
        let address = partial().finalize("input").unwrap();
        assert_eq!(address.primary_number(), "2");
        assert_eq!(address.secondary_designator(), Some("#2"));
        assert_eq!(address.confidence(), -1.0);
        assert_eq!(address.to_string(), "2 N. Park St. #2, Madison, WI 53703");
    }

    #[test]
    fn test_finalize_requires_number() {
        let mut partial = partial();
        partial.primary_number = None;
        assert_matches!(partial.finalize("Park St"), Err(Error::InvalidAddress { .. }));
    }

    #[test]
    fn test_finalize_requires_positive_number() {
        let mut zero = partial();
        zero.primary_number = Some("0".to_string());
        assert_matches!(zero.finalize("0 Park St"), Err(Error::InvalidAddress { .. }));

        let mut text = partial();
        text.primary_number = Some("twelve".to_string());
        assert_matches!(text.finalize("twelve Park St"), Err(Error::InvalidAddress { .. }));
    }

    #[test]
    fn test_finalize_accepts_any_length_number() {
        let mut long = partial();
        long.primary_number = Some("000123456789012345678901234".to_string());
        let address = long.finalize("input").unwrap();
        assert_eq!(address.primary_number(), "000123456789012345678901234");

        let mut zeros = partial();
        zeros.primary_number = Some("000".to_string());
        assert_matches!(zeros.finalize("000 Park St"), Err(Error::InvalidAddress { .. }));
    }

    #[test]
    fn test_finalize_requires_street() {
        let mut partial = partial();
        partial.street_name = Some(String::new());
        let err = partial.finalize("2 St").unwrap_err();
        assert_eq!(err.address(), Some("2 St"));
        assert!(err.to_string().contains("streets"));
    }

    #[test]
    fn test_components_skip_missing_fields() {
        let mut partial = partial();
        partial.city = None;
        let components = partial.finalize("input").unwrap().components();
        assert_eq!(components.get("street_name"), Some(&"Park".to_string()));
        assert_eq!(components.get("zip"), Some(&"53703".to_string()));
        assert!(!components.contains_key("city"));
    }

    #[test]
    fn test_zip_info_lookup() {
        let gazetteer = Gazetteer::bundled();
        let address = partial().finalize("input").unwrap();
        assert_eq!(address.zip_info(&gazetteer).map(|z| z.city.as_str()), Some("Madison"));
    }
}
