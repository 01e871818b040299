//! Common types and enums for addrparse.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Which strategy the engine uses to turn a string into fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Backend {
    /// Right-to-left token classification against the gazetteer
    #[default]
    Default,
    /// Reconcile the structured return of an external geocoder
    Geocode,
}

impl Backend {
    /// Configuration name of this backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Default => "default",
            Backend::Geocode => "geocode",
        }
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Ok(Backend::Default),
            "geocode" | "dstk" => Ok(Backend::Geocode),
            other => Err(Error::config_error(format!(
                "backend must be either 'default' or 'geocode', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the zip table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZipInfo {
    /// Five digit zip code
    pub zip: String,
    /// Primary city name
    pub city: String,
    /// Two letter state abbreviation
    pub state: String,
    /// Latitude of the zip centroid
    pub lat: f64,
    /// Longitude of the zip centroid
    pub lng: f64,
    /// UTC offset in hours
    pub timezone: i32,
    /// Whether the zone observes daylight saving time
    pub dst: bool,
}

/// Structured return of an external geocoder for a single address.
///
/// Every field is optional: the reconciliation path decides which absences
/// are fatal.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GeocodeRecord {
    /// Geocoder confidence in the range 0-1
    pub confidence: Option<f64>,
    /// Street line as understood by the geocoder, without unit
    pub street_address: Option<String>,
    /// House number
    pub street_number: Option<String>,
    /// Street name
    pub street_name: Option<String>,
    /// City
    pub locality: Option<String>,
    /// State
    pub region: Option<String>,
    /// Latitude
    pub latitude: Option<f64>,
    /// Longitude
    pub longitude: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_conversion() {
        assert_eq!("default".parse::<Backend>().unwrap(), Backend::Default);
        assert_eq!("GEOCODE".parse::<Backend>().unwrap(), Backend::Geocode);
        assert_eq!("dstk".parse::<Backend>().unwrap(), Backend::Geocode);
        assert_eq!(Backend::Geocode.to_string(), "geocode");
    }

    #[test]
    fn test_unknown_backend() {
        let err = "nominatim".parse::<Backend>().unwrap_err();
        assert!(matches!(err, Error::ConfigError { .. }));
    }
}
