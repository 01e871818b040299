//! Error types and handling for addrparse.

use crate::types::GeocodeRecord;

/// Result type alias for address parsing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for address parsing operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The address lacks a house number or street, or a geocode return
    /// failed one of its cross-checks against the input.
    #[error("Invalid address {address:?}: {message}")]
    InvalidAddress {
        /// What was wrong with the address
        message: String,
        /// The input that was being parsed
        address: String,
        /// Geocode return that caused the failure, if any
        record: Option<Box<GeocodeRecord>>,
    },

    /// The geocoder's confidence was below the configured threshold.
    #[error("Geocode confidence too low for {address:?}: required {required}, got {actual}")]
    LowConfidence {
        /// Configured threshold
        required: f64,
        /// Confidence reported by the geocoder
        actual: f64,
        /// The input that was being parsed
        address: String,
        /// Geocode return that caused the failure
        record: Box<GeocodeRecord>,
    },

    /// Engine configuration errors
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Error message
        message: String,
    },

    /// Reference data errors
    #[error("Data error: {message}")]
    DataError {
        /// Error message
        message: String,
    },

    /// Geocoding collaborator errors
    #[error("Geocoder error: {message}")]
    GeocoderError {
        /// Error message
        message: String,
    },

    /// I/O errors
    #[error("I/O error: {source}")]
    IoError {
        /// Source error
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a new invalid address error
    pub fn invalid_address(message: impl Into<String>, address: impl Into<String>) -> Self {
        Self::InvalidAddress {
            message: message.into(),
            address: address.into(),
            record: None,
        }
    }

    /// Create a new invalid address error caused by a geocode return
    pub fn invalid_geocode(
        message: impl Into<String>,
        address: impl Into<String>,
        record: &GeocodeRecord,
    ) -> Self {
        Self::InvalidAddress {
            message: message.into(),
            address: address.into(),
            record: Some(Box::new(record.clone())),
        }
    }

    /// Create a new low confidence error
    pub fn low_confidence(
        required: f64,
        actual: f64,
        address: impl Into<String>,
        record: &GeocodeRecord,
    ) -> Self {
        Self::LowConfidence {
            required,
            actual,
            address: address.into(),
            record: Box::new(record.clone()),
        }
    }

    /// Create a new configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new data error
    pub fn data_error(message: impl Into<String>) -> Self {
        Self::DataError {
            message: message.into(),
        }
    }

    /// Create a new geocoder error
    pub fn geocoder_error(message: impl Into<String>) -> Self {
        Self::GeocoderError {
            message: message.into(),
        }
    }

    /// The input string this error refers to, when it concerns one address.
    pub fn address(&self) -> Option<&str> {
        match self {
            Self::InvalidAddress { address, .. } | Self::LowConfidence { address, .. } => {
                Some(address.as_str())
            }
            _ => None,
        }
    }

    /// The geocode return attached to this error, if any.
    pub fn record(&self) -> Option<&GeocodeRecord> {
        match self {
            Self::InvalidAddress { record, .. } => record.as_deref(),
            Self::LowConfidence { record, .. } => Some(&**record),
            _ => None,
        }
    }
}
