//! External geocoding collaborator.
//!
//! The engine never geocodes anything itself. Under [`Backend::Geocode`] it
//! asks a [`Geocoder`] for a structured interpretation and then validates it
//! against the input (see [`crate::reconcile`]).
//!
//! [`Backend::Geocode`]: crate::Backend::Geocode

use std::collections::HashMap;

use crate::error::Result;
use crate::types::GeocodeRecord;

/// A geocoding service, called synchronously from the parse path.
///
/// `Ok(None)` means the service had no usable answer for the address.
/// Timeouts and retries are the implementation's business.
pub trait Geocoder: Send + Sync {
    /// Geocode a single address.
    fn geocode(&self, address: &str) -> Result<Option<GeocodeRecord>>;

    /// Geocode a batch, keyed by the exact input strings.
    ///
    /// The default implementation calls [`Geocoder::geocode`] once per
    /// address; services with a batch endpoint should override it.
    fn geocode_many(&self, addresses: &[&str]) -> Result<HashMap<String, Option<GeocodeRecord>>> {
        addresses
            .iter()
            .map(|address| Ok((address.to_string(), self.geocode(address)?)))
            .collect()
    }
}

impl<F> Geocoder for F
where
    F: Fn(&str) -> Result<Option<GeocodeRecord>> + Send + Sync,
{
    fn geocode(&self, address: &str) -> Result<Option<GeocodeRecord>> {
        self(address)
    }
}

/// Client for a Data Science Toolkit `street2coordinates` endpoint.
#[cfg(feature = "dstk")]
#[derive(Debug, Clone)]
pub struct DstkClient {
    api_base: String,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "dstk")]
impl DstkClient {
    /// Create a client for the server at `api_base`, e.g. `http://localhost:8080`.
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Base URL of the server.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn street2coordinates(
        &self,
        addresses: &[&str],
    ) -> Result<HashMap<String, Option<GeocodeRecord>>> {
        use crate::error::Error;

        let url = format!("{}/street2coordinates", self.api_base);
        tracing::debug!(count = addresses.len(), %url, "Sending addresses to DSTK");

        let response = self
            .client
            .post(&url)
            .json(addresses)
            .send()
            .map_err(|e| Error::geocoder_error(format!("Request to {url} failed: {e}")))?;
        if !response.status().is_success() {
            return Err(Error::geocoder_error(format!(
                "DSTK returned status: {}",
                response.status()
            )));
        }
        let body = response
            .text()
            .map_err(|e| Error::geocoder_error(format!("Failed to read response: {e}")))?;
        let records: HashMap<String, Option<GeocodeRecord>> = serde_json::from_str(&body)
            .map_err(|e| Error::geocoder_error(format!("Malformed DSTK response: {e}")))?;

        tracing::debug!(count = records.len(), "Received addresses from DSTK");
        Ok(records)
    }
}

#[cfg(feature = "dstk")]
impl Geocoder for DstkClient {
    fn geocode(&self, address: &str) -> Result<Option<GeocodeRecord>> {
        let mut records = self.street2coordinates(&[address])?;
        Ok(records.remove(address).flatten())
    }

    fn geocode_many(&self, addresses: &[&str]) -> Result<HashMap<String, Option<GeocodeRecord>>> {
        self.street2coordinates(addresses)
    }
}
