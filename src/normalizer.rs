//! Address token normalization.
//!
//! Used to compare an input address with a geocoder's rendering of it, where
//! "Street" and "St", or "North" and "N.", should count as the same token.

use std::collections::HashSet;

use crate::gazetteer::Gazetteer;

/// Normalizer over a borrowed gazetteer.
#[derive(Debug, Clone, Copy)]
pub struct AddressNormalizer<'a> {
    gazetteer: &'a Gazetteer,
}

impl<'a> AddressNormalizer<'a> {
    /// Create a normalizer backed by `gazetteer`.
    pub fn new(gazetteer: &'a Gazetteer) -> Self {
        Self { gazetteer }
    }

    /// Normalize a single token: suffixes become their lowercase
    /// abbreviation, directionals their lowercase letters, anything else is
    /// lowercased.
    pub fn normalize_token(&self, token: &str) -> String {
        let bare = token.replace('.', "");
        if let Some(suffix) = self.gazetteer.canonical_suffix(&bare) {
            return suffix.trim_end_matches('.').to_lowercase();
        }
        if let Some(direction) = self.gazetteer.canonical_prefix(&bare) {
            return direction.replace('.', "").to_lowercase();
        }
        token.to_lowercase()
    }

    /// Normalize every whitespace separated token of `input`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use addrparse::{AddressNormalizer, Gazetteer};
    ///
    /// let gazetteer = Gazetteer::bundled();
    /// let normalized = AddressNormalizer::new(&gazetteer).normalize("2 North Park Street");
    /// assert_eq!(normalized.tokens, vec!["2", "n", "park", "st"]);
    /// ```
    pub fn normalize(&self, input: &str) -> NormalizedAddress {
        NormalizedAddress {
            original: input.to_string(),
            tokens: input
                .split_whitespace()
                .map(|token| self.normalize_token(token))
                .collect(),
        }
    }

    /// Count the normalized tokens found on only one side.
    pub fn overlap(&self, original: &str, returned: &str) -> TokenOverlap {
        let original: HashSet<String> = self.normalize(original).tokens.into_iter().collect();
        let returned: HashSet<String> = self.normalize(returned).tokens.into_iter().collect();
        TokenOverlap {
            original_only: original.difference(&returned).count(),
            returned_only: returned.difference(&original).count(),
        }
    }
}

/// Result of address normalization.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalizedAddress {
    /// Original input string
    pub original: String,
    /// Normalized tokens in input order
    pub tokens: Vec<String>,
}

impl NormalizedAddress {
    /// Check if normalization produced any tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Get the number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

/// Tokens unique to each of two addresses after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenOverlap {
    /// Tokens only in the original input
    pub original_only: usize,
    /// Tokens only in the geocoder's rendering
    pub returned_only: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tokens() {
        let gazetteer = Gazetteer::bundled();
        let normalizer = AddressNormalizer::new(&gazetteer);
        assert_eq!(normalizer.normalize_token("Avenue"), "ave");
        assert_eq!(normalizer.normalize_token("St."), "st");
        assert_eq!(normalizer.normalize_token("Northwest"), "nw");
        assert_eq!(normalizer.normalize_token("N."), "n");
        assert_eq!(normalizer.normalize_token("Carroll"), "carroll");
    }

    #[test]
    fn test_normalized_address() {
        let gazetteer = Gazetteer::bundled();
        let normalized = AddressNormalizer::new(&gazetteer).normalize("416 N. Carroll St.");
        assert_eq!(normalized.len(), 4);
        assert!(!normalized.is_empty());
        assert_eq!(normalized.original, "416 N. Carroll St.");
    }

    #[test]
    fn test_overlap() {
        let gazetteer = Gazetteer::bundled();
        let normalizer = AddressNormalizer::new(&gazetteer);
        let overlap = normalizer.overlap("2 North Park Street Madison", "2 N Park St");
        assert_eq!(
            overlap,
            TokenOverlap {
                original_only: 1,
                returned_only: 0
            }
        );
    }
}
