//! Right-to-left token classification.
//!
//! Each stage of [`CHAIN`] is a pure function of the token, the fields found
//! so far and the gazetteer. Stages run in priority order and the first one
//! that returns an assignment claims the token. Every stage declines when its
//! target field is already filled, except the city and street stages, which
//! may extend a multi-word value with the word in front of it.

use std::sync::LazyLock;

use regex::Regex;

use crate::address::{FieldAssignment, PartialAddress};
use crate::gazetteer::{Gazetteer, capitalize, title_case};

/// Signature shared by every classification stage.
pub type Classifier = fn(&str, &PartialAddress, &Gazetteer) -> Option<FieldAssignment>;

/// Classification stages in priority order. [`guess`] runs after all of them.
pub const CHAIN: [(&str, Classifier); 7] = [
    ("zip", zip),
    ("state", state),
    ("city", city),
    ("street_suffix", street_suffix),
    ("house_number", house_number),
    ("street_prefix", street_prefix),
    ("street", street),
];

/// Abbreviated spellings tried when a city word fails to extend the city as is.
const CITY_SYNONYMS: [(&str, &str); 6] = [
    ("saint", "st."),
    ("st", "st."),
    ("mount", "mt."),
    ("mt", "mt."),
    ("fort", "ft."),
    ("ft", "ft."),
];

static ZIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-?\d{0,4})?").expect("valid zip regex"));

static HOUSE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)([-/]?)(\d*)$").expect("valid house number regex"));

/// Five digits, optionally followed by up to four more with or without a dash.
pub fn zip(token: &str, partial: &PartialAddress, _: &Gazetteer) -> Option<FieldAssignment> {
    if partial.zip.is_some() || !ZIP.is_match(token) {
        return None;
    }
    Some(FieldAssignment::Zip(token.to_string()))
}

/// Two letter tokens are checked against the state table unconditionally;
/// longer ones only before a suffix and when the address has comma segments.
pub fn state(token: &str, partial: &PartialAddress, gazetteer: &Gazetteer) -> Option<FieldAssignment> {
    if partial.state.is_some() {
        return None;
    }
    let two_letters = token.chars().count() == 2;
    let separated = partial.street_suffix.is_none() && partial.comma_segment_count > 1;
    if !two_letters && !separated {
        return None;
    }
    gazetteer.state_abbreviation(token).map(FieldAssignment::State)
}

/// Cities follow the state, or sit in their own comma segment when no unit
/// was extracted. A known city may then grow by the word before it.
pub fn city(token: &str, partial: &PartialAddress, gazetteer: &Gazetteer) -> Option<FieldAssignment> {
    if partial.street_suffix.is_some() {
        return None;
    }

    let Some(current) = partial.city.as_deref() else {
        let after_state = partial.state.is_some();
        let separated =
            partial.secondary_designator.is_none() && partial.comma_segment_count > 1;
        if (after_state || separated) && gazetteer.is_city(token) {
            return Some(FieldAssignment::City(title_case(&token.to_lowercase())));
        }
        return None;
    };

    // Multi-word cities grow leftwards, one word at a time.
    if partial.street_name.is_some() {
        return None;
    }
    let word = token.to_lowercase();
    let current = current.to_lowercase();
    let candidate = format!("{word} {current}");
    if gazetteer.is_city(&candidate) {
        return Some(FieldAssignment::City(title_case(&candidate)));
    }
    let (_, short) = CITY_SYNONYMS.iter().find(|(long, _)| *long == word)?;
    let candidate = format!("{short} {current}");
    gazetteer
        .is_city(&candidate)
        .then(|| FieldAssignment::City(title_case(&candidate)))
}

/// Long forms and abbreviations both canonicalise to `"Abbrev."`.
pub fn street_suffix(
    token: &str,
    partial: &PartialAddress,
    gazetteer: &Gazetteer,
) -> Option<FieldAssignment> {
    if partial.street_suffix.is_some() || partial.street_name.is_some() {
        return None;
    }
    gazetteer
        .canonical_suffix(token)
        .map(FieldAssignment::StreetSuffix)
}

/// Only considered once a street is known. For ranges such as `416/418` or
/// `12-14` the first number is kept.
pub fn house_number(token: &str, partial: &PartialAddress, _: &Gazetteer) -> Option<FieldAssignment> {
    if partial.street_name.is_none() || partial.primary_number.is_some() {
        return None;
    }
    let captures = HOUSE_NUMBER.captures(token)?;
    Some(FieldAssignment::PrimaryNumber(captures[1].to_string()))
}

/// A directional in front of a known street.
pub fn street_prefix(
    token: &str,
    partial: &PartialAddress,
    gazetteer: &Gazetteer,
) -> Option<FieldAssignment> {
    if partial.street_name.is_none() || partial.street_predirection.is_some() {
        return None;
    }
    gazetteer
        .canonical_prefix(token)
        .map(|prefix| FieldAssignment::StreetPredirection(prefix.to_string()))
}

/// Words between a suffix and the prefix or house number form the street
/// name. Without a suffix, only names from the street table are accepted.
pub fn street(token: &str, partial: &PartialAddress, gazetteer: &Gazetteer) -> Option<FieldAssignment> {
    let open = partial.street_suffix.is_some()
        && partial.street_predirection.is_none()
        && partial.primary_number.is_none();
    if open {
        let word = capitalize(token);
        return Some(FieldAssignment::StreetName(match partial.street_name {
            Some(ref street) => format!("{word} {street}"),
            None => word,
        }));
    }
    if partial.street_suffix.is_none() && partial.street_name.is_none() && gazetteer.is_street(token) {
        return Some(FieldAssignment::StreetName(token.to_string()));
    }
    None
}

/// Fallback for tokens no stage claimed.
///
/// "apt" is left for the apartment pass, a lone dash is swallowed, and a
/// word of three or more letters becomes the street when nothing of the
/// street has been seen yet.
pub fn guess(token: &str, partial: &PartialAddress, _: &Gazetteer) -> Option<FieldAssignment> {
    let lower = token.to_lowercase();
    if lower == "apt" || lower == "apartment" {
        return None;
    }
    if token.trim() == "-" {
        return Some(FieldAssignment::Noise);
    }
    if token.chars().count() <= 2 {
        return None;
    }
    let nothing_yet = partial.street_suffix.is_none()
        && partial.street_name.is_none()
        && partial.street_predirection.is_none()
        && partial.primary_number.is_none();
    if nothing_yet && token.starts_with(|c: char| c.is_ascii_alphabetic()) {
        tracing::trace!(token, "Guessing suffix-less street");
        return Some(FieldAssignment::StreetName(capitalize(token)));
    }
    None
}

/// Run the chain, then the guesser, over a single token.
///
/// Returns the name of the claiming stage with its assignment.
pub fn classify(
    token: &str,
    partial: &PartialAddress,
    gazetteer: &Gazetteer,
) -> Option<(&'static str, FieldAssignment)> {
    CHAIN
        .iter()
        .find_map(|(name, stage)| stage(token, partial, gazetteer).map(|a| (*name, a)))
        .or_else(|| guess(token, partial, gazetteer).map(|a| ("guess", a)))
}

/// Classify tail-first tokens into `partial`, returning the unclaimed ones
/// in the order they were seen.
pub fn scan(tokens: &[String], partial: &mut PartialAddress, gazetteer: &Gazetteer) -> Vec<String> {
    let mut unmatched = Vec::new();
    for token in tokens {
        match classify(token, partial, gazetteer) {
            Some((stage, assignment)) => {
                tracing::trace!(token = token.as_str(), stage, "Token claimed");
                partial.apply(assignment);
            }
            None => unmatched.push(token.clone()),
        }
    }
    unmatched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn scan_address(address: &str) -> (PartialAddress, Vec<String>) {
        let gazetteer = Gazetteer::bundled();
        let tokens = tokenize(address);
        let mut partial = PartialAddress::new(None, tokens.comma_segment_count);
        let unmatched = scan(&tokens.reversed, &mut partial, &gazetteer);
        (partial, unmatched)
    }

    #[test]
    fn test_chain_order() {
        let names: Vec<&str> = CHAIN.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec!["zip", "state", "city", "street_suffix", "house_number", "street_prefix", "street"]
        );
    }

    #[test]
    fn test_zip_patterns() {
        let gazetteer = Gazetteer::bundled();
        let partial = PartialAddress::default();
        for token in ["53703", "53703-0000", "537030000", "53703-"] {
            assert_eq!(
                zip(token, &partial, &gazetteer),
                Some(FieldAssignment::Zip(token.to_string()))
            );
        }
        assert_eq!(zip("5370", &partial, &gazetteer), None);
        assert_eq!(zip("WI", &partial, &gazetteer), None);

        let filled = PartialAddress {
            zip: Some("53703".to_string()),
            ..Default::default()
        };
        assert_eq!(zip("53704", &filled, &gazetteer), None);
    }

    #[test]
    fn test_state_needs_two_letters_or_commas() {
        let gazetteer = Gazetteer::bundled();
        let plain = PartialAddress::default();
        assert_eq!(
            state("wi", &plain, &gazetteer),
            Some(FieldAssignment::State("WI".to_string()))
        );
        // A street named after a state stays a street without commas.
        assert_eq!(state("Washington", &plain, &gazetteer), None);

        let separated = PartialAddress::new(None, 3);
        assert_eq!(
            state("Wisconsin", &separated, &gazetteer),
            Some(FieldAssignment::State("WI".to_string()))
        );
    }

    #[test]
    fn test_city_after_state() {
        let gazetteer = Gazetteer::bundled();
        let partial = PartialAddress {
            state: Some("WI".to_string()),
            ..Default::default()
        };
        assert_eq!(
            city("MADISON", &partial, &gazetteer),
            Some(FieldAssignment::City("Madison".to_string()))
        );
        assert_eq!(city("Johnson", &partial, &gazetteer), None);
    }

    #[test]
    fn test_city_extension_and_synonyms() {
        let gazetteer = Gazetteer::bundled();
        let partial = PartialAddress {
            state: Some("MN".to_string()),
            city: Some("Paul".to_string()),
            ..Default::default()
        };
        assert_eq!(
            city("Saint", &partial, &gazetteer),
            Some(FieldAssignment::City("St. Paul".to_string()))
        );
        assert_eq!(city("Main", &partial, &gazetteer), None);
    }

    #[test]
    fn test_house_number_takes_first_of_range() {
        let gazetteer = Gazetteer::bundled();
        let partial = PartialAddress {
            street_name: Some("Carroll".to_string()),
            ..Default::default()
        };
        for (token, expected) in [("416/418", "416"), ("12-14", "12"), ("7", "7")] {
            assert_eq!(
                house_number(token, &partial, &gazetteer),
                Some(FieldAssignment::PrimaryNumber(expected.to_string()))
            );
        }
        assert_eq!(house_number("12A", &partial, &gazetteer), None);
        assert_eq!(house_number("7", &PartialAddress::default(), &gazetteer), None);
    }

    #[test]
    fn test_guess_rules() {
        let gazetteer = Gazetteer::bundled();
        let partial = PartialAddress::default();
        assert_eq!(guess("Apt", &partial, &gazetteer), None);
        assert_eq!(guess("-", &partial, &gazetteer), Some(FieldAssignment::Noise));
        assert_eq!(guess("Ab", &partial, &gazetteer), None);
        assert_eq!(guess("123", &partial, &gazetteer), None);
        assert_eq!(
            guess("LAKELAWN", &partial, &gazetteer),
            Some(FieldAssignment::StreetName("Lakelawn".to_string()))
        );
    }

    #[test]
    fn test_scan_full_address() {
        let (partial, unmatched) = scan_address("2 N. Park Street, Madison, WI 53703");
        assert!(unmatched.is_empty());
        assert_eq!(partial.primary_number.as_deref(), Some("2"));
        assert_eq!(partial.street_predirection.as_deref(), Some("N."));
        assert_eq!(partial.street_name.as_deref(), Some("Park"));
        assert_eq!(partial.street_suffix.as_deref(), Some("St."));
        assert_eq!(partial.city.as_deref(), Some("Madison"));
        assert_eq!(partial.state.as_deref(), Some("WI"));
        assert_eq!(partial.zip.as_deref(), Some("53703"));
    }

    #[test]
    fn test_scan_multi_word_street() {
        let (partial, _) = scan_address("1600 Martin Luther King Blvd");
        assert_eq!(partial.street_name.as_deref(), Some("Martin Luther King"));
        assert_eq!(partial.street_suffix.as_deref(), Some("Blvd."));
        assert_eq!(partial.primary_number.as_deref(), Some("1600"));
    }

    #[test]
    fn test_scan_street_table() {
        let gazetteer = Gazetteer::bundled()
            .with_streets(std::collections::HashSet::from(["broadway".to_string()]));
        let tokens = tokenize("1200 Broadway");
        let mut partial = PartialAddress::new(None, tokens.comma_segment_count);
        let unmatched = scan(&tokens.reversed, &mut partial, &gazetteer);
        assert!(unmatched.is_empty());
        assert_eq!(partial.street_name.as_deref(), Some("Broadway"));
        assert_eq!(partial.primary_number.as_deref(), Some("1200"));
    }

    #[test]
    fn test_scan_leaves_unclaimed_tokens() {
        let (partial, unmatched) = scan_address("1200 120th Pl NE, Kirkland, WA");
        assert_eq!(unmatched, vec!["NE"]);
        assert_eq!(partial.street_name.as_deref(), Some("120th"));
        assert_eq!(partial.city.as_deref(), Some("Kirkland"));
    }
}
