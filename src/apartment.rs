//! Second pass over the tokens the classifier chain left behind.
//!
//! The patterns here are broad (any one or two character token qualifies),
//! so they only ever see tokens nothing else wanted.

use std::sync::LazyLock;

use regex::Regex;

use crate::address::{FieldAssignment, PartialAddress};

/// Unit patterns in priority order, anchored at the start of the lowercase token.
const UNIT_PATTERNS: [&str; 16] = [
    r"#\w+ & \w+",
    r"#\w+ rm \w+",
    r"#\w+-\w",
    r"apt #{0,1}\w+",
    r"apartment #{0,1}\w+",
    r"#\w+",
    r"# \w+",
    r"rm \w+",
    r"unit #?\w+",
    r"units #?\w+",
    r"- #{0,1}\w+",
    r"no\s?\d+\w*",
    r"style\s\w{1,2}",
    r"\d{1,4}/\d{1,4}",
    r"\d{1,4}",
    r"\w{1,2}",
];

static UNITS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    UNIT_PATTERNS
        .iter()
        .map(|pattern| Regex::new(&format!("^(?:{pattern})")).expect("valid unit regex"))
        .collect()
});

static LOOSE_UNIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d?\w?").expect("valid loose unit regex"));

/// Decide what, if anything, a leftover token is.
///
/// A match always replaces whatever designator is already set, including
/// the one the preprocessor extracted.
pub fn resolve(token: &str, partial: &PartialAddress) -> Option<FieldAssignment> {
    let lower = token.to_lowercase();
    if let Some(ref unit) = partial.secondary_designator {
        if lower == "apt" || lower == "apartment" {
            return Some(FieldAssignment::SecondaryDesignator(format!("{token} {unit}")));
        }
    }

    if UNITS.iter().any(|unit| unit.is_match(&lower)) {
        return Some(FieldAssignment::SecondaryDesignator(token.to_string()));
    }

    let no_street = partial.street_suffix.is_none() && partial.street_name.is_none();
    if no_street && partial.secondary_designator.is_none() && LOOSE_UNIT.is_match(&lower) {
        return Some(FieldAssignment::SecondaryDesignator(token.to_string()));
    }
    None
}

/// Resolve every leftover token in order, flagging the address as
/// unmatched if any token stays unplaced.
pub fn resolve_unmatched(tokens: &[String], partial: &mut PartialAddress) {
    for token in tokens {
        match resolve(token, partial) {
            Some(assignment) => partial.apply(assignment),
            None => {
                tracing::debug!(token = token.as_str(), "Unmatched token");
                partial.unmatched = true;
            }
        }
    }
}
