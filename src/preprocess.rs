//! Secondary designator extraction ahead of tokenization.
//!
//! Unit markers such as `#2`, `apt 5` or `unit B` confuse the right-to-left
//! classifier (a bare `Unit` looks like a street name), so the high precision
//! ones are cut out of the string first.

use std::sync::LazyLock;

use regex::Regex;

/// Extraction patterns in priority order, matched case-insensitively anywhere
/// in the string.
const EXTRACTION_PATTERNS: [&str; 14] = [
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
    r"townhouse style\s\w{1,2}",
];

static EXTRACTORS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    EXTRACTION_PATTERNS
        .iter()
        .map(|pattern| Regex::new(&format!("(?i){pattern}")).expect("valid extraction regex"))
        .collect()
});

/// Unit counts such as "--2 units" describe a listing, not an address.
static UNIT_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)-?-?\w+ units").expect("valid unit count regex"));

static EMPTY_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*,").expect("valid empty segment regex"));

/// Output of [`preprocess`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preprocessed {
    /// The address with every extracted span removed
    pub cleaned: String,
    /// Text of the last extraction pattern that matched
    pub secondary_designator: Option<String>,
}

/// Pull a likely secondary designator out of `address`.
///
/// Patterns run in order against the progressively shortened string. Each
/// pattern that matches overwrites the candidate with its first match and then
/// has all of its matches deleted, so the candidate comes from the last
/// matching pattern and later patterns never see text an earlier one removed.
pub fn preprocess(address: &str) -> Preprocessed {
    let mut working = address.replace("# ", "#").replace(" & ", "&");
    working = UNIT_COUNT.replace_all(&working, "").into_owned();

    let mut secondary_designator = None;
    for extractor in EXTRACTORS.iter() {
        let Some(found) = extractor.find(&working) else {
            continue;
        };
        tracing::debug!(pattern = extractor.as_str(), matched = found.as_str(), "Extracted designator");
        secondary_designator = Some(found.as_str().to_string());
        working = extractor.replace_all(&working, "").into_owned();
    }

    let cleaned = EMPTY_SEGMENT.replace_all(&working, ",").into_owned();
    Preprocessed {
        cleaned,
        secondary_designator,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_designator() {
        let result = preprocess("407 West Doty St. #2");
        assert_eq!(result.secondary_designator.as_deref(), Some("#2"));
        assert_eq!(result.cleaned.trim(), "407 West Doty St.");
    }

    #[test]
    fn test_stray_dash_left_behind() {
        let result = preprocess("407 West Doty St. - #2");
        assert_eq!(result.secondary_designator.as_deref(), Some("#2"));
        assert_eq!(result.cleaned.trim(), "407 West Doty St. -");
    }

    #[test]
    fn test_empty_segment_collapsed() {
        let result = preprocess("351 King St., #400, San Francisco, CA");
        assert_eq!(result.secondary_designator.as_deref(), Some("#400"));
        assert_eq!(result.cleaned, "351 King St., San Francisco, CA");
    }

    #[test]
    fn test_last_matching_pattern_wins() {
        // "apt 3" is removed first, then "unit 7" overwrites the candidate.
        let result = preprocess("12 Main St apt 3 unit 7");
        assert_eq!(result.secondary_designator.as_deref(), Some("unit 7"));
        assert_eq!(result.cleaned.trim(), "12 Main St");
    }

    #[test]
    fn test_later_patterns_see_earlier_removals() {
        // "#5" is gone before "- #{0,1}\w+" runs, so only "- 6" matches it.
        let result = preprocess("12 Main St #5 - 6");
        assert_eq!(result.secondary_designator.as_deref(), Some("- 6"));
        assert_eq!(result.cleaned.trim(), "12 Main St");
    }

    #[test]
    fn test_space_after_hash_joined() {
        let result = preprocess("12 Main St # 4B");
        assert_eq!(result.secondary_designator.as_deref(), Some("#4B"));
    }

    #[test]
    fn test_unit_count_dropped() {
        let result = preprocess("12 Main St --2 units");
        assert_eq!(result.secondary_designator, None);
        assert_eq!(result.cleaned.trim(), "12 Main St");
    }

    #[test]
    fn test_case_insensitive() {
        let result = preprocess("12 Main St APT 9");
        assert_eq!(result.secondary_designator.as_deref(), Some("APT 9"));
    }

    #[test]
    fn test_no_pattern_matches_inside_words() {
        // "no\s?\d+" is unanchored, so a city ending in "no" loses its zip.
        let result = preprocess("2 Park St Reno 89501");
        assert_eq!(result.secondary_designator.as_deref(), Some("no 89501"));
        assert_eq!(result.cleaned, "2 Park St Re");
    }

    #[test]
    fn test_plain_address_untouched() {
        let result = preprocess("2 N. Park Street, Madison, WI 53703");
        assert_eq!(result.secondary_designator, None);
        assert_eq!(result.cleaned, "2 N. Park Street, Madison, WI 53703");
    }
}
