//! Reference tables consulted while parsing.
//!
//! A [`Gazetteer`] is built once per engine and only read afterwards, so a
//! single instance can back any number of concurrent parses.

use std::collections::{HashMap, HashSet};

use crate::data;
use crate::types::ZipInfo;

const BUNDLED_SUFFIXES: &str = include_str!("../data/suffixes.csv");
const BUNDLED_CITIES: &str = include_str!("../data/cities.csv");
const BUNDLED_ZIPS: &str = include_str!("../data/zipcodes.csv");

const DIRECTIONALS: [(&str, &str); 16] = [
    ("n", "N."),
    ("e", "E."),
    ("s", "S."),
    ("w", "W."),
    ("ne", "NE."),
    ("nw", "NW."),
    ("se", "SE."),
    ("sw", "SW."),
    ("north", "N."),
    ("east", "E."),
    ("south", "S."),
    ("west", "W."),
    ("northeast", "NE."),
    ("northwest", "NW."),
    ("southeast", "SE."),
    ("southwest", "SW."),
];

const STATES: [(&str, &str); 51] = [
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("District of Columbia", "DC"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

/// Immutable bundle of lookup tables: street suffixes, directionals, states,
/// cities, streets and zip codes.
#[derive(Debug, Clone, PartialEq)]
pub struct Gazetteer {
    /// Uppercase long form -> uppercase abbreviation
    suffixes: HashMap<String, String>,
    suffix_abbreviations: HashSet<String>,
    /// Lowercase directional -> canonical "N." form
    prefixes: HashMap<String, String>,
    /// Lowercase full state name -> two letter abbreviation
    states: HashMap<String, String>,
    state_abbreviations: HashSet<String>,
    cities: HashSet<String>,
    streets: HashSet<String>,
    zips: HashMap<String, ZipInfo>,
}

impl Gazetteer {
    /// Build a gazetteer from explicit tables.
    ///
    /// Keys are normalised on the way in, so callers may pass suffixes in any
    /// case, states as `"Wisconsin" -> "WI"` and directionals as `"n" -> "N."`.
    pub fn new(
        suffixes: HashMap<String, String>,
        prefixes: HashMap<String, String>,
        states: HashMap<String, String>,
        cities: HashSet<String>,
        streets: HashSet<String>,
        zips: HashMap<String, ZipInfo>,
    ) -> Self {
        Self::empty()
            .with_suffixes(suffixes)
            .with_prefixes(prefixes)
            .with_states(states)
            .with_cities(cities)
            .with_streets(streets)
            .with_zips(zips)
    }

    /// A gazetteer with every table empty.
    pub fn empty() -> Self {
        Self {
            suffixes: HashMap::new(),
            suffix_abbreviations: HashSet::new(),
            prefixes: HashMap::new(),
            states: HashMap::new(),
            state_abbreviations: HashSet::new(),
            cities: HashSet::new(),
            streets: HashSet::new(),
            zips: HashMap::new(),
        }
    }

    /// The tables shipped with the crate. The street table is empty.
    pub fn bundled() -> Self {
        let zips = data::parse_zips(BUNDLED_ZIPS).expect("bundled zip table is well formed");
        Self::empty()
            .with_suffixes(data::parse_suffixes(BUNDLED_SUFFIXES))
            .with_prefixes(default_prefixes())
            .with_states(default_states())
            .with_cities(data::parse_cities(BUNDLED_CITIES))
            .with_zips(zips)
    }

    /// Replace the suffix table (long form -> abbreviation).
    pub fn with_suffixes(mut self, suffixes: HashMap<String, String>) -> Self {
        self.suffixes = suffixes
            .into_iter()
            .map(|(long, abbrev)| (long.trim().to_uppercase(), abbrev.trim().to_uppercase()))
            .collect();
        self.suffix_abbreviations = self.suffixes.values().cloned().collect();
        self
    }

    /// Replace the directional table.
    pub fn with_prefixes(mut self, prefixes: HashMap<String, String>) -> Self {
        self.prefixes = prefixes
            .into_iter()
            .map(|(key, canonical)| (key.to_lowercase().replace('.', ""), canonical))
            .collect();
        self
    }

    /// Replace the state table (full name -> abbreviation).
    pub fn with_states(mut self, states: HashMap<String, String>) -> Self {
        self.states = states
            .into_iter()
            .map(|(name, abbrev)| (name.to_lowercase(), abbrev.to_uppercase()))
            .collect();
        self.state_abbreviations = self.states.values().cloned().collect();
        self
    }

    /// Replace the city set.
    pub fn with_cities(mut self, cities: HashSet<String>) -> Self {
        self.cities = cities.into_iter().map(|c| c.trim().to_lowercase()).collect();
        self
    }

    /// Replace the street set.
    pub fn with_streets(mut self, streets: HashSet<String>) -> Self {
        self.streets = streets.into_iter().map(|s| s.trim().to_lowercase()).collect();
        self
    }

    /// Replace the zip table.
    pub fn with_zips(mut self, zips: HashMap<String, ZipInfo>) -> Self {
        self.zips = zips;
        self
    }

    /// Whether the token is a suffix long form or abbreviation.
    pub fn is_suffix(&self, token: &str) -> bool {
        let upper = token.to_uppercase();
        self.suffixes.contains_key(&upper) || self.suffix_abbreviations.contains(&upper)
    }

    /// Canonical `"Abbrev."` form of a suffix token, e.g. `"STREET"` -> `"St."`.
    pub fn canonical_suffix(&self, token: &str) -> Option<String> {
        let upper = token.to_uppercase();
        let abbrev = match self.suffixes.get(&upper) {
            Some(abbrev) => abbrev.as_str(),
            None if self.suffix_abbreviations.contains(&upper) => upper.as_str(),
            None => return None,
        };
        Some(format!("{}.", capitalize(abbrev)))
    }

    /// Uppercase abbreviation for a suffix long form, without the period.
    pub fn suffix_abbreviation(&self, token: &str) -> Option<&str> {
        self.suffixes.get(&token.to_uppercase()).map(String::as_str)
    }

    /// Canonical directional for a token such as `"North"` or `"n."`.
    pub fn canonical_prefix(&self, token: &str) -> Option<&str> {
        self.prefixes
            .get(&token.to_lowercase().replace('.', ""))
            .map(String::as_str)
    }

    /// Two letter abbreviation for a state name or abbreviation.
    pub fn state_abbreviation(&self, token: &str) -> Option<String> {
        if let Some(abbrev) = self.states.get(&token.to_lowercase()) {
            return Some(abbrev.clone());
        }
        let upper = token.to_uppercase();
        self.state_abbreviations.contains(&upper).then_some(upper)
    }

    /// Whether the lowercase name is a known city.
    pub fn is_city(&self, name: &str) -> bool {
        self.cities.contains(&name.to_lowercase())
    }

    /// Whether the lowercase name is a known street.
    pub fn is_street(&self, name: &str) -> bool {
        self.streets.contains(&name.to_lowercase())
    }

    /// Zip table entry for the first five characters of `zip`.
    pub fn zip_info(&self, zip: &str) -> Option<&ZipInfo> {
        let key = zip.get(..5).unwrap_or(zip);
        self.zips.get(key)
    }

    /// Number of entries in the suffix, city, street and zip tables.
    pub fn stats(&self) -> GazetteerStats {
        GazetteerStats {
            suffixes: self.suffixes.len(),
            cities: self.cities.len(),
            streets: self.streets.len(),
            zips: self.zips.len(),
        }
    }
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::bundled()
    }
}

/// Table sizes of a [`Gazetteer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GazetteerStats {
    /// Suffix long forms
    pub suffixes: usize,
    /// Known cities
    pub cities: usize,
    /// Known streets
    pub streets: usize,
    /// Zip records
    pub zips: usize,
}

/// The directional table: compass words and letters to `"N."`-style forms.
pub fn default_prefixes() -> HashMap<String, String> {
    DIRECTIONALS
        .iter()
        .map(|(key, canonical)| (key.to_string(), canonical.to_string()))
        .collect()
}

/// The fifty states plus the District of Columbia.
pub fn default_states() -> HashMap<String, String> {
    STATES
        .iter()
        .map(|(name, abbrev)| (name.to_string(), abbrev.to_string()))
        .collect()
}

/// Uppercase the first character and lowercase the rest.
pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Capitalize every space separated word.
pub(crate) fn title_case(text: &str) -> String {
    text.split(' ').map(capitalize).collect::<Vec<_>>().join(" ")
}
