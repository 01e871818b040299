//! Reference data files for the gazetteer.
//!
//! Four delimited text formats are understood:
//!
//! - `suffixes.csv`: `LONGFORM,ABBREV` per line
//! - `cities.csv`: one city per line
//! - `streets.csv`: one street per line
//! - `zipcodes.csv`: `zip,city,state,lat,lng,timezone,dst_flag`, fields may be quoted

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
#[cfg(feature = "runtime-data")]
use crate::gazetteer::Gazetteer;
use crate::types::ZipInfo;

/// File name of the suffix table inside a data directory.
pub const SUFFIXES_FILE: &str = "suffixes.csv";
/// File name of the city list inside a data directory.
pub const CITIES_FILE: &str = "cities.csv";
/// File name of the street list inside a data directory.
pub const STREETS_FILE: &str = "streets.csv";
/// File name of the zip table inside a data directory.
pub const ZIPS_FILE: &str = "zipcodes.csv";

/// Parse a suffix table. Lines without exactly two fields are skipped.
pub fn parse_suffixes(text: &str) -> HashMap<String, String> {
    text.lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.trim().split(',').collect();
            match fields.as_slice() {
                [long, abbrev] => Some((long.to_string(), abbrev.to_string())),
                _ => None,
            }
        })
        .collect()
}

/// Parse a city list into lowercase names.
pub fn parse_cities(text: &str) -> HashSet<String> {
    parse_names(text)
}

/// Parse a street list into lowercase names.
pub fn parse_streets(text: &str) -> HashSet<String> {
    parse_names(text)
}

fn parse_names(text: &str) -> HashSet<String> {
    text.lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Parse a zip table. A later record for the same zip replaces the earlier one.
///
/// # Errors
///
/// Returns a data error when a line has fewer than seven fields or a numeric
/// field does not parse.
pub fn parse_zips(text: &str) -> Result<HashMap<String, ZipInfo>> {
    let mut zips = HashMap::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line = line.replace('"', "");
        let members: Vec<&str> = line.trim_end().split(',').collect();
        if members.len() < 7 {
            return Err(Error::data_error(format!(
                "Zip record on line {} has {} fields, expected 7",
                index + 1,
                members.len()
            )));
        }

        let info = ZipInfo {
            zip: members[0].to_string(),
            city: members[1].to_string(),
            state: members[2].to_string(),
            lat: parse_field(members[3], "lat", index)?,
            lng: parse_field(members[4], "lng", index)?,
            timezone: parse_field(members[5], "timezone", index)?,
            dst: members[6] == "1",
        };

        if zips.contains_key(&info.zip) {
            tracing::warn!(zip = %info.zip, "Duplicate zip info");
        }
        zips.insert(info.zip.clone(), info);
    }

    Ok(zips)
}

fn parse_field<T: std::str::FromStr>(value: &str, name: &str, index: usize) -> Result<T> {
    value.trim().parse().map_err(|_| {
        Error::data_error(format!(
            "Invalid {name} value {value:?} on line {}",
            index + 1
        ))
    })
}

/// Configuration for loading reference data from disk.
#[derive(Debug, Clone)]
pub struct DataConfig {
    /// Directory holding the table files
    pub data_dir: PathBuf,

    /// Use the bundled table for any file missing from `data_dir`
    pub fallback_to_bundled: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            fallback_to_bundled: true,
        }
    }
}

/// Reference data file manager.
#[derive(Debug)]
pub struct DataManager {
    data_dir: PathBuf,
    config: DataConfig,
}

impl DataManager {
    /// Create a new data manager with the default data directory.
    pub fn new() -> Self {
        Self::with_config(DataConfig::default())
    }

    /// Create a new data manager with a custom data directory.
    pub fn with_data_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        Self::with_config(DataConfig {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..DataConfig::default()
        })
    }

    /// Create a new data manager with custom configuration.
    pub fn with_config(config: DataConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            config,
        }
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the configuration.
    pub fn config(&self) -> &DataConfig {
        &self.config
    }

    /// Check if every table file is present.
    pub fn is_data_available(&self) -> bool {
        [SUFFIXES_FILE, CITIES_FILE, STREETS_FILE, ZIPS_FILE]
            .iter()
            .all(|file| self.data_dir.join(file).exists())
    }

    /// Load a gazetteer from the data directory.
    ///
    /// Directionals and states always come from the built-in tables. A missing
    /// file falls back to the bundled table when `fallback_to_bundled` is set
    /// (an empty street list for `streets.csv`), and is an error otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or a zip record is malformed.
    #[cfg(feature = "runtime-data")]
    pub async fn load(&self) -> Result<Gazetteer> {
        let mut gazetteer = Gazetteer::bundled();

        if let Some(text) = self.read_table(SUFFIXES_FILE).await? {
            gazetteer = gazetteer.with_suffixes(parse_suffixes(&text));
        }
        if let Some(text) = self.read_table(CITIES_FILE).await? {
            gazetteer = gazetteer.with_cities(parse_cities(&text));
        }
        if let Some(text) = self.read_table(STREETS_FILE).await? {
            gazetteer = gazetteer.with_streets(parse_streets(&text));
        }
        if let Some(text) = self.read_table(ZIPS_FILE).await? {
            gazetteer = gazetteer.with_zips(parse_zips(&text)?);
        }

        let stats = gazetteer.stats();
        tracing::debug!(
            data_dir = %self.data_dir.display(),
            suffixes = stats.suffixes,
            cities = stats.cities,
            streets = stats.streets,
            zips = stats.zips,
            "Loaded gazetteer"
        );
        Ok(gazetteer)
    }

    #[cfg(feature = "runtime-data")]
    async fn read_table(&self, file: &str) -> Result<Option<String>> {
        let path = self.data_dir.join(file);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && self.config.fallback_to_bundled => {
                tracing::debug!(path = %path.display(), "Table missing, using bundled data");
                Ok(None)
            }
            Err(e) => Err(Error::data_error(format!(
                "Failed to read {}: {e}",
                path.display()
            ))),
        }
    }
}

impl Default for DataManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the default data directory for addrparse.
pub fn default_data_dir() -> PathBuf {
    // Check for environment variable first
    if let Ok(env_data_dir) = std::env::var("ADDRPARSE_DATA_DIR") {
        return PathBuf::from(env_data_dir);
    }

    // Development checkout
    let project_data_dir = PathBuf::from("data");
    if project_data_dir.join(SUFFIXES_FILE).exists() {
        return project_data_dir;
    }

    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("addrparse");
    }

    PathBuf::from("./data")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_suffixes_skips_malformed_lines() {
        let suffixes = parse_suffixes("ALLEY,ALY\nBROKEN\nSTREET,ST\nA,B,C\n");
        assert_eq!(suffixes.len(), 2);
        assert_eq!(suffixes["ALLEY"], "ALY");
    }

    #[test]
    fn test_parse_cities_lowercases() {
        let cities = parse_cities("Wisconsin Rapids\n\nMadison\n");
        assert!(cities.contains("wisconsin rapids"));
        assert!(cities.contains("madison"));
        assert_eq!(cities.len(), 2);
    }

    #[test]
    fn test_parse_zips() {
        let zips = parse_zips(
            "\"99950\",\"Ketchikan\",\"AK\",\"55.875767\",\"-131.46633\",\"-9\",\"1\"\n\n\
             53703,Madison,WI,43.077696,-89.38286,-6,0\n",
        )
        .unwrap();
        let last = &zips["99950"];
        assert_eq!(last.city, "Ketchikan");
        assert_eq!(last.lat, 55.875767);
        assert_eq!(last.lng, -131.46633);
        assert!(last.dst);
        assert!(!zips["53703"].dst);
    }

    #[test]
    fn test_parse_zips_duplicate_keeps_last() {
        let zips = parse_zips("53703,Madison,WI,1,2,-6,1\n53703,Monona,WI,1,2,-6,1\n").unwrap();
        assert_eq!(zips["53703"].city, "Monona");
    }

    #[test]
    fn test_parse_zips_rejects_bad_records() {
        assert_matches!(parse_zips("53703,Madison,WI"), Err(Error::DataError { .. }));
        assert_matches!(
            parse_zips("53703,Madison,WI,north,2,-6,1"),
            Err(Error::DataError { .. })
        );
    }

    #[test]
    fn test_data_availability() {
        let dir = tempfile::tempdir().unwrap();
        let manager = DataManager::with_data_dir(dir.path());
        assert!(!manager.is_data_available());
        for file in [SUFFIXES_FILE, CITIES_FILE, STREETS_FILE, ZIPS_FILE] {
            std::fs::write(dir.path().join(file), "").unwrap();
        }
        assert!(manager.is_data_available());
    }

    #[cfg(feature = "runtime-data")]
    #[tokio::test]
    async fn test_load_with_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CITIES_FILE), "Verona\n").unwrap();
        std::fs::write(dir.path().join(STREETS_FILE), "Mifflin\n").unwrap();

        let gazetteer = DataManager::with_data_dir(dir.path()).load().await.unwrap();
        assert!(gazetteer.is_city("verona"));
        assert!(!gazetteer.is_city("madison"));
        assert!(gazetteer.is_street("mifflin"));
        assert_eq!(gazetteer.suffix_abbreviation("ALLEY"), Some("ALY"));
        assert!(gazetteer.zip_info("99950").is_some());
    }

    #[cfg(feature = "runtime-data")]
    #[test]
    fn test_load_without_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let manager = DataManager::with_config(DataConfig {
            data_dir: dir.path().to_path_buf(),
            fallback_to_bundled: false,
        });
        let result = tokio_test::block_on(manager.load());
        assert_matches!(result, Err(Error::DataError { .. }));
    }
}
