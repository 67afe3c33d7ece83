//! City → department/region lookup table.
//!
//! Loaded from a CSV with `label, department_name, department_number,
//! region_name` headers. Matching ignores case; the first row for a city wins.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use wattroute_core::{WattError, WattResult};

/// Administrative metadata joined onto a site. Empty fields mean "no match".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionInfo {
    #[serde(default)]
    pub department_name: String,
    #[serde(default)]
    pub department_number: String,
    #[serde(default)]
    pub region_name: String,
}

impl RegionInfo {
    pub fn is_empty(&self) -> bool {
        self.department_name.is_empty()
            && self.department_number.is_empty()
            && self.region_name.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct CityRow {
    label: String,
    #[serde(default)]
    department_name: String,
    #[serde(default)]
    department_number: String,
    #[serde(default)]
    region_name: String,
}

impl From<CityRow> for RegionInfo {
    fn from(row: CityRow) -> Self {
        Self {
            department_name: row.department_name,
            department_number: row.department_number,
            region_name: row.region_name,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegionLookup {
    by_city: HashMap<String, RegionInfo>,
}

impl RegionLookup {
    pub fn from_reader<R: Read>(reader: R) -> WattResult<Self> {
        let mut table = csv::Reader::from_reader(reader);
        let mut by_city = HashMap::new();
        for row in table.deserialize::<CityRow>() {
            let row = row.map_err(|err| WattError::Parse(format!("cities table: {err}")))?;
            by_city
                .entry(normalize(&row.label))
                .or_insert_with(|| RegionInfo::from(row));
        }
        Ok(Self { by_city })
    }

    pub fn load(path: impl AsRef<Path>) -> WattResult<Self> {
        let path = path.as_ref();
        let lookup = Self::from_reader(File::open(path)?)?;
        debug!(path = %path.display(), cities = lookup.len(), "loaded region table");
        Ok(lookup)
    }

    pub fn get(&self, city: &str) -> Option<&RegionInfo> {
        self.by_city.get(&normalize(city))
    }

    /// Metadata for `city`, or empty fields when it is not in the table.
    pub fn resolve(&self, city: &str) -> RegionInfo {
        self.get(city).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_city.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_city.is_empty()
    }
}

fn normalize(city: &str) -> String {
    city.trim().to_lowercase()
}
