//! Weather/site records for site assessment.
//!
//! The source is a JSON array of site objects. Only `city` is required;
//! numeric fields may arrive as numbers or numeric strings, and anything
//! unparseable is treated as absent.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use wattroute_core::{Diagnostics, WattError, WattResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub altitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub longitude: Option<f64>,
    /// `;`-separated acceptable wind orientations
    #[serde(default, deserialize_with = "lenient_text")]
    pub wind_orientations_ok: Option<String>,
}

/// Records that parsed, plus a note for every element that did not.
#[derive(Debug, Clone, Default)]
pub struct WeatherBatch {
    pub records: Vec<WeatherRecord>,
    pub diagnostics: Diagnostics,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Parse a weather document. Elements without a usable `city` are skipped.
pub fn parse_weather(text: &str) -> WattResult<WeatherBatch> {
    let document: Value = serde_json::from_str(text)?;
    let elements = match document {
        Value::Array(elements) => elements,
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        other => {
            return Err(WattError::Parse(format!(
                "weather document must be an array of sites, got {other}"
            )))
        }
    };

    let mut batch = WeatherBatch::default();
    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value::<WeatherRecord>(element) {
            Ok(record) if !record.city.trim().is_empty() => batch.records.push(record),
            Ok(_) => batch.diagnostics.add_warning_with_entity(
                "weather",
                "site without a city name skipped",
                &format!("#{index}"),
            ),
            Err(err) => batch.diagnostics.add_warning_with_entity(
                "weather",
                &format!("unreadable site skipped: {err}"),
                &format!("#{index}"),
            ),
        }
    }
    debug!(
        records = batch.records.len(),
        skipped = batch.diagnostics.warning_count(),
        "parsed weather records"
    );
    Ok(batch)
}

pub fn load_weather(path: impl AsRef<Path>) -> WattResult<WeatherBatch> {
    parse_weather(&fs::read_to_string(path)?)
}

/// Download and parse weather records from `url`.
#[cfg(feature = "native-io")]
pub fn fetch_weather(url: &str) -> WattResult<WeatherBatch> {
    info!(url = %redact_key(url), "fetching weather records");
    let response = ureq::get(url)
        .call()
        .map_err(|err| WattError::Http(err.to_string()))?;
    let body = response.into_string()?;
    parse_weather(&body)
}

#[cfg(not(feature = "native-io"))]
pub fn fetch_weather(url: &str) -> WattResult<WeatherBatch> {
    info!(url = %redact_key(url), "remote fetch requested");
    Err(WattError::Http(
        "remote fetch requires the `native-io` feature".into(),
    ))
}

/// `url` with the value of any `key=` query parameter masked, for logging.
pub fn redact_key(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let query: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some(("key", _)) => "key=***".to_string(),
            _ => pair.to_string(),
        })
        .collect();
    format!("{base}?{}", query.join("&"))
}
