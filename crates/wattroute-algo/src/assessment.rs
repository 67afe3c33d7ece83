//! Wind/solar potential of a weather site.
//!
//! Both scores are coarse heuristics:
//!
//! - wind: one point per acceptable wind orientation, plus one per 100 m of
//!   altitude;
//! - solar: 10 at the equator, falling linearly to 0 at 45° latitude.
//!
//! The solar score is weighted by [`SOLAR_WEIGHT`] when picking the best
//! source, so wind only wins at sites that are both high and exposed.

use serde::{Deserialize, Serialize};

/// Latitude (degrees) at which the solar score reaches zero.
pub const SOLAR_LATITUDE_THRESHOLD: f64 = 45.0;
/// Solar score at latitude 0.
pub const MAX_SOLAR_SCORE: f64 = 10.0;
/// Metres of altitude worth one wind point.
pub const ALTITUDE_PER_WIND_POINT: f64 = 100.0;
/// Factor applied to the solar score when comparing against wind.
pub const SOLAR_WEIGHT: f64 = 100.0;

/// Inputs of the site heuristics. Missing values count as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConditions {
    pub altitude_m: Option<f64>,
    pub latitude: Option<f64>,
    /// `;`-separated orientations, e.g. `"N;NE;E;"`
    pub wind_orientations: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergySource {
    Wind,
    Solar,
}

impl std::fmt::Display for EnergySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnergySource::Wind => f.write_str("wind"),
            EnergySource::Solar => f.write_str("solar"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SiteScore {
    pub wind: f64,
    pub solar: f64,
    pub best: EnergySource,
}

/// Number of non-empty orientation tokens.
pub fn count_orientations(orientations: &str) -> usize {
    orientations
        .split(';')
        .filter(|token| !token.trim().is_empty())
        .count()
}

pub fn wind_score(conditions: &SiteConditions) -> f64 {
    let orientations = conditions
        .wind_orientations
        .as_deref()
        .map(count_orientations)
        .unwrap_or(0);
    orientations as f64 + conditions.altitude_m.unwrap_or(0.0) / ALTITUDE_PER_WIND_POINT
}

pub fn solar_score(conditions: &SiteConditions) -> f64 {
    let latitude = conditions.latitude.unwrap_or(0.0);
    let per_degree = MAX_SOLAR_SCORE / SOLAR_LATITUDE_THRESHOLD;
    (MAX_SOLAR_SCORE - latitude * per_degree).max(0.0)
}

pub fn assess_site(conditions: &SiteConditions) -> SiteScore {
    let wind = wind_score(conditions);
    let solar = solar_score(conditions);
    let best = if wind > solar * SOLAR_WEIGHT {
        EnergySource::Wind
    } else {
        EnergySource::Solar
    };
    SiteScore { wind, solar, best }
}
