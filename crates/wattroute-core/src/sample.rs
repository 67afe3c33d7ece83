//! Per-step production/consumption readings.

use serde::{Deserialize, Serialize};

/// A node's production and consumption for one simulation step.
///
/// Either side may be absent. Non-finite readings are stored as absent so
/// they can never masquerade as a balanced node; deserialization goes through
/// the same filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSample")]
pub struct StepSample {
    production: Option<f64>,
    consumption: Option<f64>,
}

#[derive(Deserialize)]
struct RawSample {
    #[serde(default)]
    production: Option<f64>,
    #[serde(default)]
    consumption: Option<f64>,
}

impl From<RawSample> for StepSample {
    fn from(raw: RawSample) -> Self {
        Self::new(raw.production, raw.consumption)
    }
}

impl StepSample {
    pub fn new(production: Option<f64>, consumption: Option<f64>) -> Self {
        Self {
            production: production.filter(|v| v.is_finite()),
            consumption: consumption.filter(|v| v.is_finite()),
        }
    }

    /// Sample with both readings present.
    pub fn known(production: f64, consumption: f64) -> Self {
        Self::new(Some(production), Some(consumption))
    }

    /// Sample with no readings at all.
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn production(&self) -> Option<f64> {
        self.production
    }

    pub fn consumption(&self) -> Option<f64> {
        self.consumption
    }

    pub fn is_complete(&self) -> bool {
        self.production.is_some() && self.consumption.is_some()
    }

    /// `production - consumption`, when both readings are present.
    pub fn net(&self) -> Option<f64> {
        Some(self.production? - self.consumption?)
    }
}
