//! Per-node production/consumption series.
//!
//! ```json
//! {"Lille": {"production": [10, 12, null], "consumption": [4, 15, 3]}}
//! ```
//!
//! Step `n` of a node reads index `n` of both sequences; a `null` or an index
//! past the end is an absent reading.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use wattroute_core::{StepSample, WattResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSeries {
    #[serde(default)]
    pub production: Vec<Option<f64>>,
    #[serde(default)]
    pub consumption: Vec<Option<f64>>,
}

impl NodeSeries {
    pub fn sample(&self, step: usize) -> StepSample {
        StepSample::new(
            self.production.get(step).copied().flatten(),
            self.consumption.get(step).copied().flatten(),
        )
    }

    pub fn len(&self) -> usize {
        self.production.len().max(self.consumption.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Node data keyed by label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeDataSet {
    series: BTreeMap<String, NodeSeries>,
}

impl NodeDataSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> WattResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> WattResult<Self> {
        let path = path.as_ref();
        let data = Self::parse(&fs::read_to_string(path)?)?;
        debug!(
            path = %path.display(),
            nodes = data.len(),
            steps = data.step_count(),
            "loaded node data"
        );
        Ok(data)
    }

    pub fn insert(&mut self, label: impl Into<String>, series: NodeSeries) {
        self.series.insert(label.into(), series);
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Length of the longest sequence in the set.
    pub fn step_count(&self) -> usize {
        self.series.values().map(NodeSeries::len).max().unwrap_or(0)
    }

    /// Reading of `label` at `step`; an unknown label is a missing sample.
    pub fn sample(&self, label: &str, step: usize) -> StepSample {
        self.series
            .get(label)
            .map(|series| series.sample(step))
            .unwrap_or_default()
    }

    /// Every labelled reading at `step`.
    pub fn samples_at(&self, step: usize) -> impl Iterator<Item = (&str, StepSample)> {
        self.series
            .iter()
            .map(move |(label, series)| (label.as_str(), series.sample(step)))
    }
}
