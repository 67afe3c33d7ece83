use std::collections::HashSet;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use tabwriter::TabWriter;
use tracing::{info, warn};
use wattroute_algo::{assess_site, EnergySource, SiteConditions};
use wattroute_cli::WattrouteConfig;
use wattroute_io::{
    fetch_weather, load_weather, write_rows, RegionInfo, RegionLookup, WeatherBatch, WeatherRecord,
};

use super::report;

/// A weather site joined with its region and scored.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentRow {
    pub city: String,
    pub altitude: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub wind_orientations_ok: Option<String>,
    pub department_name: String,
    pub department_number: String,
    pub region_name: String,
    pub wind_energy_score: f64,
    pub solar_energy_score: f64,
    pub best_green_energy: EnergySource,
}

impl AssessmentRow {
    fn new(record: WeatherRecord, region: RegionInfo) -> Self {
        let score = assess_site(&SiteConditions {
            altitude_m: record.altitude,
            latitude: record.latitude,
            wind_orientations: record.wind_orientations_ok.clone(),
        });
        Self {
            city: record.city,
            altitude: record.altitude,
            latitude: record.latitude,
            longitude: record.longitude,
            wind_orientations_ok: record.wind_orientations_ok,
            department_name: region.department_name,
            department_number: region.department_number,
            region_name: region.region_name,
            wind_energy_score: score.wind,
            solar_energy_score: score.solar,
            best_green_energy: score.best,
        }
    }
}

pub fn handle(
    weather: Option<&Path>,
    url: Option<&str>,
    cities: &Path,
    out: Option<&Path>,
    config: &WattrouteConfig,
) -> Result<()> {
    let batch = read_weather(weather, url, config)?;
    report("weather records", &batch.diagnostics);
    let lookup = RegionLookup::load(cities)
        .with_context(|| format!("loading cities table {}", cities.display()))?;

    let rows = assess(batch.records, &lookup);
    info!("Assessed {} site(s)", rows.len());

    match out {
        Some(path) => {
            write_rows(&rows, path).with_context(|| format!("writing {}", path.display()))?;
            info!("Assessment written to {}", path.display());
        }
        None => print_table(&rows)?,
    }
    Ok(())
}

fn read_weather(
    weather: Option<&Path>,
    url: Option<&str>,
    config: &WattrouteConfig,
) -> Result<WeatherBatch> {
    if let Some(path) = weather {
        return load_weather(path)
            .with_context(|| format!("loading weather records {}", path.display()));
    }
    let url = url
        .or(config.assess.weather_url.as_deref())
        .ok_or_else(|| anyhow!("no weather source: pass --weather, --url or set assess.weather_url"))?;
    Ok(fetch_weather(url)?)
}

/// Join, score and drop repeated cities (the first record wins).
pub fn assess(records: Vec<WeatherRecord>, lookup: &RegionLookup) -> Vec<AssessmentRow> {
    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.city.clone()) {
            continue;
        }
        let region = lookup.resolve(&record.city);
        if region.is_empty() {
            warn!("{:?} not found in the cities table; region left empty", record.city);
        }
        rows.push(AssessmentRow::new(record, region));
    }
    rows
}

fn print_table(rows: &[AssessmentRow]) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "CITY\tDEPARTMENT\tREGION\tWIND\tSOLAR\tBEST")?;
    for row in rows {
        writeln!(
            writer,
            "{}\t{}\t{}\t{:.2}\t{:.2}\t{}",
            row.city,
            row.department_name,
            row.region_name,
            row.wind_energy_score,
            row.solar_energy_score,
            row.best_green_energy
        )?;
    }
    writer.flush()?;
    Ok(())
}
