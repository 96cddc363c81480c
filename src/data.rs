use crate::types::MunicipalityRecord;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// Smallest and largest plausible municipality area in km². Entries outside
/// this range are mostly data errors (very small areas produce absurd
/// densities).
pub const MIN_AREA: f64 = 1.0;
pub const MAX_AREA: f64 = 900.0;

/// A municipality as it appears in the places JSON, before any parsing of
/// the numeric fields.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMunicipality {
    #[serde(rename = "MunicipalityKey")]
    pub key: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Area")]
    pub area: RawNumber,
    #[serde(rename = "Population")]
    pub population: RawNumber,
}

/// Numeric fields are exported either as JSON numbers or as strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(serde_json::Number),
    Text(String),
}

impl RawNumber {
    pub fn to_f64(&self) -> Result<f64> {
        match self {
            RawNumber::Number(n) => n
                .as_f64()
                .ok_or_else(|| anyhow!("{} is not representable as a float", n)),
            RawNumber::Text(s) => s
                .trim()
                .parse::<f64>()
                .with_context(|| format!("{:?} is not a number", s)),
        }
    }

    /// Integer literals parse exactly; a float JSON number is truncated
    /// toward zero.
    pub fn to_i64(&self) -> Result<i64> {
        match self {
            RawNumber::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Ok(i);
                }
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.abs() < i64::MAX as f64 => Ok(f.trunc() as i64),
                    _ => Err(anyhow!("{} is out of integer range", n)),
                }
            }
            RawNumber::Text(s) => s
                .trim()
                .parse::<i64>()
                .with_context(|| format!("{:?} is not an integer", s)),
        }
    }
}

pub fn load_municipalities(path: &Path) -> Result<Vec<MunicipalityRecord>> {
    info!("Loading municipality data from {:?}...", path);

    let file = File::open(path)
        .with_context(|| format!("Failed to open places file: {:?}", path))?;
    let reader = BufReader::new(file);
    let raw: Vec<RawMunicipality> = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse places JSON: {:?}", path))?;

    let total = raw.len();
    let municipalities = clean_municipalities(raw)?;
    info!("Kept {} of {} municipality records", municipalities.len(), total);

    Ok(municipalities)
}

/// Deduplicates by key and drops entries with implausible areas.
///
/// The key check runs before the area check, and a record dropped for its
/// area does not mark its key as seen: a later record with the same key and
/// a valid area is kept. Records skipped as duplicates are never parsed.
pub fn clean_municipalities(raw: Vec<RawMunicipality>) -> Result<Vec<MunicipalityRecord>> {
    let mut seen = HashSet::new();
    let mut municipalities = Vec::new();

    for m in raw {
        if seen.contains(&m.key) {
            continue;
        }

        let area = m
            .area
            .to_f64()
            .with_context(|| format!("Invalid Area for municipality {}", m.key))?;
        if !(MIN_AREA..=MAX_AREA).contains(&area) {
            debug!("Dropping {} ({}): area {} out of range", m.key, m.name, area);
            continue;
        }

        let population = m
            .population
            .to_i64()
            .with_context(|| format!("Invalid Population for municipality {}", m.key))?;

        seen.insert(m.key.clone());
        municipalities.push(MunicipalityRecord {
            key: m.key,
            name: m.name,
            area,
            population,
            population_density: population as f64 / area,
        });
    }

    Ok(municipalities)
}
