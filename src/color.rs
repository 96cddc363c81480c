use crate::map::PolygonSymbolizer;
use image::Rgba;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ColorError {
    #[error("Cannot build a color mapping without any lower borders")]
    NoBuckets,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub lower_bound: f64,
    pub symbolizer: PolygonSymbolizer,
}

/// Result of a successful lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketMatch {
    pub index: usize,
    pub lower_bound: f64,
    pub symbolizer: PolygonSymbolizer,
}

/// Maps attribute values onto red shades and counts how often each lower
/// bound is hit.
///
/// The lowest bucket gets full intensity, fading toward black for the
/// highest one. Buckets sharing a lower bound share one counter.
#[derive(Debug, Clone)]
pub struct ColorMapping {
    buckets: Vec<Bucket>,
    // (lower bound, hits), one entry per distinct bound
    stats: Vec<(f64, usize)>,
    // Index into `stats` for each bucket
    stat_slots: Vec<usize>,
}

impl ColorMapping {
    pub fn new(lower_borders: &[f64]) -> Result<Self, ColorError> {
        if lower_borders.is_empty() {
            return Err(ColorError::NoBuckets);
        }

        let n = lower_borders.len() as f64;
        let buckets = lower_borders
            .iter()
            .enumerate()
            .map(|(i, &lower_bound)| {
                let intensity = 100.0 - i as f64 * 100.0 / n;
                Bucket {
                    lower_bound,
                    symbolizer: PolygonSymbolizer {
                        fill: Rgba([percent_to_channel(intensity), 0, 0, 255]),
                        gamma: 0.0,
                    },
                }
            })
            .collect();

        let mut stats: Vec<(f64, usize)> = Vec::new();
        let stat_slots = lower_borders
            .iter()
            .map(|&bound| match stats.iter().position(|&(b, _)| b == bound) {
                Some(slot) => slot,
                None => {
                    stats.push((bound, 0));
                    stats.len() - 1
                }
            })
            .collect();

        Ok(Self {
            buckets,
            stats,
            stat_slots,
        })
    }

    /// Finds the bucket with the largest lower bound `<= value` and records
    /// the hit. Values below every bound (or NaN) get `None`.
    pub fn lookup(&mut self, value: f64) -> Option<BucketMatch> {
        let index = self.buckets.iter().rposition(|b| value >= b.lower_bound)?;
        self.stats[self.stat_slots[index]].1 += 1;
        let bucket = &self.buckets[index];
        Some(BucketMatch {
            index,
            lower_bound: bucket.lower_bound,
            symbolizer: bucket.symbolizer,
        })
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Hits recorded for a lower bound; 0 for bounds that are not borders.
    pub fn usage_of(&self, lower_bound: f64) -> usize {
        self.stats
            .iter()
            .find(|&&(b, _)| b == lower_bound)
            .map_or(0, |&(_, hits)| hits)
    }

    /// Hits per bucket as reported by the key. Buckets with the same lower
    /// bound report the same shared count.
    pub fn usage(&self) -> Vec<usize> {
        self.stat_slots.iter().map(|&slot| self.stats[slot].1).collect()
    }

    pub fn total_usage(&self) -> usize {
        self.stats.iter().map(|&(_, hits)| hits).sum()
    }

    pub fn key(&self) -> UsageKey<'_> {
        UsageKey { mapping: self }
    }

    pub fn print_key(&self) {
        print!("{}", self.key());
    }
}

/// Human readable legend of the buckets and their usage counts.
pub struct UsageKey<'a> {
    mapping: &'a ColorMapping,
}

impl fmt::Display for UsageKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mapping = self.mapping;
        let buckets = &mapping.buckets;
        writeln!(f, "the values are divided into {} different colors", buckets.len())?;
        for pair in buckets.windows(2) {
            let (lower, upper) = (pair[0].lower_bound, pair[1].lower_bound);
            writeln!(f, "{:?} <= value < {:?}: {}", lower, upper, mapping.usage_of(lower))?;
        }
        if let Some(last) = buckets.last() {
            let lower = last.lower_bound;
            writeln!(f, "{:?} <= value: {}", lower, mapping.usage_of(lower))?;
        }
        Ok(())
    }
}

fn percent_to_channel(percent: f64) -> u8 {
    (percent.clamp(0.0, 100.0) * 255.0 / 100.0).round() as u8
}
