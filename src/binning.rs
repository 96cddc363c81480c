//! Strategies for splitting an attribute's range into color buckets.
//!
//! Each strategy returns the ascending lower borders of the buckets. A value
//! belongs to the bucket with the largest border not greater than it.

use crate::types::{Attribute, MunicipalityRecord};
use clap::ValueEnum;
use std::fmt;
use thiserror::Error;

/// Accumulated borders closer than this to the maximum are not emitted.
const MAX_VALUE_EPSILON: f64 = 1e-10;

#[derive(Debug, Error, PartialEq)]
pub enum BinningError {
    #[error("Number of buckets must be at least 1")]
    NoBuckets,

    #[error("No municipalities to bin")]
    EmptyDataset,

    #[error("Quantile border {bucket} needs value index {index}, but only {count} values exist")]
    QuantileOutOfRange {
        bucket: usize,
        index: usize,
        count: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Method {
    /// Every color covers the same number of municipalities
    Quantiles,
    /// Every color covers the same value range
    Values,
}

impl Method {
    pub fn lower_borders(
        self,
        municipalities: &[MunicipalityRecord],
        attribute: Attribute,
        num_buckets: usize,
    ) -> Result<Vec<f64>, BinningError> {
        match self {
            Method::Quantiles => lower_border_quantiles(municipalities, attribute, num_buckets),
            Method::Values => {
                lower_border_max_value_divided(municipalities, attribute, num_buckets)
            }
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Quantiles => f.write_str("quantiles"),
            Method::Values => f.write_str("values"),
        }
    }
}

/// Partition by quantiles: every bucket holds `ceil(n / num_buckets)`
/// municipalities, except possibly the last.
///
/// When `num_buckets` does not divide the data evenly a border index can run
/// past the end (e.g. 5 values into 4 buckets); that is an error rather than
/// a clamped border.
pub fn lower_border_quantiles(
    municipalities: &[MunicipalityRecord],
    attribute: Attribute,
    num_buckets: usize,
) -> Result<Vec<f64>, BinningError> {
    if num_buckets == 0 {
        return Err(BinningError::NoBuckets);
    }

    let mut values: Vec<f64> = municipalities.iter().map(|m| attribute.value(m)).collect();
    values.sort_by(|a, b| a.total_cmp(b));

    let count = values.len();
    let bucket_size = count.div_ceil(num_buckets);

    (0..num_buckets)
        .map(|bucket| {
            let index = bucket * bucket_size;
            values
                .get(index)
                .copied()
                .ok_or(BinningError::QuantileOutOfRange { bucket, index, count })
        })
        .collect()
}

/// Partition `[0, max]` into `num_buckets` ranges of equal width. The
/// border list is built by repeated addition, so rounding decides whether a
/// border lands just below the maximum.
pub fn lower_border_max_value_divided(
    municipalities: &[MunicipalityRecord],
    attribute: Attribute,
    num_buckets: usize,
) -> Result<Vec<f64>, BinningError> {
    if num_buckets == 0 {
        return Err(BinningError::NoBuckets);
    }

    let max_value = municipalities
        .iter()
        .map(|m| attribute.value(m))
        .reduce(f64::max)
        .ok_or(BinningError::EmptyDataset)?;
    println!("max value: {}", attribute.format_value(max_value));

    let step = max_value / num_buckets as f64;
    let mut borders = Vec::new();
    let mut i = 0.0;
    while max_value - i > MAX_VALUE_EPSILON {
        borders.push(i);
        i += step;
    }

    Ok(borders)
}
