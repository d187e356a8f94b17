//! Standard-time envelopes via bootstrap resampling.
//!
//! For each (cycle start hour, forecast hour) group the completion clock is
//! the duration from cycle start to event time. Resampling draws
//! `bootstrap_sample` clocks with replacement, `bootstrap_count` times, and
//! takes the mean of each draw; the envelope is the nearest-rank quantile
//! interval of those means around the configured confidence level.

use chrono::Timelike;
use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ValidationError;
use crate::message::{CycleStandardTime, StartHourStandardTime};

use super::table::ForecastTable;

/// Forecast hours expected for one cycle start hour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartHourSpec {
    /// Two-digit start hour, e.g. "00" or "12".
    pub start_hour: String,
    pub forecast_hours: Vec<i64>,
}

/// Bootstrap configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardTimeConfig {
    pub start_hours: Vec<StartHourSpec>,
    /// Number of resampling rounds.
    pub bootstrap_count: usize,
    /// Clocks drawn with replacement per round.
    pub bootstrap_sample: usize,
    /// Confidence interval size, e.g. 0.99.
    pub quantile: f64,
    /// Fixed seed for reproducible envelopes (None = random).
    pub seed: Option<u64>,
}

impl Default for StandardTimeConfig {
    fn default() -> Self {
        Self {
            start_hours: Vec::new(),
            bootstrap_count: 1000,
            bootstrap_sample: 10,
            quantile: 0.99,
            seed: None,
        }
    }
}

/// Computes standard-time envelopes from a forecast table.
#[derive(Debug, Clone)]
pub struct StandardTimeProcessor {
    config: StandardTimeConfig,
}

impl StandardTimeProcessor {
    /// Rejects degenerate bootstrap settings: both `bootstrap_count` and
    /// `bootstrap_sample` must be at least 1, otherwise there are no means
    /// to rank an envelope from.
    pub fn new(config: StandardTimeConfig) -> Result<Self, ValidationError> {
        if config.bootstrap_count == 0 {
            return Err(ValidationError::InvalidValue {
                field: "bootstrap-count".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if config.bootstrap_sample == 0 {
            return Err(ValidationError::InvalidValue {
                field: "bootstrap-sample".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(Self { config })
    }

    /// Compute envelopes for every configured start hour.
    ///
    /// Groups with no samples in the table are skipped with a warning
    /// rather than failing the whole run.
    pub fn process(&self, table: &ForecastTable) -> Vec<StartHourStandardTime> {
        let mut rng = match self.config.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::seed_from_u64(rand::random()),
        };

        let mut start_hours = Vec::new();
        for spec in &self.config.start_hours {
            let mut times = Vec::new();
            for &forecast_hour in &spec.forecast_hours {
                let clocks: Vec<i64> = table
                    .rows()
                    .iter()
                    .filter(|row| {
                        format!("{:02}", row.start_time.hour()) == spec.start_hour
                            && row.forecast_hour == forecast_hour
                    })
                    .map(|row| (row.time - row.start_time).num_seconds())
                    .collect();
                if clocks.is_empty() {
                    warn!(
                        start_hour = %spec.start_hour,
                        forecast_hour, "no samples for group, skipping"
                    );
                    continue;
                }

                let mut means = bootstrap_means(
                    &clocks,
                    self.config.bootstrap_count,
                    self.config.bootstrap_sample,
                    &mut rng,
                );
                means.sort_unstable();
                let q = self.config.quantile;
                let upper_seconds = nearest_rank(&means, q + (1.0 - q) / 2.0);
                let lower_seconds = nearest_rank(&means, (1.0 - q) / 2.0);
                debug!(
                    start_hour = %spec.start_hour,
                    forecast_hour, lower_seconds, upper_seconds, "computed envelope"
                );
                times.push(CycleStandardTime {
                    forecast_hour,
                    upper_seconds,
                    lower_seconds,
                });
            }
            start_hours.push(StartHourStandardTime {
                start_hour: spec.start_hour.clone(),
                times,
            });
        }
        start_hours
    }
}

/// Means of `count` draws of `sample` clocks with replacement, each mean
/// ceiled to whole seconds.
fn bootstrap_means(
    clocks: &[i64],
    count: usize,
    sample: usize,
    rng: &mut Mcg128Xsl64,
) -> Vec<i64> {
    (0..count)
        .map(|_| {
            let sum: i64 = (0..sample)
                .map(|_| clocks[rng.gen_range(0..clocks.len())])
                .sum();
            (sum as f64 / sample as f64).ceil() as i64
        })
        .collect()
}

/// Nearest-rank quantile over a sorted slice.
fn nearest_rank(sorted: &[i64], p: f64) -> i64 {
    let index = (p * (sorted.len() - 1) as f64).round() as usize;
    sorted[index.min(sorted.len() - 1)]
}
