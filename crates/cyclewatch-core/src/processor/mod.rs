//! Processors reshaping retrieved event messages.

mod standard_time;
mod table;

pub use standard_time::{StandardTimeConfig, StandardTimeProcessor, StartHourSpec};
pub use table::{DuplicatePolicy, ForecastRow, ForecastTable, TableProcessor};
