//! Forecast table: production events as a sorted, de-duplicated table.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::ValidationError;
use crate::message::{ceil_to_second, EventStatus, ProductionEventMessage};

/// One row of the forecast table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    pub system: String,
    pub stream: String,
    pub production_type: String,
    pub production_name: String,
    pub start_time: DateTime<Utc>,
    pub forecast_hour: i64,
    /// Event observation time, ceiled to whole seconds.
    pub time: DateTime<Utc>,
    pub event: String,
    pub status: EventStatus,
}

impl ForecastRow {
    /// Sort/de-duplication key: cycle start time plus lead time. Two events
    /// for the same output artifact share a key.
    pub fn key(&self) -> String {
        format!(
            "{}+{:03}",
            self.start_time.format("%Y%m%d%H"),
            self.forecast_hour
        )
    }
}

/// What to do with rows sharing a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    #[default]
    KeepFirst,
    KeepLast,
    KeepAll,
}

impl FromStr for DuplicatePolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(Self::KeepFirst),
            "last" => Ok(Self::KeepLast),
            "all" => Ok(Self::KeepAll),
            other => Err(ValidationError::InvalidValue {
                field: "duplicate-policy".to_string(),
                message: format!("expected 'first', 'last' or 'all', got '{other}'"),
            }),
        }
    }
}

/// The assembled table, sorted ascending by row key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastTable {
    rows: Vec<ForecastRow>,
}

impl ForecastTable {
    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Latest event observation time in the table, if any.
    pub fn latest_time(&self) -> Option<DateTime<Utc>> {
        self.rows.iter().map(|row| row.time).max()
    }
}

/// Builds a [`ForecastTable`] from production event messages.
#[derive(Debug, Clone, Default)]
pub struct TableProcessor {
    policy: DuplicatePolicy,
}

impl TableProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self { policy }
    }

    pub fn process(&self, messages: &[ProductionEventMessage]) -> ForecastTable {
        let mut rows: Vec<ForecastRow> = messages
            .iter()
            .map(|message| ForecastRow {
                system: message.system.clone(),
                stream: message.stream.clone(),
                production_type: message.production_type.clone(),
                production_name: message.production_name.clone(),
                start_time: message.start_time,
                forecast_hour: message.forecast_hours,
                time: ceil_to_second(message.time),
                event: message.event.clone(),
                status: message.status,
            })
            .collect();

        // Stable sort: rows sharing a key keep their retrieval order, which
        // is what makes keep-first/keep-last meaningful.
        rows.sort_by_key(ForecastRow::key);
        info!(rows = rows.len(), "assembled forecast table");

        let rows = match self.policy {
            DuplicatePolicy::KeepAll => rows,
            DuplicatePolicy::KeepFirst => dedup_keep_first(rows),
            DuplicatePolicy::KeepLast => dedup_keep_last(rows),
        };
        ForecastTable { rows }
    }
}

fn dedup_keep_first(rows: Vec<ForecastRow>) -> Vec<ForecastRow> {
    let mut out: Vec<ForecastRow> = Vec::with_capacity(rows.len());
    for row in rows {
        if out.last().map(ForecastRow::key) != Some(row.key()) {
            out.push(row);
        }
    }
    out
}

fn dedup_keep_last(rows: Vec<ForecastRow>) -> Vec<ForecastRow> {
    let mut out: Vec<ForecastRow> = Vec::with_capacity(rows.len());
    for row in rows {
        if out.last().map(ForecastRow::key) == Some(row.key()) {
            out.pop();
        }
        out.push(row);
    }
    out
}
