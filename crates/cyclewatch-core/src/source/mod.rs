//! Event-source adapters.
//!
//! Each upstream event schema gets one [`EventSource`] implementation that
//! knows how to build its search query body, resolve the index partitions
//! covering a time selector, and decode a stored document into a typed
//! message. Everything above the source layer depends only on the trait.

mod monitor;
mod native;
mod scheduler;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use crate::error::SourceError;

pub use monitor::MonitorProductionSource;
pub use native::NativeProductionSource;
pub use scheduler::{SchedulerClientQuery, SchedulerClientSource};

/// Selects cycle start times (or run dates) to retrieve events for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeSelector {
    Single(DateTime<Utc>),
    List(Vec<DateTime<Utc>>),
    /// Inclusive on both ends, matching the backend's range semantics.
    Range(DateTime<Utc>, DateTime<Utc>),
}

impl TimeSelector {
    /// All day-granular instants the selector covers, in order. Used by
    /// sources to resolve per-period index partitions.
    pub fn days(&self) -> Vec<DateTime<Utc>> {
        match self {
            Self::Single(t) => vec![*t],
            Self::List(times) => times.clone(),
            Self::Range(start, end) => {
                let mut days = Vec::new();
                let mut current = *start;
                while current <= *end {
                    days.push(current);
                    current += Duration::days(1);
                }
                days
            }
        }
    }
}

/// Deduplicate index names while preserving first-seen order. Monthly
/// partitions repeat once per day in a range selector.
pub(crate) fn dedup_indices(indices: Vec<String>) -> Vec<String> {
    let mut seen = Vec::new();
    for index in indices {
        if !seen.contains(&index) {
            seen.push(index);
        }
    }
    seen
}

/// Query parameters for production-event retrieval, shared by all
/// production sources.
#[derive(Debug, Clone, Default)]
pub struct ProductionQuery {
    pub system: String,
    pub stream: Option<String>,
    pub production_type: Option<String>,
    pub production_name: Option<String>,
    pub start_time: Option<TimeSelector>,
    pub forecast_time: Option<String>,
}

/// Capability interface for one upstream event schema.
pub trait EventSource {
    type Query;
    type Message;

    /// Build the search query body for the backend.
    fn build_query(&self, query: &Self::Query) -> Value;

    /// Index names covering the given time selector, deduplicated.
    fn resolve_partitions(&self, selector: &TimeSelector) -> Vec<String>;

    /// Decode one stored document into a message.
    fn parse_event(&self, doc: &Value) -> Result<Self::Message, SourceError>;

    /// Map a user-facing system name onto this source's canonical name.
    /// Identity by default.
    fn canonical_system(&self, system: &str) -> String {
        system.to_string()
    }
}

pub(crate) fn str_field<'a>(doc: &'a Value, field: &str) -> Result<&'a str, SourceError> {
    doc.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| SourceError::missing(field))
}

pub(crate) fn parse_time(raw: &str, field: &str) -> Result<DateTime<Utc>, SourceError> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // Stored timestamps come with and without an explicit offset.
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| naive.and_utc())
        })
        .map_err(|e| SourceError::invalid(field, e.to_string()))
}
