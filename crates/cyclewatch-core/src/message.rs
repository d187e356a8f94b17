//! Message types as retrieved from the event store.
//!
//! Two upstream producers feed cyclewatch: the workflow-scheduler client,
//! which logs one message per scheduler command, and the production pipeline,
//! which logs one message per produced artifact. Both are immutable value
//! types once decoded from their stored documents.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Round a timestamp up to whole seconds.
///
/// Identity on timestamps that already sit on a second boundary; otherwise
/// the sub-second part is dropped and one second is added. Observation
/// timestamps carry microsecond noise from the producers, and all derived
/// durations are reported at second precision.
pub fn ceil_to_second(t: DateTime<Utc>) -> DateTime<Utc> {
    let truncated = t.with_nanosecond(0).unwrap_or(t);
    if truncated == t {
        t
    } else {
        truncated + chrono::Duration::seconds(1)
    }
}

/// Status of a production event, with stable numeric wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    Unknown = 0,
    Complete = 1,
    Queued = 2,
    Aborted = 3,
    Submitted = 4,
    Active = 5,
    Suspended = 6,
}

impl EventStatus {
    /// Decode a numeric wire code. Unrecognized codes map to `Unknown`.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Complete,
            2 => Self::Queued,
            3 => Self::Aborted,
            4 => Self::Submitted,
            5 => Self::Active,
            6 => Self::Suspended,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Complete => "Complete",
            Self::Queued => "Queued",
            Self::Aborted => "Aborted",
            Self::Submitted => "Submitted",
            Self::Active => "Active",
            Self::Suspended => "Suspended",
        }
    }
}

/// One workflow-scheduler client command observation.
///
/// `run_date` is the scheduler-native logical day the command belongs to.
/// It is the day-partition key for situation analysis and is distinct from
/// the calendar date of `time`: commands for one operational cycle routinely
/// execute after midnight wall-clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerClientMessage {
    pub command: String,
    pub arguments: Vec<String>,
    pub time: DateTime<Utc>,
    pub host: String,
    pub port: String,
    pub node_path: String,
    pub node_rid: String,
    pub try_no: Option<u32>,
    pub run_date: NaiveDate,
}

/// One "artifact produced" event from the production pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionEventMessage {
    pub system: String,
    pub stream: String,
    pub production_type: String,
    pub production_name: String,
    pub event: String,
    pub status: EventStatus,
    /// Cycle start time (analysis time of the forecast run).
    pub start_time: DateTime<Utc>,
    /// Forecast lead time in whole hours.
    pub forecast_hours: i64,
    /// Observation time of the event itself.
    pub time: DateTime<Utc>,
}

/// Standard-time envelope for one forecast hour within a cycle.
///
/// Bounds are durations from cycle start time, in whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleStandardTime {
    pub forecast_hour: i64,
    pub upper_seconds: i64,
    pub lower_seconds: i64,
}

/// Standard-time envelopes for one cycle start hour (e.g. "00", "12").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartHourStandardTime {
    pub start_hour: String,
    pub times: Vec<CycleStandardTime>,
}

/// Computed standard-time envelope for one production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardTimeMessage {
    pub system: String,
    pub stream: String,
    pub production_type: String,
    pub production_name: String,
    pub start_hours: Vec<StartHourStandardTime>,
}
