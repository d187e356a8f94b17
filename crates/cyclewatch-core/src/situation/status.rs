//! Status-change classification.
//!
//! Maps raw scheduler command strings onto the closed input alphabet of the
//! situation machine. Classification never fails: anything outside the four
//! recognized commands is `Unknown` and is dropped from replay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::{ceil_to_second, SchedulerClientMessage};

/// One recognized scheduler status transition, plus `Unknown` for everything
/// else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusChange {
    Unknown,
    Submitted,
    Initialized,
    Completed,
    Aborted,
}

impl StatusChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Submitted => "submitted",
            Self::Initialized => "initialized",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
        }
    }
}

/// Classify a raw scheduler command string.
pub fn classify(command: &str) -> StatusChange {
    match command {
        "submit" => StatusChange::Submitted,
        "init" => StatusChange::Initialized,
        "complete" => StatusChange::Completed,
        "abort" => StatusChange::Aborted,
        _ => StatusChange::Unknown,
    }
}

/// One observed status transition, ready for replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeEvent {
    pub status: StatusChange,
    /// Observation time, ceiled to whole seconds.
    pub time: DateTime<Utc>,
}

impl StatusChangeEvent {
    pub fn new(status: StatusChange, time: DateTime<Utc>) -> Self {
        Self {
            status,
            time: ceil_to_second(time),
        }
    }

    /// Build a replay event from a stored scheduler-client message.
    pub fn from_message(message: &SchedulerClientMessage) -> Self {
        Self::new(classify(&message.command), message.time)
    }
}
