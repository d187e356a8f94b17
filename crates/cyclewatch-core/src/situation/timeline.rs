//! Timeline record: the derived output of one day's replay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::StatusChange;

/// Kind of a derived time period within a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriodKind {
    /// Submit (or first observed activity) to completion.
    Total,
    /// Submit to start of execution.
    Queued,
    /// Start of execution to completion.
    Active,
}

/// One recorded status change, as folded into the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePoint {
    pub status: StatusChange,
    pub time: DateTime<Utc>,
}

/// One derived named interval, bounded by recorded event times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriod {
    pub kind: TimePeriodKind,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Accumulated output of one day's replay.
///
/// Both sequences are append-only during replay and never mutated once
/// appended; `PartialEq` makes determinism directly assertable in tests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub points: Vec<TimePoint>,
    pub periods: Vec<TimePeriod>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.periods.is_empty()
    }

    pub(super) fn record_point(&mut self, status: StatusChange, time: DateTime<Utc>) {
        self.points.push(TimePoint { status, time });
    }

    pub(super) fn record_period(
        &mut self,
        kind: TimePeriodKind,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) {
        self.periods.push(TimePeriod {
            kind,
            start_time,
            end_time,
        });
    }
}
