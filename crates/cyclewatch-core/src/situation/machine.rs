//! The per-day situation state machine.
//!
//! An explicit, exhaustively matched transition function over
//! `(Situation, StatusChange)`. The machine never errors on malformed input:
//! every unexpected transition routes to `Unknown`, which is sticky for the
//! remainder of the day's replay. Once an anomaly is detected, further
//! signals for that day are no longer trusted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::{StatusChange, StatusChangeEvent};
use super::timeline::{TimePeriodKind, Timeline};

/// Derived lifecycle state of a node's cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Situation {
    /// Start state; also the final situation of a day with no events.
    Initial,
    Submitted,
    Active,
    Complete,
    Error,
    Unknown,
}

impl Situation {
    /// Terminal states self-loop on every further input for the day.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Error | Self::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Submitted => "submitted",
            Self::Active => "active",
            Self::Complete => "complete",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

/// Timestamps seen so far within the current submit-to-complete cycle.
/// Reset whenever a new Submit opens a cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CycleTimes {
    submitted: Option<DateTime<Utc>>,
    initialized: Option<DateTime<Utc>>,
    completed: Option<DateTime<Utc>>,
    aborted: Option<DateTime<Utc>>,
}

/// Per-day DFA folding status-change events into a situation and timeline.
///
/// One instance per calendar day; there is no cross-day carry-over of cycle
/// state or situation.
#[derive(Debug, Clone)]
pub struct SituationMachine {
    state: Situation,
    cycle: CycleTimes,
    timeline: Timeline,
}

impl Default for SituationMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SituationMachine {
    pub fn new() -> Self {
        Self {
            state: Situation::Initial,
            cycle: CycleTimes::default(),
            timeline: Timeline::new(),
        }
    }

    pub fn state(&self) -> Situation {
        self.state
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn into_timeline(self) -> Timeline {
        self.timeline
    }

    /// Feed one event through the transition table.
    ///
    /// Unclassifiable input (`StatusChange::Unknown`) is ignored entirely:
    /// no state change, no recorded point. Terminal states self-loop with no
    /// side effect.
    pub fn apply(&mut self, event: &StatusChangeEvent) {
        if event.status == StatusChange::Unknown {
            return;
        }
        if self.state.is_terminal() {
            return;
        }
        self.state = match (self.state, event.status) {
            (Situation::Initial, StatusChange::Submitted) => {
                self.timeline.record_point(event.status, event.time);
                self.cycle = CycleTimes {
                    submitted: Some(event.time),
                    ..CycleTimes::default()
                };
                Situation::Submitted
            }
            // Activity with no observed submit.
            (Situation::Initial, _) => Situation::Unknown,

            (Situation::Submitted, StatusChange::Initialized) => {
                self.timeline.record_point(event.status, event.time);
                self.cycle.initialized = Some(event.time);
                Situation::Active
            }
            (Situation::Submitted, StatusChange::Aborted) => {
                self.timeline.record_point(event.status, event.time);
                self.cycle.aborted = Some(event.time);
                Situation::Error
            }
            // Duplicate submit, or complete before init.
            (Situation::Submitted, _) => Situation::Unknown,

            (Situation::Active, StatusChange::Completed) => {
                self.timeline.record_point(event.status, event.time);
                self.cycle.completed = Some(event.time);
                self.emit_periods();
                Situation::Complete
            }
            (Situation::Active, StatusChange::Aborted) => {
                self.timeline.record_point(event.status, event.time);
                self.cycle.aborted = Some(event.time);
                Situation::Error
            }
            // Duplicate signal while already active.
            (Situation::Active, _) => Situation::Unknown,

            // Unreachable: terminal states returned above, Unknown input
            // returned above.
            (state, _) => state,
        };
    }

    /// Emit the derived periods on the Active -> Complete transition.
    ///
    /// `Total` runs from the submit time (falling back to the init time when
    /// no submit was recorded for the cycle) to completion; `Queued` is
    /// emitted only when a submit time exists; `Active` always. Append order
    /// is Total, Queued, Active.
    fn emit_periods(&mut self) {
        let Some(completed) = self.cycle.completed else {
            return;
        };
        let Some(initialized) = self.cycle.initialized else {
            // Entered Active without a recorded init: nothing to bound the
            // periods with. Not reachable under normal replay.
            return;
        };
        match self.cycle.submitted {
            Some(submitted) => {
                self.timeline
                    .record_period(TimePeriodKind::Total, submitted, completed);
                self.timeline
                    .record_period(TimePeriodKind::Queued, submitted, initialized);
            }
            None => {
                self.timeline
                    .record_period(TimePeriodKind::Total, initialized, completed);
            }
        }
        self.timeline
            .record_period(TimePeriodKind::Active, initialized, completed);
    }
}
