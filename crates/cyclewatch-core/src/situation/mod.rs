//! Task-situation inference.
//!
//! Folds an ordered sequence of scheduler status-change events for one
//! workflow node on one operational day into a derived situation plus a
//! timeline of named time periods.

mod calculator;
mod machine;
mod status;
mod timeline;

pub use calculator::{SituationCalculator, SituationResult};
pub use machine::{Situation, SituationMachine};
pub use status::{classify, StatusChange, StatusChangeEvent};
pub use timeline::{TimePeriod, TimePeriodKind, TimePoint, Timeline};
