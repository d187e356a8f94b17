//! # Cyclewatch Core Library
//!
//! This library tracks the lifecycle of scheduled weather-forecast production
//! jobs. A workflow-scheduler client emits status-change events and the
//! production pipeline emits "artifact produced" events; cyclewatch turns the
//! resulting event stream into operational insight: when did a forecast cycle
//! finish, how does that compare to historical norms, and what is a job's
//! state-in-time.
//!
//! ## Architecture
//!
//! - **Situation engine**: a deterministic finite-state machine that folds an
//!   ordered per-day event sequence into a derived situation plus a timeline
//!   of named time periods
//! - **Sources**: one [`EventSource`] adapter per upstream event schema,
//!   producing typed messages from stored documents
//! - **Store**: paginated full-text search retrieval, generic over a source
//! - **Processors**: tabular reshaping of production events and the
//!   bootstrap-resampled standard-time envelope
//! - **Presenters**: print / CSV / JSON output of the forecast table
//!
//! ## Key Components
//!
//! - [`SituationMachine`]: the per-day state machine
//! - [`SituationCalculator`]: per-day replay across a date range
//! - [`EsStore`]: search-backend retrieval
//! - [`TableProcessor`] / [`StandardTimeProcessor`]: event reshaping

pub mod config;
pub mod error;
pub mod message;
pub mod presenter;
pub mod processor;
pub mod situation;
pub mod source;
pub mod store;

pub use config::Config;
pub use error::{ConfigError, CoreError, Result, SourceError, StoreError, ValidationError};
pub use message::{
    ceil_to_second, EventStatus, ProductionEventMessage, SchedulerClientMessage,
    StandardTimeMessage,
};
pub use presenter::{ExportFormat, FileExportPresenter, Presenter, PrintPresenter};
pub use processor::{
    DuplicatePolicy, ForecastRow, ForecastTable, StandardTimeProcessor, TableProcessor,
};
pub use situation::{
    Situation, SituationCalculator, SituationMachine, SituationResult, StatusChange,
    StatusChangeEvent, TimePeriod, TimePeriodKind, TimePoint, Timeline,
};
pub use source::{
    EventSource, MonitorProductionSource, NativeProductionSource, ProductionQuery,
    SchedulerClientQuery, SchedulerClientSource, TimeSelector,
};
pub use store::EsStore;
