//! Application layer - configuration, deduplication, dispatch and scheduling.

pub mod config;
mod dispatcher;
mod engine;
mod escalation;
mod monitor;
mod registry;

pub use config::Config;
pub use dispatcher::{AlertDispatcher, DispatchReport};
pub use engine::{CycleEngine, CycleReport, CycleSettings, SourceEntry};
pub use escalation::EscalationPolicy;
pub use monitor::{Monitor, MonitorState, MonitorStats};
pub use registry::{DedupRegistry, RETENTION};
