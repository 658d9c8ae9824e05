//! Shared per-run state: dedup index, structured log, run context

mod context;
mod dedup;
mod log;

pub use context::RunContext;
pub use dedup::{DedupIndex, ItemKey};
pub use log::{LogLevel, LogStatement, RunLog};
