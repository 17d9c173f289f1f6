//! Core types: events, today filter, terminal formatting

pub mod event;
pub mod filter;
pub mod format;
pub mod tracing;

pub use crate::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use event::{Event, EventStart};
pub use filter::remaining_today;
pub use format::format_event;
