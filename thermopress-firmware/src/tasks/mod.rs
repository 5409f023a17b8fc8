//! Embassy tasks

mod control;

pub use control::{control_task, SpiBus, TICK_INTERVAL_MS};
