//! Menu state machine
//!
//! The engine owns the current state and selection. Everything it acts on
//! (heater, cycle timer, thermocouples) is borrowed through a
//! [`MenuContext`] for the duration of one transition or render.

pub mod engine;
pub mod state;

pub use engine::{MenuContext, MenuEngine, MenuError};
pub use state::{Action, Layout, MenuState};
