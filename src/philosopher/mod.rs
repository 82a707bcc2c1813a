//! Philosopher state machine and its timing.

pub mod actor;
pub mod timing;

pub use actor::*;
pub use timing::*;
