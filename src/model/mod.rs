//! Shared data of the table: the forks, the seats, and the status snapshots
//! read by the supervisor.

pub mod fork;
pub mod seat;

pub use fork::*;
pub use seat::*;
