//! The fork acquisition protocol.
//!
//! See [`AcquisitionProtocol`] for the algorithm. This is the only place where a
//! philosopher blocks on a fork.

pub mod acquire;

pub use acquire::*;
