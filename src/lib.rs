#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Dining Philosophers
//!
//! > **Sharing a ring of locks without a global lock order.**
//!
//! This crate demonstrates deadlock avoidance on the classic dining-philosophers table using
//! Tokio. `N` philosophers sit around a table with one fork between each pair of
//! neighbours; every philosopher needs both adjacent forks to eat.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Avoidance, Not Ordering
//!
//! The textbook fix is to number the forks and always take the lower one first. This crate
//! instead lets every philosopher start with its *left* fork and recover from contention:
//! - **Try, don't wait**: the second fork is only *tried* while a retry budget remains.
//! - **Back off**: on failure the first fork goes back and the picking order is swapped.
//! - **Escalate**: once the budget is spent the philosopher waits for its second fork,
//!   always from the lower-numbered fork to the higher one, which cannot close a cycle.
//!
//! ### Guards Instead of Bookkeeping
//! Holding a fork means holding a [`ForkGuard`](model::ForkGuard). Dropping it puts the fork
//! back, so cancellation at any wait point releases whatever was held.
//!
//! ## 🚀 Core Concepts
//!
//! ### Cooperative Termination
//! There is no global stop flag. The supervisor owns a
//! [`CancellationToken`](tokio_util::sync::CancellationToken); every philosopher checks it at
//! the top of its cycle, while sleeping and while waiting for a fork.
//!
//! ### Lock-free Reporting
//! Philosophers publish their eating flag and meal count as atomics in a
//! [`SeatStatus`](model::SeatStatus). The supervisor samples them on a timer without
//! touching any fork.
//!
//! ### Mocking: Testing without LEDs
//! Status indicators are a trait. Tests plug in a recording
//! [`MockIndicator`](indicator::mock::MockIndicator) and assert on what it saw.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Table ([`model`])
//! Forks, seats and snapshots.
//! - **Key items**: [`ForkSet`](model::ForkSet), [`Seat`](model::Seat), [`Snapshot`](model::Snapshot).
//!
//! ### 2. The Algorithm ([`protocol`])
//! The deadlock-avoidance protocol for picking up two forks.
//! - **Key items**: [`AcquisitionProtocol`](protocol::AcquisitionProtocol).
//!
//! ### 3. The Actors ([`philosopher`])
//! The THINK → HUNGRY → EAT state machine, one Tokio task per seat.
//! - **Key items**: [`Philosopher`](philosopher::Philosopher), [`Timing`](philosopher::Timing).
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! Configuration, startup, periodic reporting and graceful shutdown.
//! - **Key items**: [`DiningTable`](lifecycle::DiningTable), [`TableConfig`](lifecycle::TableConfig).
//!
//! ### 5. The Outputs ([`indicator`])
//! Per-seat on/off status outputs.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Snapshots once a second until Ctrl-C
//! RUST_LOG=info cargo run
//!
//! # Every fork taken, for ten seconds, three seats
//! RUST_LOG=debug cargo run -- --seats 3 --duration-secs 10
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod error;
pub mod indicator;
pub mod lifecycle;
pub mod model;
pub mod philosopher;
pub mod protocol;
