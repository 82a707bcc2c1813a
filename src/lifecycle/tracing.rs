//! # Observability & Tracing
//!
//! This module provides the tracing infrastructure for the whole table.
//!
//! ## Overview
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate.
//! Every philosopher logs with a `philosopher` field, so a single seat can be followed
//! through the interleaved output.
//!
//! ## Configuration
//!
//! The compact format hides the crate/module prefix (`with_target(false)`); the
//! `philosopher` field already says where an event comes from.
//!
//! - **Structured logging** with `tracing` crate
//! - **Configurable log levels** via `RUST_LOG` environment variable
//! - **Compact format** optimized for watching a run scroll by
//!
//! ## What Gets Traced
//!
//! | Level   | Events |
//! |---------|--------|
//! | `info`  | Startup/shutdown banners, periodic snapshots, philosophers sitting down and leaving |
//! | `debug` | Thinking, hungry, eating, each fork taken, each switch of picking order |
//! | `trace` | Escalated waits on a second fork |
//! | `warn`  | Indicator failures, forks still held after shutdown |
//! | `error` | Philosopher tasks that panicked |
//!
//! ## Usage Examples
//!
//! ```bash
//! # Snapshots only
//! RUST_LOG=info cargo run
//!
//! # Every state transition and retry
//! RUST_LOG=debug cargo run
//!
//! # Filter to the protocol
//! RUST_LOG=dining_philosophers::protocol=trace cargo run
//! ```
//!
//! ## Workflow Trace Example
//!
//! **With `RUST_LOG=debug`**:
//!
//! ```text
//! DEBUG philosopher: Hungry name=Plato
//! DEBUG philosopher: Takes fork side=left fork=1 name=Plato
//! DEBUG philosopher: Switching fork picking order budget=2 name=Plato
//! DEBUG philosopher: Takes fork side=right fork=2 name=Plato
//! DEBUG philosopher: Takes fork side=left fork=1 name=Plato
//! DEBUG philosopher: Eating forks=(2, 1) meals=4 name=Plato
//!  INFO Hello dining philosophers snapshot=eating=01001 meals=[3 4 2 5 3]
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
