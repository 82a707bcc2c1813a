//! # Table Lifecycle & Orchestration
//!
//! This module manages the runtime lifecycle of the table: seating the philosophers,
//! reporting on them while they run, and winding them down on request.
//!
//! **Key Responsibilities:**
//! 1. **Configuration** - [`TableConfig`] describes the ring, timing and protocol budget
//! 2. **Startup** - [`DiningTable::start`] lays out the forks and spawns one task per seat
//! 3. **Reporting** - [`DiningTable::run_until`] emits a [`Snapshot`](crate::model::Snapshot)
//!    on a fixed period
//! 4. **Graceful Shutdown** - [`DiningTable::shutdown`] cancels and awaits every philosopher
//! 5. **Observability Setup** - [`setup_tracing`] initialises logging
//!
//! ## Startup Is All Or Nothing
//!
//! A partially seated ring would break the adjacency every philosopher relies on, so
//! [`DiningTable::start`] validates the configuration and wires every seat before the
//! first task is spawned. Any failure returns a [`TableError`](crate::error::TableError)
//! with nothing left running.
//!
//! ## Graceful Shutdown
//!
//! Termination is cooperative. The table owns a
//! [`CancellationToken`](tokio_util::sync::CancellationToken) and hands a child token to
//! every philosopher:
//!
//! 1. **Cancel** - the supervisor cancels its token
//! 2. **Philosophers notice** - at the top of each cycle, during sleeps, and while waiting
//!    for a fork
//! 3. **Forks go back** - every held fork is a guard, dropped on the way out
//! 4. **Await completion** - the supervisor joins every task before returning
//!
//! ```rust,ignore
//! let table = DiningTable::start(config, Arc::new(LogIndicator))?;
//! let last = table.run_until(tokio::signal::ctrl_c()).await?;
//! ```

pub mod config;
pub mod dining_table;
pub mod tracing;

pub use self::config::*;
pub use self::dining_table::*;
pub use self::tracing::*;
