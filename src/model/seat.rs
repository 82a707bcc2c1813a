//! # Seats & Status
//!
//! A [`Seat`] is the fixed place of one philosopher at the table: its identity and the
//! indices of the two forks next to it. [`SeatStatus`] holds the counters the
//! philosopher publishes while it runs, and [`Snapshot`] is the supervisor's periodic
//! view of all of them.
//!
//! Status counters are written only by the owning philosopher and read without locking.
//! A reader may see slightly stale values; that only affects reporting.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Position of a philosopher at the table, `0..n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SeatId(pub usize);

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which of a seat's two forks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Identity and fork wiring of one seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    id: SeatId,
    name: String,
    left: usize,
    right: usize,
}

impl Seat {
    /// Seat `index` at a table of `seat_count`: left fork `index`, right fork `(index + 1) % seat_count`.
    pub fn new(index: usize, name: impl Into<String>, seat_count: usize) -> Self {
        debug_assert!(index < seat_count);
        Self {
            id: SeatId(index),
            name: name.into(),
            left: index,
            right: (index + 1) % seat_count,
        }
    }

    pub fn id(&self) -> SeatId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn left(&self) -> usize {
        self.left
    }

    pub fn right(&self) -> usize {
        self.right
    }

    pub fn fork(&self, side: Side) -> usize {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// Counters published by a running philosopher.
#[derive(Debug, Default)]
pub struct SeatStatus {
    eating: AtomicBool,
    meals: AtomicU64,
    retries: AtomicU64,
    escalations: AtomicU64,
}

impl SeatStatus {
    pub fn is_eating(&self) -> bool {
        self.eating.load(Ordering::Relaxed)
    }

    pub fn meals(&self) -> u64 {
        self.meals.load(Ordering::Relaxed)
    }

    /// Failed second-fork attempts that made the philosopher switch picking order.
    pub fn retries(&self) -> u64 {
        self.retries.load(Ordering::Relaxed)
    }

    /// Acquisitions that ended in a blocking wait on the second fork.
    pub fn escalations(&self) -> u64 {
        self.escalations.load(Ordering::Relaxed)
    }

    pub(crate) fn begin_meal(&self) {
        self.eating.store(true, Ordering::Relaxed);
        self.meals.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn end_meal(&self) {
        self.eating.store(false, Ordering::Relaxed);
    }

    pub(crate) fn record_acquisition(&self, retries: u32, escalated: bool) {
        self.retries.fetch_add(u64::from(retries), Ordering::Relaxed);
        if escalated {
            self.escalations.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Point-in-time view of one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatSnapshot {
    pub name: String,
    pub eating: bool,
    pub meals: u64,
    pub retries: u64,
    pub escalations: u64,
}

impl SeatSnapshot {
    pub fn capture(seat: &Seat, status: &SeatStatus) -> Self {
        Self {
            name: seat.name().to_string(),
            eating: status.is_eating(),
            meals: status.meals(),
            retries: status.retries(),
            escalations: status.escalations(),
        }
    }
}

/// Point-in-time view of the whole table, seats in index order.
///
/// Renders as `eating=01000 meals=[3 1 4 1 5]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub seats: Vec<SeatSnapshot>,
}

impl Snapshot {
    pub fn total_meals(&self) -> u64 {
        self.seats.iter().map(|s| s.meals).sum()
    }

    pub fn anyone_eating(&self) -> bool {
        self.seats.iter().any(|s| s.eating)
    }

    pub fn meals(&self) -> Vec<u64> {
        self.seats.iter().map(|s| s.meals).collect()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("eating=")?;
        for seat in &self.seats {
            f.write_str(if seat.eating { "1" } else { "0" })?;
        }
        f.write_str(" meals=[")?;
        for (i, seat) in self.seats.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", seat.meals)?;
        }
        f.write_str("]")
    }
}
