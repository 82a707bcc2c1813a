//! # Mock Indicator
//!
//! Utilities for observing philosophers in tests.
//!
//! [`MockIndicator`] records every switch it receives. Clones share the same log, so
//! keep one handle in the test and give the other to the table.
//!
//! # Example
//! ```ignore
//! let indicator = MockIndicator::new();
//! let table = DiningTable::start(config, Arc::new(indicator.clone()))?;
//! // ... let it run ...
//! table.shutdown().await?;
//! indicator.verify();
//! ```

use super::{Indicator, IndicatorError, IndicatorState};
use crate::model::SeatId;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

/// A recording indicator with optional failure injection.
#[derive(Debug, Clone, Default)]
pub struct MockIndicator {
    log: Arc<Mutex<Vec<(SeatId, IndicatorState)>>>,
    failing: bool,
}

impl MockIndicator {
    /// Creates an indicator that accepts every update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an indicator that records every update and then reports it as failed.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    fn log(&self) -> MutexGuard<'_, Vec<(SeatId, IndicatorState)>> {
        self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Every update received so far, in arrival order.
    pub fn transitions(&self) -> Vec<(SeatId, IndicatorState)> {
        self.log().clone()
    }

    /// Updates received for one seat, in arrival order.
    pub fn transitions_for(&self, seat: SeatId) -> Vec<IndicatorState> {
        self.log()
            .iter()
            .filter(|(s, _)| *s == seat)
            .map(|(_, state)| *state)
            .collect()
    }

    /// Number of times `seat` was switched on.
    pub fn times_on(&self, seat: SeatId) -> usize {
        self.transitions_for(seat)
            .into_iter()
            .filter(|state| *state == IndicatorState::On)
            .count()
    }

    /// Asserts that every seat alternated on/off, starting with on and ending off.
    ///
    /// # Panics
    /// Panics with the offending seat's history otherwise.
    pub fn verify(&self) {
        let mut seats: Vec<SeatId> = self.log().iter().map(|(seat, _)| *seat).collect();
        seats.sort();
        seats.dedup();

        for seat in seats {
            let history = self.transitions_for(seat);
            let alternates = history.iter().enumerate().all(|(i, state)| {
                let expected = if i % 2 == 0 {
                    IndicatorState::On
                } else {
                    IndicatorState::Off
                };
                *state == expected
            });
            assert!(
                alternates && history.len() % 2 == 0,
                "seat {seat} indicator history is unbalanced: {history:?}"
            );
        }
    }
}

#[async_trait]
impl Indicator for MockIndicator {
    async fn set(&self, seat: SeatId, state: IndicatorState) -> Result<(), IndicatorError> {
        self.log().push((seat, state));
        if self.failing {
            return Err(IndicatorError::Unavailable {
                seat,
                reason: "mock failure".to_string(),
            });
        }
        Ok(())
    }
}
