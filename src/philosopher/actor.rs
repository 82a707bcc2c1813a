//! # Philosopher
//!
//! A [`Philosopher`] runs in its own Tokio task and cycles through
//!
//! ```text
//! THINK ──► HUNGRY ──► EAT ──► (release both forks) ──► THINK
//! ```
//!
//! - **THINK**: holds nothing and sleeps for a random duration.
//! - **HUNGRY**: runs the [`AcquisitionProtocol`]; the only state that waits on forks.
//! - **EAT**: marks itself eating, counts the meal, switches its indicator on, sleeps,
//!   switches the indicator off, clears the eating flag and puts both forks back.
//!
//! The cancellation token is checked at the top of every cycle, during both sleeps and
//! at the protocol's wait points. Whatever state it is in, a philosopher leaves the
//! table holding no fork.

use crate::indicator::{Indicator, IndicatorState};
use crate::model::{Fork, Seat, SeatStatus};
use crate::philosopher::{SleepRange, Timing};
use crate::protocol::{AcquireError, AcquisitionProtocol, HeldForks};
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One philosopher: a seat, its two forks and its private random source.
pub struct Philosopher {
    seat: Seat,
    left: Fork,
    right: Fork,
    status: Arc<SeatStatus>,
    protocol: AcquisitionProtocol,
    timing: Timing,
    rng: StdRng,
    indicator: Arc<dyn Indicator>,
}

impl Philosopher {
    /// Seats a philosopher between `left` and `right`.
    ///
    /// Returns `None` if the forks are not the ones at `seat.left()` and `seat.right()`.
    pub fn new(
        seat: Seat,
        left: Fork,
        right: Fork,
        protocol: AcquisitionProtocol,
        timing: Timing,
        rng: StdRng,
        indicator: Arc<dyn Indicator>,
    ) -> Option<Self> {
        if left.index() != seat.left() || right.index() != seat.right() {
            return None;
        }
        Some(Self {
            seat,
            left,
            right,
            status: Arc::new(SeatStatus::default()),
            protocol,
            timing,
            rng,
            indicator,
        })
    }

    pub fn seat(&self) -> &Seat {
        &self.seat
    }

    /// Shared handle to the counters this philosopher publishes.
    pub fn status(&self) -> Arc<SeatStatus> {
        self.status.clone()
    }

    /// Runs the think/eat cycle until `cancel` fires.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(left = self.seat.left(), right = self.seat.right(), "Seated");

        while !cancel.is_cancelled() {
            debug!("Thinking");
            if !self.pause(self.timing.think, &cancel).await {
                break;
            }

            debug!("Hungry");
            let acquisition = match self
                .protocol
                .acquire(&self.seat, &self.left, &self.right, &cancel)
                .await
            {
                Ok(acquisition) => acquisition,
                Err(AcquireError::Abandoned) => {
                    debug!("Gave up waiting for forks");
                    break;
                }
            };
            self.status
                .record_acquisition(acquisition.retries, acquisition.escalated);

            self.eat(acquisition.forks, &cancel).await;
        }

        info!(meals = self.status.meals(), "Left the table");
    }

    async fn eat(&mut self, forks: HeldForks, cancel: &CancellationToken) {
        self.status.begin_meal();
        self.signal(IndicatorState::On).await;
        debug!(forks = ?forks.indices(), meals = self.status.meals(), "Eating");

        // Cut short on cancellation; the forks are released below either way.
        self.pause(self.timing.eat, cancel).await;

        self.signal(IndicatorState::Off).await;
        self.status.end_meal();
        forks.release();
    }

    async fn signal(&self, state: IndicatorState) {
        if let Err(e) = self.indicator.set(self.seat.id(), state).await {
            warn!(error = %e, "Indicator update failed");
        }
    }

    /// Sleeps for a random duration from `range`. Returns `false` if cancelled first.
    async fn pause(&mut self, range: SleepRange, cancel: &CancellationToken) -> bool {
        let duration = range.sample(&mut self.rng);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(duration) => true,
        }
    }
}
