//! # Acquiring Two Forks
//!
//! A hungry philosopher needs both of its forks. Grabbing them in a fixed left-then-right
//! order lets all philosophers hold their left fork and wait forever for the right one.
//! [`AcquisitionProtocol`] avoids that circular wait without a global lock order:
//!
//! 1. Start with `(primary, secondary) = (left, right)` and a retry budget (default 2).
//! 2. Wait for `primary`. Holding nothing while waiting, this wait cannot close a cycle.
//! 3. While budget remains, only *try* `secondary`. On failure put `primary` back, swap
//!    the pair, spend one retry and go back to step 2.
//! 4. With the budget spent, escalate: wait for `secondary` while holding `primary`.
//!
//! Escalated waits always go from the lower fork index to the higher one: before the
//! escalated round the pair is ordered by index, so step 4 does not simply wait on
//! whichever fork the last swap left as `secondary`. Waiting on the plain `secondary`
//! still allows every philosopher to escalate in the same rotational direction and close
//! a cycle. With the ordering, a cycle of waits would need every member to wait upward
//! from the fork it holds, which a ring cannot provide, so no deadlock can form even when
//! every philosopher escalates at once.
//!
//! Termination is checked before every round and at both wait points. An abandoned
//! acquisition drops whatever it holds before returning.

use crate::model::{Fork, ForkGuard, Seat, Side};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Retries before escalating to a blocking wait on the second fork.
pub const DEFAULT_RETRY_BUDGET: u32 = 2;

/// Why an acquisition did not complete.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AcquireError {
    /// Termination was requested before both forks were held. Nothing is held.
    #[error("Acquisition abandoned: termination requested")]
    Abandoned,
}

/// Both forks of a seat, held together.
#[must_use = "dropping the forks puts them back on the table"]
#[derive(Debug)]
pub struct HeldForks {
    first: ForkGuard,
    second: ForkGuard,
}

impl HeldForks {
    /// Fork indices in the order they were picked up.
    pub fn indices(&self) -> (usize, usize) {
        (self.first.fork_index(), self.second.fork_index())
    }

    /// Puts both forks back, last taken first.
    pub fn release(self) {
        let Self { first, second } = self;
        drop(second);
        drop(first);
    }
}

/// Result of a successful acquisition.
#[derive(Debug)]
pub struct Acquisition {
    pub forks: HeldForks,
    /// How many times the picking order was switched.
    pub retries: u32,
    /// Whether the second fork was taken with a blocking wait.
    pub escalated: bool,
}

#[derive(Clone, Copy)]
struct Choice<'a> {
    side: Side,
    fork: &'a Fork,
}

/// The per-philosopher deadlock-avoidance algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquisitionProtocol {
    retry_budget: u32,
}

impl Default for AcquisitionProtocol {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_BUDGET)
    }
}

impl AcquisitionProtocol {
    pub fn new(retry_budget: u32) -> Self {
        Self { retry_budget }
    }

    pub fn retry_budget(&self) -> u32 {
        self.retry_budget
    }

    /// Acquires both of `seat`'s forks.
    ///
    /// `left` and `right` must be the forks at `seat.left()` and `seat.right()`.
    pub async fn acquire(
        &self,
        seat: &Seat,
        left: &Fork,
        right: &Fork,
        cancel: &CancellationToken,
    ) -> Result<Acquisition, AcquireError> {
        debug_assert_eq!(left.index(), seat.left());
        debug_assert_eq!(right.index(), seat.right());

        let mut primary = Choice { side: Side::Left, fork: left };
        let mut secondary = Choice { side: Side::Right, fork: right };
        let mut budget = self.retry_budget;
        let mut retries = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(AcquireError::Abandoned);
            }

            let escalated = budget == 0;
            if escalated && primary.fork.index() > secondary.fork.index() {
                std::mem::swap(&mut primary, &mut secondary);
            }

            let first = primary
                .fork
                .acquire_or_cancel(seat.id(), cancel)
                .await
                .ok_or(AcquireError::Abandoned)?;
            debug!(side = %primary.side, fork = seat.fork(primary.side), "Takes fork");

            let second = if escalated {
                trace!(fork = seat.fork(secondary.side), "Waiting for second fork");
                // `first` is dropped with the error, so an abandoned wait holds nothing.
                secondary
                    .fork
                    .acquire_or_cancel(seat.id(), cancel)
                    .await
                    .ok_or(AcquireError::Abandoned)?
            } else {
                match secondary.fork.try_acquire(seat.id()) {
                    Some(second) => second,
                    None => {
                        drop(first);
                        debug!(budget, "Switching fork picking order");
                        std::mem::swap(&mut primary, &mut secondary);
                        budget -= 1;
                        retries += 1;
                        continue;
                    }
                }
            };
            debug!(side = %secondary.side, fork = seat.fork(secondary.side), "Takes fork");

            return Ok(Acquisition {
                forks: HeldForks { first, second },
                retries,
                escalated,
            });
        }
    }
}
