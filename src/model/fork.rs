//! # Forks
//!
//! A [`Fork`] is a binary mutual-exclusion resource shared by two neighbouring seats.
//! Holding a fork means holding a [`ForkGuard`]; dropping the guard puts the fork back
//! on the table, so no code path can leak a hold.
//!
//! Besides the lock itself, every fork keeps a few observational values that can be
//! read without touching the lock:
//!
//! - the seat currently holding it ([`Fork::holder`])
//! - how many times it was picked up and put down ([`Fork::acquisitions`], [`Fork::releases`])
//!
//! These are never used for correctness, only for reporting and tests.

use crate::error::TableError;
use crate::model::SeatId;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio_util::sync::CancellationToken;

const NO_HOLDER: usize = usize::MAX;

#[derive(Debug)]
struct ForkState {
    holder: AtomicUsize,
    acquisitions: AtomicU64,
    releases: AtomicU64,
}

/// One fork on the table.
///
/// Cloning a `Fork` yields another handle to the same fork.
#[derive(Debug, Clone)]
pub struct Fork {
    index: usize,
    lock: Arc<Mutex<()>>,
    state: Arc<ForkState>,
}

impl Fork {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            lock: Arc::new(Mutex::new(())),
            state: Arc::new(ForkState {
                holder: AtomicUsize::new(NO_HOLDER),
                acquisitions: AtomicU64::new(0),
                releases: AtomicU64::new(0),
            }),
        }
    }

    /// Position of this fork in the ring.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Waits until the fork is free and picks it up.
    pub async fn acquire(&self, seat: SeatId) -> ForkGuard {
        let permit = self.lock.clone().lock_owned().await;
        ForkGuard::new(self, seat, permit)
    }

    /// Picks the fork up only if nobody holds it. Never suspends.
    pub fn try_acquire(&self, seat: SeatId) -> Option<ForkGuard> {
        self.lock
            .clone()
            .try_lock_owned()
            .ok()
            .map(|permit| ForkGuard::new(self, seat, permit))
    }

    /// Like [`Fork::acquire`], but gives up as soon as `cancel` fires.
    ///
    /// Returns `None` when cancelled; in that case the fork was not taken.
    pub async fn acquire_or_cancel(
        &self,
        seat: SeatId,
        cancel: &CancellationToken,
    ) -> Option<ForkGuard> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            guard = self.acquire(seat) => Some(guard),
        }
    }

    /// The seat currently holding this fork, if any.
    pub fn holder(&self) -> Option<SeatId> {
        match self.state.holder.load(Ordering::Acquire) {
            NO_HOLDER => None,
            seat => Some(SeatId(seat)),
        }
    }

    pub fn is_free(&self) -> bool {
        self.holder().is_none()
    }

    /// Total number of times the fork was picked up.
    pub fn acquisitions(&self) -> u64 {
        self.state.acquisitions.load(Ordering::Acquire)
    }

    /// Total number of times the fork was put back.
    pub fn releases(&self) -> u64 {
        self.state.releases.load(Ordering::Acquire)
    }
}

/// Proof that a seat holds a fork. The fork is released when the guard is dropped.
#[must_use = "dropping the guard puts the fork back immediately"]
#[derive(Debug)]
pub struct ForkGuard {
    fork: usize,
    state: Arc<ForkState>,
    // Dropped after `Drop::drop` has cleared the holder.
    _permit: OwnedMutexGuard<()>,
}

impl ForkGuard {
    fn new(fork: &Fork, seat: SeatId, permit: OwnedMutexGuard<()>) -> Self {
        let previous = fork.state.holder.swap(seat.0, Ordering::AcqRel);
        debug_assert_eq!(previous, NO_HOLDER, "fork {} taken while held", fork.index);
        fork.state.acquisitions.fetch_add(1, Ordering::AcqRel);
        Self {
            fork: fork.index,
            state: fork.state.clone(),
            _permit: permit,
        }
    }

    pub fn fork_index(&self) -> usize {
        self.fork
    }
}

impl Drop for ForkGuard {
    fn drop(&mut self) {
        self.state.holder.store(NO_HOLDER, Ordering::Release);
        self.state.releases.fetch_add(1, Ordering::AcqRel);
    }
}

/// The ring of forks. Fork `i` sits between seat `i` and seat `(i + 1) % n`.
#[derive(Debug, Clone)]
pub struct ForkSet {
    forks: Vec<Fork>,
}

impl ForkSet {
    /// Lays `count` forks on the table.
    ///
    /// A ring needs at least two forks; anything smaller is rejected before
    /// any fork is handed out.
    pub fn new(count: usize) -> Result<Self, TableError> {
        if count < 2 {
            return Err(TableError::ResourceInit(format!(
                "a ring needs at least 2 forks, got {count}"
            )));
        }
        Ok(Self {
            forks: (0..count).map(Fork::new).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.forks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Fork> {
        self.forks.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fork> {
        self.forks.iter()
    }

    /// True when nobody holds any fork.
    pub fn all_free(&self) -> bool {
        self.forks.iter().all(Fork::is_free)
    }

    /// Current holder of every fork, in ring order.
    pub fn holders(&self) -> Vec<Option<SeatId>> {
        self.forks.iter().map(Fork::holder).collect()
    }

    /// True when every pick-up has been matched by a put-down.
    pub fn is_balanced(&self) -> bool {
        self.forks
            .iter()
            .all(|fork| fork.acquisitions() == fork.releases())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_ring_needs_two_forks() {
        assert!(matches!(ForkSet::new(0), Err(TableError::ResourceInit(_))));
        assert!(matches!(ForkSet::new(1), Err(TableError::ResourceInit(_))));

        let forks = ForkSet::new(5).unwrap();
        assert_eq!(forks.len(), 5);
        assert!(forks.all_free());
        assert!(forks.iter().enumerate().all(|(i, f)| f.index() == i));
    }

    #[tokio::test]
    async fn test_fork_is_exclusive_until_guard_dropped() {
        let fork = Fork::new(0);

        let guard = fork.acquire(SeatId(1)).await;
        assert_eq!(fork.holder(), Some(SeatId(1)));
        assert_eq!(guard.fork_index(), 0);

        // A neighbour cannot take it while held.
        assert!(fork.try_acquire(SeatId(0)).is_none());
        assert_eq!(fork.holder(), Some(SeatId(1)));

        drop(guard);
        assert!(fork.is_free());

        let guard = fork.try_acquire(SeatId(0)).expect("fork should be free");
        assert_eq!(fork.holder(), Some(SeatId(0)));
        drop(guard);

        assert_eq!(fork.acquisitions(), 2);
        assert_eq!(fork.releases(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_waits_for_release() {
        let fork = Fork::new(3);
        let held = fork.acquire(SeatId(3)).await;

        let waiter = {
            let fork = fork.clone();
            tokio::spawn(async move {
                let _guard = fork.acquire(SeatId(2)).await;
                fork.holder()
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());
        assert_eq!(fork.holder(), Some(SeatId(3)));

        drop(held);
        assert_eq!(waiter.await.unwrap(), Some(SeatId(2)));
        assert!(fork.is_free());
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_or_cancel_gives_up() {
        let fork = Fork::new(0);
        let cancel = CancellationToken::new();
        let _held = fork.acquire(SeatId(0)).await;

        let waiter = {
            let fork = fork.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { fork.acquire_or_cancel(SeatId(1), &cancel).await.is_some() })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();

        assert!(!waiter.await.unwrap());
        assert_eq!(fork.holder(), Some(SeatId(0)));
        assert_eq!(fork.acquisitions(), 1);
    }

    #[tokio::test]
    async fn test_set_reports_holders_and_balance() {
        let forks = ForkSet::new(3).unwrap();
        let guard = forks.get(1).unwrap().acquire(SeatId(0)).await;

        assert_eq!(forks.holders(), vec![None, Some(SeatId(0)), None]);
        assert!(!forks.all_free());
        assert!(!forks.is_balanced());

        drop(guard);
        assert!(forks.all_free());
        assert!(forks.is_balanced());
    }
}
