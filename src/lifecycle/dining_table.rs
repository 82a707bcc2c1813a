use crate::error::TableError;
use crate::indicator::Indicator;
use crate::lifecycle::{ReportFormat, TableConfig};
use crate::model::{ForkSet, Seat, SeatSnapshot, SeatStatus, Snapshot};
use crate::philosopher::Philosopher;
use crate::protocol::AcquisitionProtocol;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, warn, Instrument};

/// The supervisor: owns the forks, runs one task per philosopher and reports on them.
///
/// `DiningTable` is responsible for:
/// - **Startup**: validating the configuration, laying out the fork ring and seating
///   every philosopher between its two forks, all or nothing
/// - **Reporting**: sampling every seat's eating flag and meal count on a fixed period
/// - **Shutdown**: cancelling every philosopher and waiting until all of them have left
///   the table with empty hands
///
/// # Example
///
/// ```ignore
/// let table = DiningTable::start(TableConfig::default(), Arc::new(NoopIndicator))?;
///
/// // Report every second until Ctrl-C, then wind down.
/// let last = table.run_until(tokio::signal::ctrl_c()).await?;
/// println!("{last}");
/// ```
pub struct DiningTable {
    forks: ForkSet,
    seats: Vec<(Seat, Arc<SeatStatus>)>,

    /// Task handles for all philosophers (used for graceful shutdown)
    handles: Vec<JoinHandle<()>>,

    cancel: CancellationToken,
    report_interval: Duration,
    report_format: ReportFormat,
}

impl DiningTable {
    /// Validates `config`, seats every philosopher and starts their tasks.
    ///
    /// This method:
    /// 1. Validates the configuration and lays out the fork ring
    /// 2. Builds every philosopher, checking that seat `i`'s right fork is seat `i + 1`'s left
    /// 3. Spawns each philosopher in its own Tokio task
    ///
    /// Nothing is spawned unless steps 1 and 2 succeed for every seat.
    ///
    /// # Errors
    ///
    /// - [`TableError::InvalidConfig`] for unusable settings
    /// - [`TableError::ResourceInit`] for a ring of fewer than two seats
    /// - [`TableError::ActorStart`] when called outside a Tokio runtime
    pub fn start(config: TableConfig, indicator: Arc<dyn Indicator>) -> Result<Self, TableError> {
        config.validate()?;
        let count = config.seat_count();
        let forks = ForkSet::new(count)?;

        let runtime = Handle::try_current().map_err(|e| TableError::ActorStart {
            name: config.names[0].clone(),
            reason: e.to_string(),
        })?;

        let protocol = AcquisitionProtocol::new(config.retry_budget);
        let mut philosophers = Vec::with_capacity(count);
        for (index, name) in config.names.iter().enumerate() {
            let seat = Seat::new(index, name.clone(), count);
            let rng = match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
                None => StdRng::from_entropy(),
            };
            let wiring = forks
                .get(seat.left())
                .zip(forks.get(seat.right()))
                .and_then(|(left, right)| {
                    Philosopher::new(
                        seat.clone(),
                        left.clone(),
                        right.clone(),
                        protocol,
                        config.timing,
                        rng,
                        indicator.clone(),
                    )
                });
            let philosopher = wiring.ok_or_else(|| TableError::ActorStart {
                name: name.clone(),
                reason: format!("cannot seat between forks {} and {}", seat.left(), seat.right()),
            })?;
            philosophers.push(philosopher);
        }

        for (index, philosopher) in philosophers.iter().enumerate() {
            let next = &philosophers[(index + 1) % count];
            if philosopher.seat().right() != next.seat().left() {
                return Err(TableError::ActorStart {
                    name: next.seat().name().to_string(),
                    reason: "ring adjacency broken".to_string(),
                });
            }
        }

        info!(seats = count, retry_budget = config.retry_budget, "Dining philosophers starting");

        let cancel = CancellationToken::new();
        let mut seats = Vec::with_capacity(count);
        let mut handles = Vec::with_capacity(count);
        for philosopher in philosophers {
            let span = info_span!("philosopher", name = %philosopher.seat().name());
            seats.push((philosopher.seat().clone(), philosopher.status()));
            handles.push(runtime.spawn(philosopher.run(cancel.child_token()).instrument(span)));
        }

        Ok(Self {
            forks,
            seats,
            handles,
            cancel,
            report_interval: config.report_interval(),
            report_format: config.report_format,
        })
    }

    pub fn forks(&self) -> &ForkSet {
        &self.forks
    }

    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }

    /// Token that stops the table when cancelled. Useful for wiring external signals.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Samples every seat without locking.
    pub fn snapshot(&self) -> Snapshot {
        capture(&self.seats)
    }

    fn report(&self) {
        let snapshot = self.snapshot();
        match self.report_format {
            ReportFormat::Text => info!(%snapshot, "Hello dining philosophers"),
            ReportFormat::Json => match serde_json::to_string(&snapshot) {
                Ok(json) => info!(snapshot = %json, "Hello dining philosophers"),
                Err(e) => warn!(error = %e, "Failed to serialise snapshot"),
            },
        }
    }

    /// Reports on a fixed period until `shutdown` completes or the table's token is
    /// cancelled, then shuts down.
    pub async fn run_until<F>(self, shutdown: F) -> Result<Snapshot, TableError>
    where
        F: Future,
    {
        let mut ticker = tokio::time::interval(self.report_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Termination requested");
                    break;
                }
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => self.report(),
            }
        }

        self.shutdown().await
    }

    /// Gracefully shuts down the table.
    ///
    /// This method:
    /// 1. Cancels every philosopher; each one abandons any wait and puts its forks back
    /// 2. Waits for every philosopher task to finish, even if one of them failed
    /// 3. Returns the final snapshot, or the first task failure
    ///
    /// # Returns
    ///
    /// - `Ok(Snapshot)` if all philosophers left cleanly
    /// - `Err(TableError::ActorPanicked)` if any philosopher task panicked
    pub async fn shutdown(self) -> Result<Snapshot, TableError> {
        info!("Dining philosophers exiting");
        let Self {
            forks,
            seats,
            handles,
            cancel,
            ..
        } = self;
        cancel.cancel();

        let mut failure = None;
        for ((seat, _), handle) in seats.iter().zip(handles) {
            if let Err(source) = handle.await {
                error!(philosopher = seat.name(), error = %source, "Philosopher task failed");
                failure.get_or_insert(TableError::ActorPanicked {
                    name: seat.name().to_string(),
                    source,
                });
            }
        }

        // A panicked task drops its guards while unwinding, so the ring is free either way.
        if !forks.all_free() {
            warn!(holders = ?forks.holders(), "Forks still held after shutdown");
        }

        let snapshot = capture(&seats);
        info!(%snapshot, total_meals = snapshot.total_meals(), "System shutdown complete");

        match failure {
            Some(e) => Err(e),
            None => Ok(snapshot),
        }
    }
}

fn capture(seats: &[(Seat, Arc<SeatStatus>)]) -> Snapshot {
    Snapshot {
        seats: seats
            .iter()
            .map(|(seat, status)| SeatSnapshot::capture(seat, status))
            .collect(),
    }
}
