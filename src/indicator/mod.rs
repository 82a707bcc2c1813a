//! # Indicators
//!
//! An [`Indicator`] is the per-seat status output driven by philosophers: switched on when
//! a philosopher starts eating and off when it stops. On a device this would be an LED;
//! here it is a trait so the table can be wired to whatever output is available.
//!
//! Indicators are best-effort. A failing indicator is logged and otherwise ignored; it
//! never affects fork handling.
//!
//! # Provided Implementations
//!
//! - [`NoopIndicator`] - discards every update
//! - [`LogIndicator`] - emits a `tracing` event per update
//! - [`mock::MockIndicator`] - records updates for assertions in tests

pub mod mock;

use crate::model::SeatId;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use tracing::info;

/// Logical state of an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
    On,
    Off,
}

impl fmt::Display for IndicatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorState::On => f.write_str("on"),
            IndicatorState::Off => f.write_str("off"),
        }
    }
}

/// Errors an indicator may report. Callers log them and carry on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("Indicator for seat {seat} unavailable: {reason}")]
    Unavailable { seat: SeatId, reason: String },
}

/// Per-seat on/off output.
#[async_trait]
pub trait Indicator: Send + Sync {
    async fn set(&self, seat: SeatId, state: IndicatorState) -> Result<(), IndicatorError>;
}

/// Indicator that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopIndicator;

#[async_trait]
impl Indicator for NoopIndicator {
    async fn set(&self, _seat: SeatId, _state: IndicatorState) -> Result<(), IndicatorError> {
        Ok(())
    }
}

/// Indicator that reports every switch as an `info` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogIndicator;

#[async_trait]
impl Indicator for LogIndicator {
    async fn set(&self, seat: SeatId, state: IndicatorState) -> Result<(), IndicatorError> {
        info!(%seat, %state, "Indicator");
        Ok(())
    }
}
