//! Randomised think/eat durations.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inclusive range of milliseconds a philosopher sleeps for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl SleepRange {
    pub const fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub const fn from_secs(min: u64, max: u64) -> Self {
        Self::from_millis(min * 1000, max * 1000)
    }

    pub fn is_valid(&self) -> bool {
        self.min_ms <= self.max_ms
    }

    /// Draws a duration uniformly from the range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min_ms >= self.max_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rng.gen_range(self.min_ms..=self.max_ms))
    }
}

/// How long a philosopher thinks and eats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub think: SleepRange,
    pub eat: SleepRange,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            think: SleepRange::from_secs(1, 8),
            eat: SleepRange::from_secs(1, 8),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_samples_stay_in_range() {
        let range = SleepRange::from_secs(1, 8);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1_000 {
            let d = range.sample(&mut rng);
            assert!(d >= Duration::from_secs(1) && d <= Duration::from_secs(8), "{d:?}");
        }
    }

    #[test]
    fn test_degenerate_range_is_fixed() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            SleepRange::from_millis(250, 250).sample(&mut rng),
            Duration::from_millis(250)
        );
        assert!(!SleepRange::from_millis(5, 1).is_valid());
    }
}
