//! Uniform draws of manifest indices and sleep intervals.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::time::Duration;

use crate::config::StressConfig;

/// Draws from two closed ranges. Both ranges must be non-empty; [`StressConfig`]
/// validation guarantees that.
#[derive(Debug, Clone)]
pub struct Picker<R> {
    rng: R,
    data_range: RangeInclusive<usize>,
    sleep_range: RangeInclusive<u64>,
}

impl Picker<StdRng> {
    /// Picker seeded from the operating system.
    pub fn from_os_rng(config: &StressConfig) -> Self {
        Self::new(StdRng::from_os_rng(), config.data_range(), config.sleep_range())
    }
}

impl<R: Rng> Picker<R> {
    pub fn new(rng: R, data_range: RangeInclusive<usize>, sleep_range: RangeInclusive<u64>) -> Self {
        Self {
            rng,
            data_range,
            sleep_range,
        }
    }

    pub fn next_index(&mut self) -> usize {
        self.rng.random_range(self.data_range.clone())
    }

    pub fn next_sleep(&mut self) -> Duration {
        Duration::from_secs(self.rng.random_range(self.sleep_range.clone()))
    }
}
