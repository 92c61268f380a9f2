//! Per-tempo tick buckets and wall-clock conversion

use std::collections::BTreeMap;

/// Seconds per tick at tempo 1. Measured against the driver's tick rate
/// relative to tempo units.
pub const SECONDS_PER_TICK_UNIT: f64 = 1.25;

/// Ticks accumulated under each tempo value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TempoBuckets {
    by_tempo: BTreeMap<i64, i64>,
    /// Ticks counted before any tempo was set
    untimed: i64,
}

impl TempoBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add ticks under the given tempo (or as untimed if none is set)
    pub fn add(&mut self, tempo: Option<i64>, ticks: i64) {
        match tempo {
            Some(tempo) => {
                let bucket = self.by_tempo.entry(tempo).or_default();
                *bucket = bucket.saturating_add(ticks);
            }
            None => self.untimed = self.untimed.saturating_add(ticks),
        }
    }

    /// Ticks recorded for one tempo
    pub fn ticks_at(&self, tempo: i64) -> i64 {
        self.by_tempo.get(&tempo).copied().unwrap_or(0)
    }

    pub fn total_ticks(&self) -> i64 {
        self.by_tempo
            .values()
            .fold(self.untimed, |total, &ticks| total.saturating_add(ticks))
    }

    /// Ticks that cannot be converted to seconds
    ///
    /// Includes ticks with no tempo and ticks under a tempo of zero or less.
    pub fn untimed_ticks(&self) -> i64 {
        self.by_tempo
            .iter()
            .filter(|(&tempo, _)| tempo <= 0)
            .fold(self.untimed, |total, (_, &ticks)| total.saturating_add(ticks))
    }

    /// Wall-clock duration: sum of `ticks * 1.25 / tempo` over every bucket
    pub fn seconds(&self) -> f64 {
        self.by_tempo
            .iter()
            .filter(|(&tempo, _)| tempo > 0)
            .map(|(&tempo, &ticks)| ticks as f64 * SECONDS_PER_TICK_UNIT / tempo as f64)
            .sum()
    }
}
