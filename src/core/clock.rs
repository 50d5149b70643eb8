//! Time sources for the harness
//!
//! The harness takes durations from a monotonic source. Wall-clock time can
//! be stepped by NTP or by hand, which turns a 10 ms sleep into a negative or
//! multi-second sample. `WallClock` exists so that difference can be shown.

use std::cell::Cell;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::stats::sample::Sample;

/// Resolution above which a clock is too coarse for microbenchmarks.
pub const COARSE_RESOLUTION_NANOS: u64 = 1_000;

/// A monotonically non-decreasing time source.
pub trait Clock {
    type Instant: Copy;

    fn now(&self) -> Self::Instant;

    /// Duration between two readings of this clock. Never negative.
    fn between(&self, start: Self::Instant, end: Self::Instant) -> Sample;
}

/// `std::time::Instant`-backed clock
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    type Instant = Instant;

    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    #[inline]
    fn between(&self, start: Instant, end: Instant) -> Sample {
        Sample::from(end.saturating_duration_since(start))
    }
}

/// `SystemTime`-backed clock, optionally truncated to a coarser tick.
///
/// A reading that goes backward is recorded as a zero sample and counted.
#[derive(Debug, Clone)]
pub struct WallClock {
    granularity_nanos: u64,
    backward_steps: Cell<usize>,
}

impl WallClock {
    pub fn new() -> Self {
        Self::with_granularity(1)
    }

    /// Millisecond ticks, the way epoch-millis timestamps are usually read
    pub fn millis() -> Self {
        Self::with_granularity(1_000_000)
    }

    pub fn with_granularity(granularity_nanos: u64) -> Self {
        Self {
            granularity_nanos: granularity_nanos.max(1),
            backward_steps: Cell::new(0),
        }
    }

    pub fn granularity_nanos(&self) -> u64 {
        self.granularity_nanos
    }

    /// Number of interval reads where the end came before the start
    pub fn backward_steps(&self) -> usize {
        self.backward_steps.get()
    }

    fn ticks(&self, t: SystemTime) -> u64 {
        let nanos = t
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        nanos / self.granularity_nanos * self.granularity_nanos
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    type Instant = SystemTime;

    fn now(&self) -> SystemTime {
        SystemTime::now()
    }

    fn between(&self, start: SystemTime, end: SystemTime) -> Sample {
        match end.duration_since(start) {
            Ok(_) => Sample::from_nanos(self.ticks(end).saturating_sub(self.ticks(start))),
            Err(e) => {
                self.backward_steps.set(self.backward_steps.get() + 1);
                tracing::debug!(stepped_back = ?e.duration(), "wall clock went backward");
                Sample::from_nanos(0)
            }
        }
    }
}

/// Smallest strictly positive step observed over `reads` back-to-back reads.
///
/// Returns `None` if the clock never advanced, which means every read landed
/// inside one tick.
pub fn estimate_resolution<C: Clock>(clock: &C, reads: usize) -> Option<u64> {
    let mut previous = clock.now();
    let mut smallest: Option<u64> = None;
    for _ in 0..reads {
        let current = clock.now();
        let step = clock.between(previous, current).as_nanos();
        if step > 0 {
            smallest = Some(smallest.map_or(step, |s| s.min(step)));
        }
        previous = current;
    }
    smallest
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Clock returning a scripted sequence of readings, then repeating the last one
    pub struct ScriptedClock {
        ticks: Vec<u64>,
        cursor: Cell<usize>,
    }

    impl ScriptedClock {
        pub fn new(ticks: Vec<u64>) -> Self {
            Self {
                ticks,
                cursor: Cell::new(0),
            }
        }

        /// Readings such that consecutive (start, end) pairs span `durations`
        pub fn with_durations(durations: &[u64]) -> Self {
            let mut ticks = Vec::with_capacity(durations.len() * 2);
            let mut t = 1_000;
            for &d in durations {
                ticks.push(t);
                ticks.push(t + d);
                t += d + 17;
            }
            Self::new(ticks)
        }

        pub fn reads(&self) -> usize {
            self.cursor.get()
        }
    }

    impl Clock for ScriptedClock {
        type Instant = u64;

        fn now(&self) -> u64 {
            let i = self.cursor.get();
            self.cursor.set(i + 1);
            self.ticks[i.min(self.ticks.len() - 1)]
        }

        fn between(&self, start: u64, end: u64) -> Sample {
            Sample::from_nanos(end.saturating_sub(start))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::testing::ScriptedClock;
    use super::*;

    #[test]
    fn resolution_is_smallest_positive_step() {
        let clock = ScriptedClock::new(vec![0, 0, 40, 40, 65, 165, 190]);
        assert_eq!(estimate_resolution(&clock, 6), Some(25));
    }

    #[test]
    fn frozen_clock_has_no_resolution() {
        let clock = ScriptedClock::new(vec![5]);
        assert_eq!(estimate_resolution(&clock, 10), None);
    }

    #[test]
    fn monotonic_clock_never_goes_backward() {
        let clock = MonotonicClock;
        let a = clock.now();
        let b = clock.now();
        // reversed arguments saturate to zero instead of wrapping
        assert_eq!(clock.between(b, a).as_nanos(), 0);
        assert!(estimate_resolution(&clock, 10_000).is_some());
    }

    #[test]
    fn wall_clock_counts_backward_steps() {
        let clock = WallClock::new();
        let t = clock.now();
        let later = t + Duration::from_secs(1);
        assert_eq!(clock.between(later, t).as_nanos(), 0);
        assert_eq!(clock.between(t, later).as_nanos(), 1_000_000_000);
        assert_eq!(clock.backward_steps(), 1);
    }

    #[test]
    fn millisecond_wall_clock_truncates_readings() {
        let clock = WallClock::millis();
        let start = UNIX_EPOCH + Duration::from_nanos(1_500_000);
        let end = UNIX_EPOCH + Duration::from_nanos(2_100_000);
        assert_eq!(clock.between(start, end).as_nanos(), 1_000_000);
        // 0.6 ms inside one tick reads as nothing
        let end = UNIX_EPOCH + Duration::from_nanos(1_900_000);
        assert_eq!(clock.between(start, end).as_nanos(), 0);
        assert_eq!(clock.backward_steps(), 0);
    }
}
