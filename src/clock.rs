//! Fixed timestep accumulator.

use std::time::Duration;

use web_time::Instant;

/// Converts variable wall-clock time into whole fixed ticks.
///
/// Elapsed time is added as a fraction of a tick, every executed tick removes exactly one from the accumulator so leftover time carries over to the next iteration.
#[derive(Debug, Clone)]
pub struct LoopClock {
    /// Time of the previous [`LoopClock::advance`] call.
    last_time: Instant,
    /// Amount of ticks owed to the simulation, can be fractional.
    accumulator: f64,
    /// Duration of a single tick.
    tick_duration: Duration,
    /// Upper bound of the time added in a single advance, unbounded when `None`.
    max_frame_time: Option<Duration>,
}

impl LoopClock {
    /// Start the clock.
    ///
    /// # Arguments
    ///
    /// * `start` - Time the loop starts at, the first advance is measured from this.
    /// * `tick_duration` - Duration of a single fixed tick, must not be zero.
    /// * `max_frame_time` - Elapsed time per advance is clamped to this, `None` never drops time.
    #[must_use]
    pub const fn new(
        start: Instant,
        tick_duration: Duration,
        max_frame_time: Option<Duration>,
    ) -> Self {
        Self {
            last_time: start,
            accumulator: 0.0,
            tick_duration,
            max_frame_time,
        }
    }

    /// Add the time passed since the previous call to the accumulator.
    ///
    /// # Returns
    ///
    /// - The elapsed wall-clock time before clamping.
    pub fn advance(&mut self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.last_time);
        self.last_time = now;

        self.accumulate(elapsed);

        elapsed
    }

    /// Add a duration to the accumulator as a fraction of a tick.
    ///
    /// The duration is clamped to the maximum frame time if one is set.
    pub fn accumulate(&mut self, elapsed: Duration) {
        let elapsed = self
            .max_frame_time
            .map_or(elapsed, |max_frame_time| elapsed.min(max_frame_time));

        // Nanoseconds keep the division exact for whole multiples of a tick
        self.accumulator += elapsed.as_nanos() as f64 / self.tick_duration.as_nanos() as f64;
    }

    /// Whether at least one full tick is owed.
    #[inline]
    #[must_use]
    pub fn has_pending_tick(&self) -> bool {
        self.accumulator >= 1.0
    }

    /// Mark a single tick as executed.
    ///
    /// # Returns
    ///
    /// - `false` if no full tick was pending, the accumulator is left untouched then.
    pub fn consume_tick(&mut self) -> bool {
        if !self.has_pending_tick() {
            return false;
        }

        self.accumulator -= 1.0;

        true
    }

    /// Amount of ticks owed, including the fractional part.
    #[inline]
    #[must_use]
    pub const fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Duration of a single tick.
    #[inline]
    #[must_use]
    pub const fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    /// Wall-clock time left until the next full tick is owed.
    #[must_use]
    pub fn until_next_tick(&self) -> Duration {
        if self.has_pending_tick() {
            return Duration::ZERO;
        }

        self.tick_duration.mul_f64(1.0 - self.accumulator)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use web_time::Instant;

    use super::LoopClock;

    fn clock() -> (LoopClock, Instant, Duration) {
        let start = Instant::now();
        let tick = Duration::from_secs(1) / 60;

        (LoopClock::new(start, tick, None), start, tick)
    }

    #[test]
    fn whole_ticks_drain_exactly() {
        for ticks in [1, 2, 3, 7, 10, 59, 60, 600] {
            let (mut clock, start, tick) = clock();
            clock.advance(start + tick * ticks);

            let mut executed = 0;
            while clock.consume_tick() {
                executed += 1;
            }

            assert_eq!(executed, ticks);
            assert!(clock.accumulator().abs() < 1e-9);
        }
    }

    #[test]
    fn consuming_subtracts_one() {
        let (mut clock, start, tick) = clock();
        clock.advance(start + tick * 5 / 2);
        assert!((clock.accumulator() - 2.5).abs() < 1e-6);

        assert!(clock.consume_tick());
        assert!((clock.accumulator() - 1.5).abs() < 1e-6);

        assert!(clock.consume_tick());
        assert!((clock.accumulator() - 0.5).abs() < 1e-6);

        assert!(!clock.consume_tick());
        assert!((clock.accumulator() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn sub_tick_deltas_are_not_lost() {
        let (mut clock, start, tick) = clock();

        // A third of a tick per advance, three advances make one tick
        let step = tick / 3;
        let mut now = start;
        let mut executed = 0;
        for _ in 0..300 {
            now += step;
            clock.advance(now);
            while clock.consume_tick() {
                executed += 1;
            }
        }

        // Truncating the step loses less than a nanosecond per advance
        assert!((99..=100).contains(&executed));
        assert!(clock.accumulator() < 1.0);
    }

    #[test]
    fn elapsed_time_is_clamped() {
        let start = Instant::now();
        let tick = Duration::from_millis(10);
        let mut clock = LoopClock::new(start, tick, Some(Duration::from_millis(50)));

        let elapsed = clock.advance(start + Duration::from_secs(3));

        assert_eq!(elapsed, Duration::from_secs(3));
        assert!((clock.accumulator() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn until_next_tick() {
        let start = Instant::now();
        let tick = Duration::from_millis(10);
        let mut clock = LoopClock::new(start, tick, None);

        assert_eq!(clock.until_next_tick(), tick);

        clock.advance(start + Duration::from_millis(4));
        let left = clock.until_next_tick();
        assert!(left > Duration::from_micros(5_999) && left < Duration::from_micros(6_001));

        clock.advance(start + Duration::from_millis(12));
        assert_eq!(clock.until_next_tick(), Duration::ZERO);
    }
}
