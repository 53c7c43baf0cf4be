//! Ticks per second reporting.

use std::time::Duration;

use web_time::Instant;

/// Amount of ticks executed in one report window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FpsReport {
    /// Ticks executed inside the window.
    pub ticks: u32,
    /// Length of the window.
    pub window: Duration,
}

/// Counts executed ticks and reports them once every interval.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    /// Start of the current window.
    window_start: Instant,
    /// Length of a window.
    interval: Duration,
    /// Ticks counted in the current window.
    ticks: u32,
}

impl FpsCounter {
    /// Start counting.
    #[must_use]
    pub const fn new(start: Instant, interval: Duration) -> Self {
        Self {
            window_start: start,
            interval,
            ticks: 0,
        }
    }

    /// Count a single executed tick.
    #[inline]
    pub fn record_tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    /// Close the window if more than an interval passed since it started.
    ///
    /// The next window starts exactly one interval after the previous one, so reports don't drift.
    ///
    /// # Returns
    ///
    /// - The report of the closed window, `None` if the window is still open.
    pub fn poll(&mut self, now: Instant) -> Option<FpsReport> {
        if now.saturating_duration_since(self.window_start) <= self.interval {
            return None;
        }

        let report = FpsReport {
            ticks: self.ticks,
            window: self.interval,
        };
        self.window_start += self.interval;
        self.ticks = 0;

        log::info!("FPS: {}", report.ticks);

        Some(report)
    }

    /// Ticks counted in the current window so far.
    #[inline]
    #[must_use]
    pub const fn ticks(&self) -> u32 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use web_time::Instant;

    use super::FpsCounter;

    #[test]
    fn reports_once_per_interval() {
        let start = Instant::now();
        let mut counter = FpsCounter::new(start, Duration::from_secs(1));

        for _ in 0..42 {
            counter.record_tick();
        }

        assert_eq!(counter.poll(start + Duration::from_millis(500)), None);
        // Exactly one interval is not more than one interval
        assert_eq!(counter.poll(start + Duration::from_secs(1)), None);

        let report = counter.poll(start + Duration::from_millis(1001)).unwrap();
        assert_eq!(report.ticks, 42);
        assert_eq!(report.window, Duration::from_secs(1));
        assert_eq!(counter.ticks(), 0);

        // The next window starts at exactly one second, not at the poll time
        counter.record_tick();
        assert_eq!(counter.poll(start + Duration::from_millis(2000)), None);
        assert_eq!(
            counter
                .poll(start + Duration::from_millis(2002))
                .map(|report| report.ticks),
            Some(1)
        );
    }
}
