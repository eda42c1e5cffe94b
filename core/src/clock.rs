use std::time::Duration;

/// # Clock
/// Converts wall-clock time handed over by the host into whole ticks at a
/// fixed rate. Leftover time carries over to the next call, so the tick rate
/// holds no matter how the host slices time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Clock {
    period: Option<Duration>,
    elapsed: Duration,
}

impl Clock {
    /// A clock ticking `hz` times per second; a 0Hz clock never ticks.
    /// Rates above 1GHz tick once per nanosecond.
    pub fn new(hz: u32) -> Self {
        Clock {
            period: (hz > 0).then(|| (Duration::from_secs(1) / hz).max(Duration::from_nanos(1))),
            elapsed: Duration::ZERO,
        }
    }

    pub fn advance(&mut self, elapsed: Duration) {
        if self.period.is_some() {
            self.elapsed += elapsed;
        }
    }

    /// How long ago the oldest pending tick fell due, if any is pending.
    /// Comparing two clocks' `overdue` orders their ticks in time.
    pub fn overdue(&self) -> Option<Duration> {
        let period = self.period?;
        self.elapsed.checked_sub(period)
    }

    /// Consumes the oldest pending tick; returns false if none was due
    pub fn tick(&mut self) -> bool {
        match self.period {
            Some(period) if self.elapsed >= period => {
                self.elapsed -= period;
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}
