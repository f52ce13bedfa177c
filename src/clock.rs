use std::time::{Duration, Instant};

/// Monotonic time since boot
pub trait Clock {
    fn uptime(&self) -> Duration;
}

pub struct MonotonicClock {
    started: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn uptime(&self) -> Duration {
        self.started.elapsed()
    }
}
