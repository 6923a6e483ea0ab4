use std::time::{Duration, Instant};

/// Wall-clock timer reporting the time since the previous lap and since creation.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    start: Instant,
    last_lap: Instant,
}

impl Stopwatch {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_lap: now,
        }
    }

    /// Returns `(since_last_lap, since_start)` and starts a new lap.
    pub fn lap(&mut self) -> (Duration, Duration) {
        let now = Instant::now();
        let lap = now - self.last_lap;
        self.last_lap = now;
        (lap, now - self.start)
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}
