/// Frame gate for the animation callback.
///
/// Only one callback tick out of every `skip` is processed; the others return
/// immediately. Physics integrates once per processed tick with a fixed dt, so
/// simulated time runs at `dt` per processed tick regardless of wall-clock gaps.
#[derive(Debug, Clone)]
pub struct FrameClock {
    skip: u32,
    ticks: u64,
    processed: u64,
}

impl FrameClock {
    pub fn new(skip: u32) -> Self {
        Self {
            skip: skip.max(1),
            ticks: 0,
            processed: 0,
        }
    }

    /// Register a callback tick. Returns `true` when this tick should be processed.
    pub fn tick(&mut self) -> bool {
        self.ticks += 1;
        if self.ticks % self.skip as u64 != 0 {
            return false;
        }
        self.processed += 1;
        true
    }

    /// Number of processed ticks so far.
    pub fn processed(&self) -> u64 {
        self.processed
    }
}
