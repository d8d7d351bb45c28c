/// Deferred events, fired once their wall-clock deadline has passed.
///
/// Replaces platform timers: the world drains due events once per processed
/// frame, so timing is deterministic and visible to tests.
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    /// Kept sorted by deadline; equal deadlines keep insertion order.
    pending: Vec<(f64, E)>,
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(8),
        }
    }

    /// Queue `event` to fire at `deadline_ms`.
    pub fn schedule(&mut self, deadline_ms: f64, event: E) {
        let idx = self.pending.partition_point(|(at, _)| *at <= deadline_ms);
        self.pending.insert(idx, (deadline_ms, event));
    }

    /// Remove and return every event whose deadline is `<= now_ms`, earliest first.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<E> {
        let due = self.pending.partition_point(|(at, _)| *at <= now_ms);
        self.pending.drain(..due).map(|(_, event)| event).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}
