/// xorshift64 generator shared by every randomized effect.
///
/// Same seed, same sequence: tests pass a fixed seed, the web runner seeds
/// from `Math.random`.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    /// A zero state would stick at zero, so it is replaced.
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn step(&mut self) -> u64 {
        let mut s = self.state;
        s ^= s << 13;
        s ^= s >> 7;
        s ^= s << 17;
        self.state = s;
        s
    }

    /// Integer in `[0, n)`; 0 when `n` is 0.
    pub fn below(&mut self, n: u32) -> u32 {
        match n {
            0 => 0,
            n => (self.step() % u64::from(n)) as u32,
        }
    }

    /// Float in `[0, 1)` from the top 24 bits.
    pub fn next_f32(&mut self) -> f32 {
        (self.step() >> 40) as f32 * (1.0 / (1u32 << 24) as f32)
    }

    /// Float in `[lo, hi)`, or `lo` for an empty range.
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi > lo {
            lo + (hi - lo) * self.next_f32()
        } else {
            lo
        }
    }

    /// Radians in `[0, 2π)`.
    pub fn angle(&mut self) -> f32 {
        self.next_f32() * std::f32::consts::TAU
    }

    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_seeds_replay_the_same_burst() {
        let mut a = Rng::new(1234);
        let mut b = Rng::new(1234);
        let xs: Vec<f32> = (0..16).map(|_| a.angle()).collect();
        let ys: Vec<f32> = (0..16).map(|_| b.angle()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn zero_seed_still_varies() {
        let mut rng = Rng::new(0);
        let first = rng.below(1_000_000);
        assert!((0..8).any(|_| rng.below(1_000_000) != first));
        assert_eq!(rng.below(0), 0);
    }

    #[test]
    fn color_jitter_covers_its_span() {
        let mut rng = Rng::new(3);
        let mut seen = [false; 101];
        for _ in 0..5000 {
            seen[rng.below(101) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn floats_stay_in_range() {
        let mut rng = Rng::new(7);
        for _ in 0..1000 {
            assert!((0.0..1.0).contains(&rng.next_f32()));
            assert!((-50.0..50.0).contains(&rng.range(-50.0, 50.0)));
        }
        assert_eq!(rng.range(3.0, 3.0), 3.0);
        assert_eq!(rng.range(5.0, 1.0), 5.0);
    }

    #[test]
    fn chance_extremes() {
        let mut rng = Rng::new(9);
        assert!((0..100).all(|_| !rng.chance(0.0)));
        assert!((0..100).all(|_| rng.chance(1.0)));
    }
}
