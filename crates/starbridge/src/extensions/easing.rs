// extensions/easing.rs
//
// Curves for the short render-only animations: star squash-and-stretch and
// the toss flash fade. Input is progress in [0, 1]; anything outside is clamped.

use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    /// Decelerates into 1.
    QuadOut,
    /// Overshoots 1 and rings down to it.
    ElasticOut,
}

impl Easing {
    #[inline]
    pub fn apply(self, progress: f32) -> f32 {
        let t = progress.clamp(0.0, 1.0);
        match self {
            Easing::QuadOut => {
                let rest = 1.0 - t;
                1.0 - rest * rest
            }
            Easing::ElasticOut if t <= 0.0 || t >= 1.0 => t,
            Easing::ElasticOut => {
                let decay = (-10.0 * t).exp2();
                let phase = (10.0 * t - 0.75) * (TAU / 3.0);
                decay * phase.sin() + 1.0
            }
        }
    }
}
