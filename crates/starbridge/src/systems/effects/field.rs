//! Background dot grid and the radial waves that ripple through it.

use std::f64::consts::TAU;

use glam::Vec2;

use super::rng::Rng;
use crate::api::config::FieldConfig;
use crate::renderer::color::Rgba;
use crate::renderer::traits::Canvas;

/// Oscillator phase at `now_ms`, wrapped to one turn. Reduced in f64 so the
/// per-frame step survives after hours of uptime.
fn swing_at(now_ms: f64, rate: f32) -> f32 {
    (now_ms * f64::from(rate)).rem_euclid(TAU) as f32
}

/// A decaying radial perturbation started by an impact.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveEffect {
    pub origin: Vec2,
    pub radius: f32,
    pub initial_strength: f32,
    pub strength: f32,
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl WaveEffect {
    pub fn new(origin: Vec2, radius: f32, strength: f32, start_ms: f64, duration_ms: f64) -> Self {
        Self {
            origin,
            radius,
            initial_strength: strength,
            strength,
            start_ms,
            duration_ms,
        }
    }

    /// Strength at `now_ms`: linear decay to exactly zero at `duration_ms`.
    pub fn strength_at(&self, now_ms: f64) -> f32 {
        let elapsed = (now_ms - self.start_ms).max(0.0);
        if self.duration_ms <= 0.0 || elapsed >= self.duration_ms {
            return 0.0;
        }
        self.initial_strength * (1.0 - (elapsed / self.duration_ms) as f32)
    }

    pub fn is_expired(&self, now_ms: f64) -> bool {
        now_ms - self.start_ms > self.duration_ms
    }
}

/// One grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    pub base: Vec2,
    pub position: Vec2,
    pub size: f32,
    pub alpha: u8,
    pub phase: f32,
    /// Smoothed scalar displacement along the dot's own axis.
    pub offset: f32,
}

impl Dot {
    /// Fixed wobble direction derived from the phase.
    pub fn axis(&self) -> Vec2 {
        Vec2::new(self.phase.sin(), self.phase.cos())
    }
}

/// Dot matrix plus the active waves that displace it.
#[derive(Debug, Clone)]
pub struct EffectField {
    dots: Vec<Dot>,
    waves: Vec<WaveEffect>,
    config: FieldConfig,
}

impl EffectField {
    pub fn new(config: FieldConfig) -> Self {
        Self {
            dots: Vec::new(),
            waves: Vec::with_capacity(16),
            config,
        }
    }

    /// Build a field and lay out its grid in one go.
    pub fn create_grid(width: f32, height: f32, config: FieldConfig, rng: &mut Rng) -> Self {
        let mut field = Self::new(config);
        field.rebuild(width, height, rng);
        field
    }

    /// Lay out the grid to cover `width` x `height`, jittering each base
    /// position once. Existing dots are discarded; waves survive.
    pub fn rebuild(&mut self, width: f32, height: f32, rng: &mut Rng) {
        let spacing = self.config.spacing.max(1.0);
        let cols = (width / spacing).ceil() as usize + 1;
        let rows = (height / spacing).ceil() as usize + 1;
        let jitter = self.config.jitter;

        self.dots.clear();
        self.dots.reserve(cols * rows);
        for i in 0..cols {
            for j in 0..rows {
                let base = Vec2::new(i as f32 * spacing, j as f32 * spacing)
                    + Vec2::new(rng.range(-jitter, jitter), rng.range(-jitter, jitter));
                self.dots.push(Dot {
                    base,
                    position: base,
                    size: self.config.dot_size,
                    alpha: self.config.dot_alpha,
                    phase: rng.angle(),
                    offset: 0.0,
                });
            }
        }
        log::debug!("dot grid rebuilt: {cols}x{rows} for {width}x{height}");
    }

    /// Start a wave at `origin` sized for an object of `object_radius`.
    pub fn add_wave(&mut self, origin: Vec2, object_radius: f32, now_ms: f64) {
        self.waves.push(WaveEffect::new(
            origin,
            object_radius * self.config.wave_radius_factor,
            self.config.wave_strength,
            now_ms,
            self.config.wave_duration_ms,
        ));
    }

    /// Decay every wave and prune those past their duration.
    pub fn update_waves(&mut self, now_ms: f64) {
        self.waves.retain_mut(|wave| {
            if wave.is_expired(now_ms) {
                return false;
            }
            wave.strength = wave.strength_at(now_ms);
            true
        });
    }

    /// Relax every dot toward the summed contribution of all active waves.
    /// Contributions are recomputed from scratch each frame.
    pub fn update_dots(&mut self, now_ms: f64) {
        let swing = swing_at(now_ms, self.config.wave_rate);
        let smoothing = self.config.smoothing;
        for dot in &mut self.dots {
            let target: f32 = self
                .waves
                .iter()
                .filter_map(|wave| {
                    let distance = dot.base.distance(wave.origin);
                    (distance < wave.radius).then(|| {
                        (dot.phase + swing).sin() * (1.0 - distance / wave.radius) * wave.strength
                    })
                })
                .sum();
            dot.offset += (target - dot.offset) * smoothing;
            dot.position = dot.base + dot.axis() * dot.offset;
        }
    }

    pub fn display(&self, canvas: &mut dyn Canvas) {
        for dot in &self.dots {
            canvas.fill_circle(dot.position, dot.size * 0.5, Rgba::WHITE.with_alpha(dot.alpha));
        }
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn waves(&self) -> &[WaveEffect] {
        &self.waves
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> EffectField {
        EffectField::create_grid(800.0, 600.0, FieldConfig::default(), &mut Rng::new(3))
    }

    #[test]
    fn grid_covers_canvas_with_jitter() {
        let f = field();
        // ceil(800/35)+1 = 24 columns, ceil(600/35)+1 = 19 rows.
        assert_eq!(f.dots().len(), 24 * 19);
        for (k, dot) in f.dots().iter().enumerate() {
            let cell = Vec2::new((k / 19) as f32 * 35.0, (k % 19) as f32 * 35.0);
            assert!((dot.base - cell).abs().max_element() <= 2.0);
            assert_eq!(dot.position, dot.base);
        }
    }

    #[test]
    fn wave_strength_decays_to_zero_then_prunes() {
        let mut f = field();
        f.add_wave(Vec2::new(400.0, 300.0), 10.0, 1000.0);
        assert_eq!(f.waves()[0].radius, 60.0);

        let mut last = f32::MAX;
        for t in [1000.0, 1300.0, 1750.0, 2200.0, 2500.0] {
            f.update_waves(t);
            let s = f.waves()[0].strength;
            assert!(s <= last);
            last = s;
        }
        assert_eq!(last, 0.0);

        f.update_waves(2500.1);
        assert!(f.waves().is_empty());
    }

    #[test]
    fn strength_is_linear() {
        let w = WaveEffect::new(Vec2::ZERO, 60.0, 6.0, 0.0, 1500.0);
        assert_eq!(w.strength_at(0.0), 6.0);
        assert!((w.strength_at(750.0) - 3.0).abs() < 1e-5);
        assert_eq!(w.strength_at(1500.0), 0.0);
    }

    #[test]
    fn only_dots_inside_radius_move() {
        let mut f = field();
        f.add_wave(Vec2::new(400.0, 300.0), 10.0, 0.0);
        for step in 0..20 {
            f.update_waves(step as f64 * 16.0);
            f.update_dots(step as f64 * 16.0);
        }
        for dot in f.dots() {
            if dot.base.distance(Vec2::new(400.0, 300.0)) >= 60.0 {
                assert_eq!(dot.offset, 0.0);
                assert_eq!(dot.position, dot.base);
            }
        }
        assert!(f.dots().iter().any(|d| d.offset != 0.0));
    }

    #[test]
    fn displacement_is_smoothed() {
        let mut f = EffectField::new(FieldConfig::default());
        f.dots.push(Dot {
            base: Vec2::ZERO,
            position: Vec2::ZERO,
            size: 3.0,
            alpha: 40,
            phase: std::f32::consts::FRAC_PI_2,
            offset: 0.0,
        });
        f.add_wave(Vec2::ZERO, 10.0, 0.0);
        f.update_dots(0.0);
        // sin(pi/2) * 1 * 6, one smoothing step of 0.1.
        assert!((f.dots()[0].offset - 0.6).abs() < 1e-5);
        assert!((f.dots()[0].position.x - 0.6).abs() < 1e-5);
    }

    #[test]
    fn swing_keeps_frame_resolution_after_a_day() {
        let day = 86_400_000.0;
        let step = swing_at(day + 16.0, 0.01) - swing_at(day, 0.01);
        assert!((step - 0.16).abs() < 1e-4, "step={step}");
        let swing = swing_at(day, 0.01);
        assert!((0.0..std::f32::consts::TAU).contains(&swing));
        assert_eq!(swing_at(0.0, 0.01), 0.0);
    }

    #[test]
    fn rebuild_replaces_dots() {
        let mut f = field();
        f.rebuild(100.0, 100.0, &mut Rng::new(1));
        assert_eq!(f.dots().len(), 4 * 4);
    }
}
