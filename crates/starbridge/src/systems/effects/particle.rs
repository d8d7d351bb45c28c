//! Particle bursts fired on bridge impacts.

use glam::Vec2;

use super::rng::Rng;
use crate::api::config::ParticleConfig;
use crate::renderer::color::Rgba;
use crate::renderer::traits::Canvas;

/// Lifespan of a fresh particle; also its initial alpha.
pub const FULL_LIFESPAN: f32 = 255.0;

/// Outline of one particle. Re-rolled every frame, so bursts flicker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleShape {
    Circle,
    Square,
}

impl ParticleShape {
    /// Even odds of either shape.
    pub fn roll(rng: &mut Rng) -> Self {
        if rng.chance(0.5) {
            ParticleShape::Circle
        } else {
            ParticleShape::Square
        }
    }
}

/// A single visual-only particle. Units are pixels and processed frames.
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub color: Rgba,
    pub lifespan: f32,
    pub decay: f32,
    pub angle: f32,
    pub spin: f32,
    pub shape: ParticleShape,
}

impl Particle {
    pub fn new(origin: Vec2, base: Rgba, config: &ParticleConfig, rng: &mut Rng) -> Self {
        let heading = rng.angle();
        let speed = rng.range(config.speed_min, config.speed_max);
        let jitter = config.color_jitter.max(0);
        let mut channel = || rng.below(2 * jitter as u32 + 1) as i16 - jitter;
        let (dr, dg, db) = (channel(), channel(), channel());
        Particle {
            position: origin,
            velocity: Vec2::new(heading.cos(), heading.sin()) * speed,
            size: rng.range(config.size_min, config.size_max),
            color: base.offset(dr, dg, db).with_alpha(255),
            lifespan: FULL_LIFESPAN,
            decay: rng.range(config.decay_min, config.decay_max),
            angle: 0.0,
            spin: rng.range(-config.spin, config.spin),
            shape: ParticleShape::roll(rng),
        }
    }

    /// Advance one frame: move, fall, damp, spin and fade.
    pub fn update(&mut self, gravity: f32, damping: f32) {
        self.position += self.velocity;
        self.velocity.y += gravity;
        self.velocity *= damping;
        self.angle += self.spin;
        self.lifespan -= self.decay;
        self.color.a = self.lifespan.clamp(0.0, 255.0) as u8;
    }

    pub fn is_dead(&self) -> bool {
        self.lifespan <= 0.0
    }

    pub fn display(&self, canvas: &mut dyn Canvas) {
        canvas.save();
        canvas.translate(self.position);
        canvas.rotate(self.angle);
        match self.shape {
            ParticleShape::Circle => canvas.fill_circle(Vec2::ZERO, self.size * 0.5, self.color),
            ParticleShape::Square => {
                let half = Vec2::splat(self.size * 0.5);
                canvas.fill_rect(-half, half * 2.0, self.color);
            }
        }
        canvas.restore();
    }
}

/// Live particle pool. Bursts append; `update` prunes dead particles.
#[derive(Debug, Clone)]
pub struct ParticleBurst {
    particles: Vec<Particle>,
    config: ParticleConfig,
}

impl ParticleBurst {
    pub fn new(config: ParticleConfig) -> Self {
        Self {
            particles: Vec::with_capacity(config.count * 4),
            config,
        }
    }

    /// Add a batch of `config.count` particles around `origin`.
    pub fn spawn(&mut self, origin: Vec2, base: Rgba, rng: &mut Rng) {
        for _ in 0..self.config.count {
            self.particles.push(Particle::new(origin, base, &self.config, rng));
        }
        log::debug!("particle burst at ({:.0}, {:.0}), {} live", origin.x, origin.y, self.particles.len());
    }

    /// Advance every particle, drop the dead ones and re-roll each survivor's shape.
    pub fn update(&mut self, rng: &mut Rng) {
        let (gravity, damping) = (self.config.gravity, self.config.damping);
        for p in &mut self.particles {
            p.update(gravity, damping);
        }
        self.particles.retain(|p| !p.is_dead());
        for p in &mut self.particles {
            p.shape = ParticleShape::roll(rng);
        }
    }

    pub fn display(&self, canvas: &mut dyn Canvas) {
        for p in &self.particles {
            p.display(canvas);
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
