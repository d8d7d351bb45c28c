//! Visual-only effects: the rippling dot grid and particle bursts.
//!
//! Neither touches the physics world; collision dispatch drives both.

mod field;
mod particle;
mod rng;

pub use field::{Dot, EffectField, WaveEffect};
pub use particle::{Particle, ParticleBurst, ParticleShape, FULL_LIFESPAN};
pub use rng::Rng;
