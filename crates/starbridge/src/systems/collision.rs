//! Turns raw physics contacts into star/bridge impact effects.

use glam::Vec2;

use crate::api::types::{BodyTag, EntityId};
use crate::components::star::Star;
use crate::core::physics::CollisionPair;
use crate::systems::audio::AudioEnvelopeEngine;
use crate::systems::effects::{EffectField, ParticleBurst, Rng};

pub const MIN_FORCE: f32 = 0.5;
pub const MAX_FORCE: f32 = 3.0;

/// Impact strength from penetration depth, clamped to [0.5, 3.0].
pub fn collision_force(depth: f32) -> f32 {
    (depth * 2.0).clamp(MIN_FORCE, MAX_FORCE)
}

/// The star in a started star/bridge pair, in either order.
pub fn resolve_star_bridge(pair: &CollisionPair) -> Option<EntityId> {
    if !pair.started {
        return None;
    }
    match (pair.tag_a, pair.tag_b) {
        (BodyTag::Star(id), BodyTag::BridgeSegment(_))
        | (BodyTag::BridgeSegment(_), BodyTag::Star(id)) => Some(id),
        _ => None,
    }
}

/// One star/bridge impact that produced effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub star: EntityId,
    pub force: f32,
    pub point: Vec2,
}

/// What a dispatch pass did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    pub hits: Vec<Hit>,
    /// Pairs that did not match a live star and the bridge.
    pub ignored: usize,
}

/// Everything an impact writes to besides the star itself.
pub struct EffectSinks<'a> {
    pub field: &'a mut EffectField,
    pub particles: &'a mut ParticleBurst,
    pub audio: &'a mut AudioEnvelopeEngine,
    pub rng: &'a mut Rng,
}

/// Apply every matching pair: recolor the star, play the impact tone, start a
/// wave and a particle burst at the contact, and stamp the star. One pair
/// yields exactly one of each.
pub fn dispatch(
    pairs: &[CollisionPair],
    stars: &mut [Star],
    sinks: &mut EffectSinks<'_>,
    now_ms: f64,
) -> DispatchReport {
    let mut report = DispatchReport::default();
    for pair in pairs {
        let Some(id) = resolve_star_bridge(pair) else {
            report.ignored += 1;
            continue;
        };
        let Some(star) = stars.iter_mut().find(|s| s.id == id) else {
            report.ignored += 1;
            continue;
        };

        star.change_color();
        let force = collision_force(pair.depth);
        sinks.audio.rope_collision(force);
        sinks.field.add_wave(pair.point, star.radius, now_ms);
        sinks.particles.spawn(pair.point, star.color.to_rgba(), sinks.rng);
        star.record_collision(now_ms, force);

        log::debug!(
            "star {} hit bridge at ({:.0}, {:.0}) force {:.2}",
            id.0,
            pair.point.x,
            pair.point.y,
            force
        );
        report.hits.push(Hit {
            star: id,
            force,
            point: pair.point,
        });
    }
    report
}
