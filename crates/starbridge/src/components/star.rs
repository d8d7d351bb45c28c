use glam::Vec2;

use crate::api::config::StarConfig;
use crate::api::types::{BodyTag, EntityId};
use crate::core::physics::{layers, BodyDesc, ColliderDesc, ColliderMaterial, PhysicsBody, PhysicsWorld};
use crate::extensions::easing::Easing;
use crate::renderer::color::Hsb;
use crate::renderer::path::star_polygon;
use crate::renderer::traits::Canvas;
use crate::systems::effects::Rng;

const SATURATION: f32 = 80.0;
const BRIGHTNESS: f32 = 100.0;
const INNER_RATIO: f32 = 0.5;
const DEFORM_GAIN: f32 = 0.12;

/// Lifecycle of a star. `Removed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarState {
    Falling,
    Settled,
    Tossed,
    Removed,
}

/// A falling star: a physics ball plus its look and impact history.
#[derive(Debug, Clone)]
pub struct Star {
    pub id: EntityId,
    pub body: PhysicsBody,
    pub radius: f32,
    pub base_color: Hsb,
    pub color: Hsb,
    pub state: StarState,
    /// Copied from the physics body once per frame.
    pub position: Vec2,
    pub rotation: f32,
    pub last_collision_ms: Option<f64>,
    pub collision_force: f32,
    pub collisions: u32,
    hue_step: f32,
}

impl Star {
    /// Spawn above the canvas at a random x with random size, hue and drift.
    pub fn spawn(
        id: EntityId,
        physics: &mut PhysicsWorld,
        config: &StarConfig,
        canvas_width: f32,
        rng: &mut Rng,
    ) -> Self {
        let radius = rng.range(config.radius_min, config.radius_max);
        let position = Vec2::new(rng.range(0.0, canvas_width), -2.0 * radius);
        let velocity = Vec2::new(rng.range(-config.spawn_drift, config.spawn_drift), 0.0);
        let hue = rng.range(0.0, 360.0);
        Self::spawn_at(id, physics, position, radius, velocity, hue, config.hue_step)
    }

    /// Spawn with every parameter given.
    pub fn spawn_at(
        id: EntityId,
        physics: &mut PhysicsWorld,
        position: Vec2,
        radius: f32,
        velocity: Vec2,
        hue: f32,
        hue_step: f32,
    ) -> Self {
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius })
            .with_position(position)
            .with_velocity(velocity)
            .with_layers(layers::STAR, layers::STAR | layers::BRIDGE);
        let body = physics.create_body(BodyTag::Star(id), &desc, ColliderMaterial::default());
        let color = Hsb::new(hue, SATURATION, BRIGHTNESS);
        Self {
            id,
            body,
            radius,
            base_color: color,
            color,
            state: StarState::Falling,
            position,
            rotation: 0.0,
            last_collision_ms: None,
            collision_force: 0.0,
            collisions: 0,
            hue_step,
        }
    }

    /// Pull position and rotation from the physics world.
    pub fn sync(&mut self, physics: &PhysicsWorld) {
        let (position, rotation) = physics.body_position(&self.body);
        self.position = position;
        self.rotation = rotation;
    }

    /// Rotate the hue one step. Called once per bridge contact.
    pub fn change_color(&mut self) {
        self.color = self.color.rotated(self.hue_step);
    }

    /// Stamp an impact for the squash-and-stretch and settle a falling star.
    pub fn record_collision(&mut self, now_ms: f64, force: f32) {
        self.last_collision_ms = Some(now_ms);
        self.collision_force = force;
        self.collisions += 1;
        if self.state == StarState::Falling {
            self.state = StarState::Settled;
        }
    }

    /// Fling the star upward with a random sideways component.
    pub fn toss(&mut self, physics: &mut PhysicsWorld, config: &StarConfig, rng: &mut Rng) {
        if self.state == StarState::Removed {
            return;
        }
        let mass = physics.mass(&self.body);
        let kick = Vec2::new(rng.range(-config.toss_spread, config.toss_spread), -config.toss_speed);
        physics.apply_impulse(&self.body, kick * mass);
        self.state = StarState::Tossed;
    }

    /// Take the body out of the physics world. Later calls do nothing.
    pub fn remove(&mut self, physics: &mut PhysicsWorld) {
        if self.state == StarState::Removed {
            return;
        }
        physics.remove_body(&self.body);
        self.state = StarState::Removed;
    }

    /// Left, right or below the canvas by more than the radius. The top stays open.
    pub fn is_out_of_bounds(&self, width: f32, height: f32) -> bool {
        let Vec2 { x, y } = self.position;
        x < -self.radius || x > width + self.radius || y > height + self.radius
    }

    /// Render scale for the squash-and-stretch after the last impact.
    /// `Vec2::ONE` outside the deformation window.
    pub fn deformation(&self, now_ms: f64, window_ms: f64) -> Vec2 {
        let Some(hit) = self.last_collision_ms else {
            return Vec2::ONE;
        };
        let elapsed = now_ms - hit;
        if window_ms <= 0.0 || !(0.0..window_ms).contains(&elapsed) {
            return Vec2::ONE;
        }
        let t = (elapsed / window_ms) as f32;
        let amount = DEFORM_GAIN * self.collision_force * (1.0 - Easing::ElasticOut.apply(t));
        Vec2::new(1.0 + amount, 1.0 - amount)
    }

    pub fn display(&self, canvas: &mut dyn Canvas, now_ms: f64, window_ms: f64) {
        canvas.save();
        canvas.translate(self.position);
        canvas.rotate(self.rotation);
        canvas.scale(self.deformation(now_ms, window_ms));
        canvas.fill_polygon(
            &star_polygon(self.radius, self.radius * INNER_RATIO, 5),
            self.color.to_rgba(),
        );
        canvas.restore();
    }
}
