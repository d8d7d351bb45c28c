//! rapier2d behind a small glam-facing surface.
//!
//! Units are pixels and seconds with Y pointing down. Every body carries its
//! [`BodyTag`] in rapier's `user_data`, so collision events come back already
//! resolved to simulation entities.

use glam::Vec2;
use rapier2d::prelude::*;
use std::sync::{Mutex, PoisonError};

use crate::api::types::BodyTag;

#[inline]
fn to_na(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

#[inline]
fn from_na(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// How the solver treats a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Dynamic,
    /// Moved by setting its next position; ignores forces.
    Kinematic,
}

impl From<BodyKind> for RigidBodyType {
    fn from(kind: BodyKind) -> Self {
        match kind {
            BodyKind::Dynamic => RigidBodyType::Dynamic,
            BodyKind::Kinematic => RigidBodyType::KinematicPositionBased,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderDesc {
    Ball { radius: f32 },
}

impl ColliderDesc {
    fn shape(self) -> ColliderBuilder {
        match self {
            ColliderDesc::Ball { radius } => ColliderBuilder::ball(radius),
        }
    }
}

/// Surface response of a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.5,
            density: 1.0,
        }
    }
}

/// Collision layer bits. A collider interacts with another only when each one's
/// `filter` contains the other's `membership`.
pub mod layers {
    pub const BRIDGE: u32 = 1 << 0;
    pub const STAR: u32 = 1 << 1;
    pub const NONE: u32 = 0;
    pub const ALL: u32 = u32::MAX;
}

/// Everything needed to create one body with a single collider.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub collider: ColliderDesc,
    pub position: Vec2,
    pub velocity: Vec2,
    pub membership: u32,
    pub filter: u32,
}

impl BodyDesc {
    fn of_kind(kind: BodyKind, collider: ColliderDesc) -> Self {
        Self {
            kind,
            collider,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            membership: layers::ALL,
            filter: layers::ALL,
        }
    }

    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self::of_kind(BodyKind::Dynamic, collider)
    }

    /// Moved with [`PhysicsWorld::set_kinematic_position`].
    pub fn kinematic(collider: ColliderDesc) -> Self {
        Self::of_kind(BodyKind::Kinematic, collider)
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Layer this body sits on and the layers it reacts to.
    pub fn with_layers(mut self, membership: u32, filter: u32) -> Self {
        self.membership = membership;
        self.filter = filter;
        self
    }
}

/// Handles of a created body and its collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsBody {
    pub handle: RigidBodyHandle,
    pub collider: ColliderHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointHandle(pub ImpulseJointHandle);

/// Joints always attach at the body centres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointDesc {
    /// Never lets the bodies drift more than `length` apart. Inside that limit
    /// a motor pulls slack back out toward `length`; its stiffness and damping
    /// are acceleration based and do not scale with mass.
    Rope {
        length: f32,
        stiffness: f32,
        damping: f32,
    },
    /// Holds the centres together; rotation stays free.
    Pin,
}

/// One collision start or stop between two tagged bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionPair {
    pub tag_a: BodyTag,
    pub tag_b: BodyTag,
    pub started: bool,
    /// Penetration of the deepest contact, 0 when merely touching.
    pub depth: f32,
    /// World-space contact point.
    pub point: Vec2,
}

#[derive(Debug, Clone, Copy)]
struct Contact {
    depth: f32,
    point: Vec2,
}

/// Event sink handed to the pipeline. rapier wants `Sync`; on wasm there are
/// no other threads, so the lock is never contended.
#[derive(Default)]
struct ContactLog {
    entries: Mutex<Vec<(CollisionEvent, Option<Contact>)>>,
}

impl ContactLog {
    fn take(&self) -> Vec<(CollisionEvent, Option<Contact>)> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *entries)
    }
}

impl EventHandler for ContactLog {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        colliders: &ColliderSet,
        event: CollisionEvent,
        contact_pair: Option<&ContactPair>,
    ) {
        // The manifold can be gone once the step returns.
        let contact = contact_pair.and_then(|pair| {
            let (_, deepest) = pair.find_deepest_contact()?;
            let first = colliders.get(pair.collider1)?;
            let at = first.position() * deepest.local_p1;
            Some(Contact {
                depth: (-deepest.dist).max(0.0),
                point: Vec2::new(at.x, at.y),
            })
        });
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((event, contact));
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _pair: &ContactPair,
        _magnitude: Real,
    ) {
    }
}

/// Owns the rapier sets and pipeline state for one simulation.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad: DefaultBroadPhase,
    narrow: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    joints: ImpulseJointSet,
    multibody: MultibodyJointSet,
    ccd: CCDSolver,
    queries: QueryPipeline,
    log: ContactLog,
}

impl PhysicsWorld {
    /// `gravity` in px/s²; positive Y pulls down the screen.
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: to_na(gravity),
            params: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad: DefaultBroadPhase::new(),
            narrow: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            joints: ImpulseJointSet::new(),
            multibody: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            queries: QueryPipeline::new(),
            log: ContactLog::default(),
        }
    }

    pub fn set_dt(&mut self, dt: f32) {
        self.params.dt = dt;
    }

    /// Scale solver tolerances to the world's units (100 when 1 m ≈ 100 px).
    pub fn set_length_unit(&mut self, unit: f32) {
        self.params.length_unit = unit;
    }

    pub fn create_body(
        &mut self,
        tag: BodyTag,
        desc: &BodyDesc,
        material: ColliderMaterial,
    ) -> PhysicsBody {
        let body = RigidBodyBuilder::new(desc.kind.into())
            .translation(to_na(desc.position))
            .linvel(to_na(desc.velocity))
            .user_data(tag.to_user_data())
            .build();
        let handle = self.bodies.insert(body);

        let groups = InteractionGroups::new(
            Group::from_bits_truncate(desc.membership),
            Group::from_bits_truncate(desc.filter),
        );
        let collider = desc
            .collider
            .shape()
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .collision_groups(groups)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        PhysicsBody { handle, collider }
    }

    /// Drops the body together with its collider and every joint touching it.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.joints,
            &mut self.multibody,
            true,
        );
    }

    /// Integrate once and append this step's collision events to `out`.
    pub fn step_into(&mut self, out: &mut Vec<CollisionPair>) {
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad,
            &mut self.narrow,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.joints,
            &mut self.multibody,
            &mut self.ccd,
            Some(&mut self.queries),
            &(),
            &self.log,
        );

        for (event, contact) in self.log.take() {
            let started = event.started();
            let (c1, c2) = (event.collider1(), event.collider2());
            let (Some(tag_a), Some(tag_b)) = (self.tag_of(c1), self.tag_of(c2)) else {
                continue;
            };
            // Stop events carry no manifold.
            let contact = contact.unwrap_or_else(|| Contact {
                depth: 0.0,
                point: (self.collider_center(c1) + self.collider_center(c2)) * 0.5,
            });
            out.push(CollisionPair {
                tag_a,
                tag_b,
                started,
                depth: contact.depth,
                point: contact.point,
            });
        }
    }

    pub fn apply_impulse(&mut self, body: &PhysicsBody, impulse: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.handle) {
            rb.apply_impulse(to_na(impulse), true);
        }
    }

    pub fn velocity(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.handle)
            .map_or(Vec2::ZERO, |rb| from_na(rb.linvel()))
    }

    /// 0 for removed bodies.
    pub fn mass(&self, body: &PhysicsBody) -> f32 {
        self.bodies.get(body.handle).map_or(0.0, |rb| rb.mass())
    }

    /// Where a kinematic body will be after the next step.
    pub fn set_kinematic_position(&mut self, body: &PhysicsBody, position: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.handle) {
            rb.set_next_kinematic_translation(to_na(position));
        }
    }

    pub fn kinematic_target(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.handle)
            .map_or(Vec2::ZERO, |rb| from_na(&rb.next_position().translation.vector))
    }

    /// Position and rotation (radians).
    pub fn body_position(&self, body: &PhysicsBody) -> (Vec2, f32) {
        self.bodies.get(body.handle).map_or((Vec2::ZERO, 0.0), |rb| {
            let iso = rb.position();
            (from_na(&iso.translation.vector), iso.rotation.angle())
        })
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn create_joint(&mut self, a: &PhysicsBody, b: &PhysicsBody, desc: &JointDesc) -> JointHandle {
        let joint: GenericJoint = match *desc {
            JointDesc::Rope { length, stiffness, damping } => RopeJointBuilder::new(length)
                .motor_model(MotorModel::AccelerationBased)
                .motor_position(length, stiffness, damping)
                .build()
                .into(),
            JointDesc::Pin => RevoluteJointBuilder::new().build().into(),
        };
        JointHandle(self.joints.insert(a.handle, b.handle, joint, true))
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    fn tag_of(&self, collider: ColliderHandle) -> Option<BodyTag> {
        let parent = self.colliders.get(collider)?.parent()?;
        self.bodies
            .get(parent)
            .map(|rb| BodyTag::from_user_data(rb.user_data))
    }

    fn collider_center(&self, collider: ColliderHandle) -> Vec2 {
        self.colliders
            .get(collider)
            .map_or(Vec2::ZERO, |c| from_na(&c.position().translation.vector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;

    const DT: f32 = 1.0 / 60.0;

    fn world_with_gravity(gravity: f32) -> PhysicsWorld {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, gravity));
        world.set_dt(DT);
        world
    }

    fn drop_star(world: &mut PhysicsWorld, id: u32, at: Vec2, velocity: Vec2) -> PhysicsBody {
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 10.0 })
            .with_position(at)
            .with_velocity(velocity)
            .with_layers(layers::STAR, layers::STAR | layers::BRIDGE);
        world.create_body(BodyTag::Star(EntityId(id)), &desc, ColliderMaterial::default())
    }

    fn segment(world: &mut PhysicsWorld, index: u32, at: Vec2) -> PhysicsBody {
        moving_segment(world, index, at, Vec2::ZERO)
    }

    fn moving_segment(world: &mut PhysicsWorld, index: u32, at: Vec2, velocity: Vec2) -> PhysicsBody {
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 5.0 })
            .with_position(at)
            .with_velocity(velocity)
            .with_layers(layers::BRIDGE, layers::STAR);
        world.create_body(BodyTag::BridgeSegment(index), &desc, ColliderMaterial::default())
    }

    fn run(world: &mut PhysicsWorld, steps: usize) -> Vec<CollisionPair> {
        let mut events = Vec::new();
        for _ in 0..steps {
            world.step_into(&mut events);
        }
        events
    }

    #[test]
    fn removed_star_leaves_the_world() {
        let mut world = world_with_gravity(0.0);
        let star = drop_star(&mut world, 1, Vec2::ZERO, Vec2::ZERO);
        assert_eq!(world.body_count(), 1);
        world.remove_body(&star);
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.mass(&star), 0.0);
        assert_eq!(world.body_position(&star), (Vec2::ZERO, 0.0));
    }

    #[test]
    fn star_falls_under_screen_gravity() {
        let mut world = world_with_gravity(1000.0);
        let star = drop_star(&mut world, 1, Vec2::new(50.0, -20.0), Vec2::ZERO);
        run(&mut world, 10);
        let (pos, _) = world.body_position(&star);
        assert!(pos.y > -20.0, "star should fall: {pos:?}");
        assert!(world.velocity(&star).y > 0.0);
    }

    #[test]
    fn upward_toss_impulse_scaled_by_mass() {
        let mut world = world_with_gravity(0.0);
        let star = drop_star(&mut world, 1, Vec2::ZERO, Vec2::ZERO);
        // Mass properties settle on the first step.
        run(&mut world, 1);
        let mass = world.mass(&star);
        assert!(mass > 0.0);

        world.apply_impulse(&star, Vec2::new(40.0, -300.0) * mass);
        let vel = world.velocity(&star);
        assert!((vel.y + 300.0).abs() < 0.5, "vel={vel:?}");
        assert!((vel.x - 40.0).abs() < 0.5, "vel={vel:?}");
    }

    #[test]
    fn kinematic_target_is_exact_before_step() {
        let mut world = world_with_gravity(0.0);
        let anchor = world.create_body(
            BodyTag::Anchor,
            &BodyDesc::kinematic(ColliderDesc::Ball { radius: 1.0 })
                .with_position(Vec2::new(10.0, 10.0)),
            ColliderMaterial::default(),
        );
        let target = Vec2::new(123.25, -4.5);
        world.set_kinematic_position(&anchor, target);
        assert_eq!(world.kinematic_target(&anchor), target);

        run(&mut world, 1);
        let (pos, _) = world.body_position(&anchor);
        assert!((pos - target).length() < 1e-3, "pos={pos:?}");
    }

    #[test]
    fn star_hitting_segment_reports_tags_and_contact() {
        let mut world = world_with_gravity(0.0);
        drop_star(&mut world, 7, Vec2::new(0.0, 0.0), Vec2::new(0.0, 300.0));
        segment(&mut world, 3, Vec2::new(0.0, 40.0));

        let events = run(&mut world, 60);
        let hit = events.iter().find(|e| e.started).expect("a started pair");
        let tags = [hit.tag_a, hit.tag_b];
        assert!(tags.contains(&BodyTag::Star(EntityId(7))));
        assert!(tags.contains(&BodyTag::BridgeSegment(3)));
        assert!(hit.depth >= 0.0);
        assert!(hit.point.y > 0.0 && hit.point.y < 45.0, "point={:?}", hit.point);
    }

    #[test]
    fn segments_never_collide_with_each_other() {
        let mut world = world_with_gravity(0.0);
        moving_segment(&mut world, 0, Vec2::new(0.0, 0.0), Vec2::new(200.0, 0.0));
        moving_segment(&mut world, 1, Vec2::new(30.0, 0.0), Vec2::new(-200.0, 0.0));
        let events = run(&mut world, 60);
        assert!(events.is_empty(), "segments collided: {events:?}");
    }

    fn pinned(world: &mut PhysicsWorld, at: Vec2) -> PhysicsBody {
        world.create_body(
            BodyTag::Anchor,
            &BodyDesc::kinematic(ColliderDesc::Ball { radius: 1.0 })
                .with_position(at)
                .with_layers(layers::NONE, layers::NONE),
            ColliderMaterial::default(),
        )
    }

    fn rope(length: f32) -> JointDesc {
        JointDesc::Rope { length, stiffness: 2000.0, damping: 40.0 }
    }

    #[test]
    fn rope_holds_a_hanging_weight_at_its_length() {
        let mut world = world_with_gravity(1000.0);
        let top = pinned(&mut world, Vec2::ZERO);
        let weight = drop_star(&mut world, 1, Vec2::new(0.0, 25.0), Vec2::new(0.0, 400.0));
        world.create_joint(&top, &weight, &rope(25.0));

        for _ in 0..120 {
            run(&mut world, 1);
            let (pos, _) = world.body_position(&weight);
            assert!(pos.length() < 27.0, "rope stretched to {}", pos.length());
        }
    }

    #[test]
    fn slack_rope_pulls_back_out_to_length() {
        let mut world = world_with_gravity(0.0);
        let a = pinned(&mut world, Vec2::ZERO);
        let b = segment(&mut world, 1, Vec2::new(10.0, 0.0));
        world.create_joint(&a, &b, &rope(30.0));
        run(&mut world, 120);
        let gap = world.body_position(&b).0.x;
        assert!(gap > 20.0 && gap < 31.0, "gap={gap}");
    }

    #[test]
    fn pinned_segment_follows_moving_anchor() {
        let mut world = world_with_gravity(0.0);
        let anchor = pinned(&mut world, Vec2::ZERO);
        let seg = segment(&mut world, 0, Vec2::ZERO);
        world.create_joint(&anchor, &seg, &JointDesc::Pin);
        assert_eq!(world.joint_count(), 1);

        let mut events = Vec::new();
        for step in 1..=60 {
            world.set_kinematic_position(&anchor, Vec2::new(step as f32, 0.0));
            world.step_into(&mut events);
        }
        let (pos, _) = world.body_position(&seg);
        assert!((pos.x - 60.0).abs() < 5.0, "segment lagged: {pos:?}");
    }

    #[test]
    fn joints_go_with_their_bodies() {
        let mut world = world_with_gravity(0.0);
        let a = segment(&mut world, 0, Vec2::ZERO);
        let b = segment(&mut world, 1, Vec2::new(20.0, 0.0));
        world.create_joint(&a, &b, &rope(20.0));
        assert_eq!(world.joint_count(), 1);

        world.remove_body(&a);
        assert_eq!(world.joint_count(), 0);
    }
}
