use glam::Vec2;

use crate::api::config::BridgeConfig;
use crate::api::types::BodyTag;
use crate::core::physics::{
    layers, BodyDesc, ColliderDesc, ColliderMaterial, JointDesc, JointHandle, PhysicsBody,
    PhysicsWorld,
};
use crate::renderer::color::Rgba;
use crate::renderer::path::{smooth_curve, CURVE_TOLERANCE};
use crate::renderer::traits::Canvas;

const ANCHOR_RADIUS: f32 = 1.0;
const CURVE_WIDTH: f32 = 4.0;
const CURVE_COLOR: Rgba = Rgba::WHITE;
const JOINT_DOT_RADIUS: f32 = 3.0;

/// A chain of ball bodies linked by ropes no longer than `segment_length`,
/// pinned at both ends to invisible kinematic anchors that follow the control
/// points. Links go slack when the ends close in but never stretch.
#[derive(Debug, Clone)]
pub struct Bridge {
    segments: Vec<PhysicsBody>,
    links: Vec<JointHandle>,
    anchors: [PhysicsBody; 2],
    pins: [JointHandle; 2],
    rest_anchors: [Vec2; 2],
    body_radius: f32,
    positions: Vec<Vec2>,
}

impl Bridge {
    /// Build the chain centred on `center`, horizontal, with its ends pinned
    /// where the first and last bodies start.
    pub fn create(physics: &mut PhysicsWorld, config: &BridgeConfig, center: Vec2) -> Self {
        let count = config.segments.max(2) as usize;
        let span = config.segment_length * (count - 1) as f32;
        let start = center - Vec2::new(span * 0.5, 0.0);

        let positions: Vec<Vec2> = (0..count)
            .map(|i| start + Vec2::new(i as f32 * config.segment_length, 0.0))
            .collect();

        let segments: Vec<PhysicsBody> = positions
            .iter()
            .enumerate()
            .map(|(i, &pos)| {
                let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: config.body_radius })
                    .with_position(pos)
                    .with_layers(layers::BRIDGE, layers::STAR);
                physics.create_body(BodyTag::BridgeSegment(i as u32), &desc, ColliderMaterial::default())
            })
            .collect();

        let link = JointDesc::Rope {
            length: config.segment_length,
            stiffness: config.stiffness,
            damping: config.damping,
        };
        let links = segments
            .windows(2)
            .map(|pair| physics.create_joint(&pair[0], &pair[1], &link))
            .collect();

        let rest_anchors = [positions[0], positions[count - 1]];
        let anchors = rest_anchors.map(|pos| {
            let desc = BodyDesc::kinematic(ColliderDesc::Ball { radius: ANCHOR_RADIUS })
                .with_position(pos)
                .with_layers(layers::NONE, layers::NONE);
            physics.create_body(BodyTag::Anchor, &desc, ColliderMaterial::default())
        });
        let pins = [
            physics.create_joint(&anchors[0], &segments[0], &JointDesc::Pin),
            physics.create_joint(&anchors[1], &segments[count - 1], &JointDesc::Pin),
        ];

        log::info!(
            "bridge created: {count} bodies, {:.0}px span at ({:.0}, {:.0})",
            span,
            center.x,
            center.y
        );

        Self {
            segments,
            links,
            anchors,
            pins,
            rest_anchors,
            body_radius: config.body_radius,
            positions,
        }
    }

    /// Move both pins to the given control points. Takes effect on the next step;
    /// coordinates are used as-is.
    pub fn update_endpoints(&mut self, physics: &mut PhysicsWorld, a: Vec2, b: Vec2) {
        physics.set_kinematic_position(&self.anchors[0], a);
        physics.set_kinematic_position(&self.anchors[1], b);
    }

    /// Current pin targets.
    pub fn anchor_targets(&self, physics: &PhysicsWorld) -> [Vec2; 2] {
        self.anchors.map(|anchor| physics.kinematic_target(&anchor))
    }

    /// Pin positions used before any control input arrives.
    pub fn rest_anchors(&self) -> [Vec2; 2] {
        self.rest_anchors
    }

    /// Copy body positions out of the physics world.
    pub fn sync(&mut self, physics: &PhysicsWorld) {
        for (slot, body) in self.positions.iter_mut().zip(&self.segments) {
            *slot = physics.body_position(body).0;
        }
    }

    /// Body positions as of the last `sync`, in chain order.
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    pub fn body_radius(&self) -> f32 {
        self.body_radius
    }

    pub fn display(&self, canvas: &mut dyn Canvas) {
        let curve = smooth_curve(&self.positions, CURVE_TOLERANCE);
        canvas.stroke_polyline(&curve, CURVE_WIDTH, CURVE_COLOR);
        for &p in &self.positions {
            canvas.fill_circle(p, JOINT_DOT_RADIUS, CURVE_COLOR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use crate::renderer::traits::{DrawCall, RecordingCanvas};

    fn setup() -> (PhysicsWorld, Bridge) {
        let mut physics = PhysicsWorld::new(Vec2::new(0.0, 1000.0));
        physics.set_dt(1.0 / 60.0);
        let bridge = Bridge::create(&mut physics, &BridgeConfig::default(), Vec2::new(400.0, 300.0));
        (physics, bridge)
    }

    #[test]
    fn chain_is_centred_on_midline() {
        let (physics, bridge) = setup();
        assert_eq!(bridge.segment_count(), 8);
        assert_eq!(bridge.link_count(), 7);
        assert_eq!(bridge.pin_count(), 2);
        assert_eq!(physics.joint_count(), 9);
        // 8 segments + 2 anchors.
        assert_eq!(physics.body_count(), 10);
        assert_eq!(bridge.positions()[0], Vec2::new(312.5, 300.0));
        assert_eq!(bridge.positions()[7], Vec2::new(487.5, 300.0));
        assert_eq!(bridge.rest_anchors(), [Vec2::new(312.5, 300.0), Vec2::new(487.5, 300.0)]);
    }

    #[test]
    fn update_endpoints_sets_targets_exactly() {
        let (mut physics, mut bridge) = setup();
        let a = Vec2::new(123.25, 456.5);
        let b = Vec2::new(-40.0, 900.0);
        bridge.update_endpoints(&mut physics, a, b);
        assert_eq!(bridge.anchor_targets(&physics), [a, b]);
    }

    #[test]
    fn ends_follow_the_pins() {
        let (mut physics, mut bridge) = setup();
        // Closer than the chain's full length, so the links hang slack.
        let a = Vec2::new(330.0, 350.0);
        let b = Vec2::new(470.0, 350.0);
        let mut events = Vec::new();
        for _ in 0..120 {
            bridge.update_endpoints(&mut physics, a, b);
            physics.step_into(&mut events);
        }
        bridge.sync(&physics);
        assert!(bridge.positions()[0].distance(a) < 5.0);
        assert!(bridge.positions()[7].distance(b) < 5.0);
        // Segments never collide with each other.
        assert!(events.is_empty());
    }

    #[test]
    fn links_hold_length_under_a_landing_star() {
        let (mut physics, mut bridge) = setup();
        let config = BridgeConfig::default();
        let star = BodyDesc::dynamic(ColliderDesc::Ball { radius: 10.0 })
            .with_position(Vec2::new(400.0, 0.0))
            .with_layers(layers::STAR, layers::STAR | layers::BRIDGE);
        let star = physics.create_body(BodyTag::Star(EntityId(1)), &star, ColliderMaterial::default());

        let mut events = Vec::new();
        for _ in 0..150 {
            physics.step_into(&mut events);
            bridge.sync(&physics);
            for pair in bridge.positions().windows(2) {
                let len = pair[0].distance(pair[1]);
                assert!(len < config.segment_length * 1.1, "link stretched to {len}");
            }
        }
        let lowest = bridge.positions().iter().map(|p| p.y).fold(f32::MIN, f32::max);
        let (pos, _) = physics.body_position(&star);
        assert!(pos.y < lowest, "star at {pos:?} fell below the deck at {lowest}");
    }

    #[test]
    fn display_draws_curve_and_dots() {
        let (_physics, bridge) = setup();
        let mut canvas = RecordingCanvas::new();
        bridge.display(&mut canvas);
        assert_eq!(canvas.count(|c| matches!(c, DrawCall::Polyline { .. })), 1);
        assert_eq!(canvas.count(|c| matches!(c, DrawCall::Circle { .. })), 8);
    }
}
