use glam::Vec2;

use crate::api::config::SimConfig;
use crate::api::types::EntityId;
use crate::components::bridge::Bridge;
use crate::components::star::{Star, StarState};
use crate::core::physics::{CollisionPair, PhysicsWorld};
use crate::core::schedule::Scheduler;
use crate::core::time::FrameClock;
use crate::extensions::easing::Easing;
use crate::input::queue::{InputEvent, InputQueue, KEY_SPACE};
use crate::renderer::color::Rgba;
use crate::renderer::traits::Canvas;
use crate::systems::audio::{AudioBackend, AudioEnvelopeEngine};
use crate::systems::collision::{self, DispatchReport, EffectSinks};
use crate::systems::effects::{EffectField, ParticleBurst, Rng};

/// Solver tolerances are tuned for 100 px per metre.
const PIXELS_PER_METER: f32 = 100.0;

const HAND_OUTER_RADIUS: f32 = 6.0;
const HAND_INNER_RADIUS: f32 = 3.0;

const HINT_TEXT: &str = "Click or press a key for sound";
const HINT_ORIGIN: Vec2 = Vec2::new(10.0, 10.0);
const HINT_SIZE: Vec2 = Vec2::new(180.0, 30.0);

const FLASH_COLOR: Rgba = Rgba::new(255, 240, 180, 150);
const FLASH_MS: f64 = 300.0;

/// Deferred work drained once per processed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldEvent {
    /// Re-arm the toss trigger.
    TossReset,
    /// Second voice of the star-fall chime.
    StarFallOvertone { frequency: f32 },
}

/// The whole simulation: physics, bridge, stars, effects, audio and the
/// pending input and timers that feed them. Driven by [`World::tick`] from the
/// animation callback and drawn with [`World::render`].
pub struct World {
    config: SimConfig,
    physics: PhysicsWorld,
    bridge: Bridge,
    stars: Vec<Star>,
    field: EffectField,
    particles: ParticleBurst,
    audio: AudioEnvelopeEngine,
    scheduler: Scheduler<WorldEvent>,
    clock: FrameClock,
    input: InputQueue,
    hand: Option<(Vec2, Vec2)>,
    tossing: bool,
    toss_started_ms: f64,
    collisions: Vec<CollisionPair>,
    last_report: DispatchReport,
    rng: Rng,
    next_id: u32,
    now_ms: f64,
}

impl World {
    pub fn new(config: SimConfig, audio: Option<Box<dyn AudioBackend>>, seed: u64) -> Self {
        let mut rng = Rng::new(seed);
        let mut physics = PhysicsWorld::new(Vec2::new(0.0, config.gravity));
        physics.set_dt(config.fixed_dt);
        physics.set_length_unit(PIXELS_PER_METER);

        let bridge = Bridge::create(&mut physics, &config.bridge, config.midline());
        let field = EffectField::create_grid(config.width, config.height, config.field.clone(), &mut rng);
        let particles = ParticleBurst::new(config.particles.clone());
        let audio = AudioEnvelopeEngine::new(audio, config.audio.clone());

        log::info!(
            "world ready: {}x{}, {} dots, frame skip {}",
            config.width,
            config.height,
            field.dots().len(),
            config.frame_skip
        );

        Self {
            clock: FrameClock::new(config.frame_skip),
            stars: Vec::with_capacity(config.stars.max_live),
            config,
            physics,
            bridge,
            field,
            particles,
            audio,
            scheduler: Scheduler::new(),
            input: InputQueue::new(),
            hand: None,
            tossing: false,
            toss_started_ms: 0.0,
            collisions: Vec::with_capacity(32),
            last_report: DispatchReport::default(),
            rng,
            next_id: 1,
            now_ms: 0.0,
        }
    }

    /// Queue an input event for the next processed frame.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Animation callback entry point. Returns `true` when the tick was
    /// processed; skipped ticks do nothing at all.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if !self.clock.tick() {
            return false;
        }
        self.step(now_ms);
        true
    }

    /// Run one processed frame at `now_ms`, bypassing the frame gate.
    pub fn step(&mut self, now_ms: f64) {
        self.now_ms = now_ms;

        for event in self.input.drain() {
            self.handle_input(event);
        }
        for event in self.scheduler.drain_due(now_ms) {
            match event {
                WorldEvent::TossReset => {
                    self.tossing = false;
                    log::debug!("toss re-armed");
                }
                WorldEvent::StarFallOvertone { frequency } => self.audio.star_fall_overtone(frequency),
            }
        }

        self.collisions.clear();
        self.physics.step_into(&mut self.collisions);

        self.field.update_waves(now_ms);
        self.field.update_dots(now_ms);

        if self.stars.len() < self.config.stars.max_live
            && self.rng.chance(self.config.stars.spawn_probability)
        {
            let star = Star::spawn(
                self.allocate_id(),
                &mut self.physics,
                &self.config.stars,
                self.config.width,
                &mut self.rng,
            );
            self.stars.push(star);
            self.on_star_spawned();
        }
        self.audio.tick_arpeggio(now_ms);

        if let Some((a, b)) = self.hand {
            self.bridge.update_endpoints(&mut self.physics, a, b);
        }
        self.bridge.sync(&self.physics);
        self.prune_stars();

        self.particles.update(&mut self.rng);

        let mut sinks = EffectSinks {
            field: &mut self.field,
            particles: &mut self.particles,
            audio: &mut self.audio,
            rng: &mut self.rng,
        };
        self.last_report = collision::dispatch(&self.collisions, &mut self.stars, &mut sinks, now_ms);
    }

    /// Toss every live star upward. Ignored while a toss is in progress.
    /// Returns whether the toss happened.
    pub fn toss(&mut self) -> bool {
        if self.tossing {
            log::debug!("toss ignored: already tossing");
            return false;
        }
        self.tossing = true;
        self.toss_started_ms = self.now_ms;
        for star in &mut self.stars {
            star.toss(&mut self.physics, &self.config.stars, &mut self.rng);
        }
        self.scheduler
            .schedule(self.now_ms + self.config.toss_reset_ms, WorldEvent::TossReset);
        log::info!("tossed {} stars", self.stars.len());
        true
    }

    /// Spawn a star at an exact spot with no drift.
    pub fn spawn_star_at(&mut self, position: Vec2, radius: f32) -> EntityId {
        let id = self.allocate_id();
        let hue = self.rng.range(0.0, 360.0);
        let star = Star::spawn_at(
            id,
            &mut self.physics,
            position,
            radius,
            Vec2::ZERO,
            hue,
            self.config.stars.hue_step,
        );
        self.stars.push(star);
        self.on_star_spawned();
        id
    }

    /// Change the canvas size; the dot grid is rebuilt to cover it.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.config.width = width;
        self.config.height = height;
        self.field.rebuild(width, height, &mut self.rng);
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        canvas.clear(Rgba::BACKGROUND);
        self.field.display(canvas);

        if let Some((a, b)) = self.hand {
            for p in [a, b] {
                canvas.fill_circle(p, HAND_OUTER_RADIUS, Rgba::INDIGO);
                canvas.fill_circle(p, HAND_INNER_RADIUS, Rgba::GOLD);
            }
        }

        self.bridge.display(canvas);
        let window = self.config.stars.deform_window_ms;
        for star in &self.stars {
            star.display(canvas, self.now_ms, window);
        }
        self.particles.display(canvas);

        if !self.audio.is_enabled() {
            canvas.fill_rect(HINT_ORIGIN, HINT_SIZE, Rgba::WHITE.with_alpha(200));
            canvas.fill_text(HINT_TEXT, HINT_ORIGIN + Vec2::new(8.0, 20.0), 12.0, Rgba::BLACK);
        }

        if self.tossing {
            let t = ((self.now_ms - self.toss_started_ms) / FLASH_MS) as f32;
            let alpha = FLASH_COLOR.a as f32 * (1.0 - Easing::QuadOut.apply(t));
            if alpha >= 1.0 {
                canvas.fill_rect(
                    Vec2::ZERO,
                    Vec2::new(self.config.width, self.config.height),
                    FLASH_COLOR.with_alpha(alpha as u8),
                );
            }
        }
    }

    // -- accessors --

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn star(&self, id: EntityId) -> Option<&Star> {
        self.stars.iter().find(|s| s.id == id)
    }

    pub fn field(&self) -> &EffectField {
        &self.field
    }

    pub fn particles(&self) -> &ParticleBurst {
        &self.particles
    }

    pub fn audio(&self) -> &AudioEnvelopeEngine {
        &self.audio
    }

    pub fn is_tossing(&self) -> bool {
        self.tossing
    }

    /// Last control points received, if the hand is tracked.
    pub fn hand(&self) -> Option<(Vec2, Vec2)> {
        self.hand
    }

    /// Collision pairs reported by the last physics step.
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collisions
    }

    /// Result of the last collision dispatch.
    pub fn last_report(&self) -> &DispatchReport {
        &self.last_report
    }

    pub fn pending_events(&self) -> usize {
        self.scheduler.len()
    }

    /// Processed frames so far (via `tick`).
    pub fn frames(&self) -> u64 {
        self.clock.processed()
    }

    // -- private helpers --

    fn handle_input(&mut self, event: InputEvent) {
        if event.is_user_gesture() {
            self.audio.enable();
        }
        match event {
            InputEvent::KeyDown { key_code: KEY_SPACE } => {
                self.toss();
            }
            InputEvent::HandPose { a, b } => self.hand = Some((a, b)),
            InputEvent::HandLost => self.hand = None,
            InputEvent::KeyDown { .. } | InputEvent::PointerDown { .. } => {}
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    fn on_star_spawned(&mut self) {
        if let Some(frequency) = self.audio.star_fall(self.now_ms) {
            self.scheduler.schedule(
                self.now_ms + self.config.audio.overtone_delay_ms,
                WorldEvent::StarFallOvertone { frequency },
            );
        }
    }

    fn prune_stars(&mut self) {
        let (width, height) = (self.config.width, self.config.height);
        let physics = &mut self.physics;
        self.stars.retain_mut(|star| {
            star.sync(physics);
            if star.is_out_of_bounds(width, height) {
                star.remove(physics);
                log::debug!("star {} left the canvas", star.id.0);
            }
            star.state != StarState::Removed
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::traits::{DrawCall, RecordingCanvas};
    use crate::systems::audio::RecordingAudio;

    fn quiet_config() -> SimConfig {
        let mut config = SimConfig::default();
        config.stars.spawn_probability = 0.0;
        config.frame_skip = 1;
        config
    }

    fn world_with_audio() -> (World, RecordingAudio) {
        let audio = RecordingAudio::new();
        let world = World::new(quiet_config(), Some(Box::new(audio.clone())), 7);
        (world, audio)
    }

    #[test]
    fn tick_respects_frame_skip() {
        let mut world = World::new(SimConfig::default(), None, 1);
        let processed: Vec<bool> = (0..4).map(|i| world.tick(i as f64 * 16.0)).collect();
        assert_eq!(processed, vec![false, true, false, true]);
        assert_eq!(world.frames(), 2);
    }

    #[test]
    fn hand_pose_moves_anchors_exactly() {
        let mut world = World::new(quiet_config(), None, 1);
        let a = Vec2::new(200.0, 250.0);
        let b = Vec2::new(600.0, 260.0);
        world.push_input(InputEvent::HandPose { a, b });
        world.step(16.0);
        assert_eq!(world.bridge().anchor_targets(world.physics()), [a, b]);
        assert_eq!(world.hand(), Some((a, b)));
    }

    #[test]
    fn hand_lost_keeps_last_anchors() {
        let mut world = World::new(quiet_config(), None, 1);
        let a = Vec2::new(200.0, 250.0);
        let b = Vec2::new(600.0, 260.0);
        world.push_input(InputEvent::HandPose { a, b });
        world.step(16.0);
        world.push_input(InputEvent::HandLost);
        for i in 2..10 {
            world.step(i as f64 * 16.0);
        }
        assert_eq!(world.hand(), None);
        assert_eq!(world.bridge().anchor_targets(world.physics()), [a, b]);
    }

    #[test]
    fn anchors_default_to_rest_position() {
        let mut world = World::new(quiet_config(), None, 1);
        world.step(16.0);
        assert_eq!(
            world.bridge().anchor_targets(world.physics()),
            world.bridge().rest_anchors()
        );
    }

    #[test]
    fn toss_on_empty_world_resets_after_delay() {
        let mut world = World::new(quiet_config(), None, 1);
        world.step(1000.0);
        world.push_input(InputEvent::KeyDown { key_code: KEY_SPACE });
        world.step(1016.0);
        assert!(world.is_tossing());
        world.step(2999.0);
        assert!(world.is_tossing());
        world.step(3016.0);
        assert!(!world.is_tossing());
    }

    #[test]
    fn reentrant_toss_is_ignored() {
        let mut world = World::new(quiet_config(), None, 1);
        world.step(0.0);
        assert!(world.toss());
        assert!(!world.toss());
        assert_eq!(world.pending_events(), 1);
    }

    #[test]
    fn toss_flings_live_stars() {
        let mut world = World::new(quiet_config(), None, 1);
        let id = world.spawn_star_at(Vec2::new(100.0, 100.0), 12.0);
        world.step(16.0);
        assert!(world.toss());
        assert_eq!(world.star(id).map(|s| s.state), Some(StarState::Tossed));
        world.step(32.0);
        let star = world.star(id).unwrap();
        assert!(world.physics().velocity(&star.body).y < -500.0);
    }

    #[test]
    fn stars_leaving_the_canvas_are_removed() {
        let mut world = World::new(quiet_config(), None, 1);
        let bodies = world.physics().body_count();
        world.spawn_star_at(Vec2::new(-50.0, 100.0), 10.0);
        assert_eq!(world.stars().len(), 1);
        world.step(16.0);
        assert!(world.stars().is_empty());
        assert_eq!(world.physics().body_count(), bodies);
    }

    #[test]
    fn live_star_count_is_capped() {
        let mut config = quiet_config();
        config.stars.spawn_probability = 1.0;
        config.stars.max_live = 3;
        let mut world = World::new(config, None, 1);
        for i in 0..10 {
            world.step(i as f64 * 16.0);
        }
        assert_eq!(world.stars().len(), 3);
    }

    #[test]
    fn gesture_enables_audio_and_star_fall_schedules_overtone() {
        let (mut world, audio) = world_with_audio();
        world.push_input(InputEvent::PointerDown { x: 1.0, y: 1.0 });
        world.step(1000.0);
        assert!(world.audio().is_enabled());
        assert!(audio.resumed());

        audio.clear();
        world.spawn_star_at(Vec2::new(100.0, -40.0), 10.0);
        assert_eq!(audio.count(), 1);
        assert_eq!(world.pending_events(), 1);
        world.step(1050.0);
        assert_eq!(audio.count(), 1);
        world.step(1100.0);
        let voices = audio.voices();
        assert_eq!(voices.len(), 2);
        assert_eq!(voices[1].frequency[0].value, 1600.0);
    }

    #[test]
    fn arpeggio_plays_once_enabled() {
        let (mut world, audio) = world_with_audio();
        world.step(0.0);
        assert_eq!(audio.count(), 0);
        world.push_input(InputEvent::KeyDown { key_code: 65 });
        world.step(16.0);
        assert_eq!(audio.count(), 1);
        assert!(!world.is_tossing());
    }

    #[test]
    fn render_order_and_hint() {
        let mut world = World::new(quiet_config(), None, 1);
        world.push_input(InputEvent::HandPose {
            a: Vec2::new(300.0, 300.0),
            b: Vec2::new(500.0, 300.0),
        });
        world.spawn_star_at(Vec2::new(400.0, 100.0), 10.0);
        world.step(16.0);

        let mut canvas = RecordingCanvas::new();
        world.render(&mut canvas);
        assert_eq!(canvas.calls[0], DrawCall::Clear(Rgba::BACKGROUND));
        assert_eq!(canvas.depth(), 0);

        let first = |pred: &dyn Fn(&DrawCall) -> bool| canvas.calls.iter().position(|c| pred(c));
        let hand = first(&|c| matches!(c, DrawCall::Circle { color, .. } if *color == Rgba::INDIGO));
        let bridge = first(&|c| matches!(c, DrawCall::Polyline { .. }));
        let star = first(&|c| matches!(c, DrawCall::Polygon { .. }));
        let hint = first(&|c| matches!(c, DrawCall::Text { .. }));
        assert!(hand.is_some() && bridge.is_some() && star.is_some() && hint.is_some());
        assert!(hand < bridge && bridge < star && star < hint);
    }

    #[test]
    fn toss_flash_fades() {
        let mut world = World::new(quiet_config(), None, 1);
        world.step(0.0);
        world.toss();
        let flash = |world: &World| {
            let mut canvas = RecordingCanvas::new();
            world.render(&mut canvas);
            canvas.count(|c| matches!(c, DrawCall::Rect { size, .. } if size.x == 800.0))
        };
        assert_eq!(flash(&world), 1);
        world.step(400.0);
        assert!(world.is_tossing());
        assert_eq!(flash(&world), 0);
    }

    #[test]
    fn resize_rebuilds_grid() {
        let mut world = World::new(quiet_config(), None, 1);
        let before = world.field().dots().len();
        world.resize(400.0, 300.0);
        assert!(world.field().dots().len() < before);
        assert_eq!(world.config().width, 400.0);
    }
}
