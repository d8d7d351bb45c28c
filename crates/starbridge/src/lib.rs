pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::config::{AudioConfig, BridgeConfig, FieldConfig, ParticleConfig, SimConfig, StarConfig};
pub use api::types::{BodyTag, EntityId};
pub use api::world::{World, WorldEvent};
pub use components::bridge::Bridge;
pub use components::star::{Star, StarState};
pub use core::physics::{
    BodyDesc, BodyKind, ColliderDesc, ColliderMaterial, CollisionPair, JointDesc, JointHandle,
    PhysicsBody, PhysicsWorld,
};
pub use core::schedule::Scheduler;
pub use core::time::FrameClock;
pub use input::queue::{InputEvent, InputQueue, KEY_SPACE};
pub use renderer::{Canvas, DrawCall, Hsb, RecordingCanvas, Rgba};
pub use systems::audio::{
    AudioBackend, AudioEnvelopeEngine, AudioError, Ramp, RampKind, RecordingAudio, Voice, Waveform,
};
pub use systems::collision::{DispatchReport, Hit};
pub use systems::effects::{Dot, EffectField, Particle, ParticleBurst, ParticleShape, Rng, WaveEffect};

pub use extensions::Easing;
