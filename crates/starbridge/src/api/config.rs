use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Top-level simulation settings.
///
/// Every field has a default, so a JSON override only needs the keys it changes:
///
/// ```ignore
/// let config = SimConfig::from_json(r#"{ "stars": { "max_live": 10 } }"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Canvas width in pixels.
    pub width: f32,
    /// Canvas height in pixels.
    pub height: f32,
    /// Downward gravity in px/s² (Y down).
    pub gravity: f32,
    /// Physics timestep per processed frame, in seconds.
    pub fixed_dt: f32,
    /// Process one animation tick out of every `frame_skip`.
    pub frame_skip: u32,
    /// Delay before a toss can be triggered again.
    pub toss_reset_ms: f64,
    pub bridge: BridgeConfig,
    pub stars: StarConfig,
    pub field: FieldConfig,
    pub particles: ParticleConfig,
    pub audio: AudioConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            gravity: 1000.0,
            fixed_dt: 1.0 / 60.0,
            frame_skip: 2,
            toss_reset_ms: 2000.0,
            bridge: BridgeConfig::default(),
            stars: StarConfig::default(),
            field: FieldConfig::default(),
            particles: ParticleConfig::default(),
            audio: AudioConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parse settings from a JSON string. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Centre of the canvas midline, where the bridge rests by default.
    pub fn midline(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Number of chain bodies.
    pub segments: u32,
    pub body_radius: f32,
    /// Rest distance between neighbouring bodies.
    pub segment_length: f32,
    pub stiffness: f32,
    pub damping: f32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            segments: 8,
            body_radius: 10.0,
            segment_length: 25.0,
            stiffness: 2000.0,
            damping: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    /// Cap on simultaneously live stars.
    pub max_live: usize,
    /// Chance of spawning a star on each processed frame.
    pub spawn_probability: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    /// Max horizontal spawn speed in px/s (either direction).
    pub spawn_drift: f32,
    /// Hue rotation applied per bridge contact, in degrees.
    pub hue_step: f32,
    /// Upward speed given to every star by a toss, in px/s.
    pub toss_speed: f32,
    /// Max horizontal speed added by a toss, in px/s (either direction).
    pub toss_spread: f32,
    /// How long the squash/stretch lasts after a contact.
    pub deform_window_ms: f64,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            max_live: 50,
            spawn_probability: 0.084,
            radius_min: 10.0,
            radius_max: 20.0,
            spawn_drift: 60.0,
            hue_step: 40.0,
            toss_speed: 900.0,
            toss_spread: 200.0,
            deform_window_ms: 300.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Grid pitch between dots.
    pub spacing: f32,
    pub dot_size: f32,
    pub dot_alpha: u8,
    /// Max random offset applied to each dot once at creation.
    pub jitter: f32,
    pub wave_strength: f32,
    pub wave_duration_ms: f64,
    /// Wave radius as a multiple of the colliding star's radius.
    pub wave_radius_factor: f32,
    /// Oscillation rate of the wobble, radians per millisecond.
    pub wave_rate: f32,
    /// Fraction of the gap closed per frame when relaxing dot displacement.
    pub smoothing: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            spacing: 35.0,
            dot_size: 3.0,
            dot_alpha: 40,
            jitter: 2.0,
            wave_strength: 6.0,
            wave_duration_ms: 1500.0,
            wave_radius_factor: 6.0,
            wave_rate: 0.01,
            smoothing: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Particles per burst.
    pub count: usize,
    pub speed_min: f32,
    pub speed_max: f32,
    pub size_min: f32,
    pub size_max: f32,
    /// Max per-channel deviation from the burst's base color.
    pub color_jitter: i16,
    pub decay_min: f32,
    pub decay_max: f32,
    /// Downward acceleration per frame.
    pub gravity: f32,
    /// Velocity multiplier per frame.
    pub damping: f32,
    /// Max rotation speed in radians per frame (either direction).
    pub spin: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 13,
            speed_min: 1.0,
            speed_max: 5.0,
            size_min: 1.5,
            size_max: 6.0,
            color_jitter: 50,
            decay_min: 3.0,
            decay_max: 8.0,
            gravity: 0.05,
            damping: 0.98,
            spin: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Background arpeggio, as note names (`C4`, `F#3`, `Bb5`).
    pub arpeggio_notes: Vec<String>,
    pub arpeggio_interval_ms: f64,
    pub arpeggio_volume: f32,
    /// Minimum gap between two star-fall tones.
    pub star_fall_cooldown_ms: f64,
    pub star_fall_volume: f32,
    /// Delay between the star-fall tone and its overtone.
    pub overtone_delay_ms: f64,
    pub rope_volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        let notes = [
            "C4", "E4", "F4", "C5", "B4", "E4", "F4", "B4", "A4", "C5", "E5", "A5", "F4", "A4",
            "C5", "F5", "E5", "C5", "G4", "E4",
        ];
        Self {
            arpeggio_notes: notes.iter().map(|n| n.to_string()).collect(),
            arpeggio_interval_ms: 900.0,
            arpeggio_volume: 0.05,
            star_fall_cooldown_ms: 300.0,
            star_fall_volume: 0.10,
            overtone_delay_ms: 100.0,
            rope_volume: 0.30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config = SimConfig::from_json("{}").unwrap();
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.bridge.segments, 8);
        assert_eq!(config.particles.count, 13);
        assert_eq!(config.audio.arpeggio_notes.len(), 20);
    }

    #[test]
    fn partial_override_keeps_other_fields() {
        let json = r#"{
            "frame_skip": 1,
            "stars": { "max_live": 5, "spawn_probability": 0.0 },
            "audio": { "arpeggio_notes": ["A4"] }
        }"#;
        let config = SimConfig::from_json(json).unwrap();
        assert_eq!(config.frame_skip, 1);
        assert_eq!(config.stars.max_live, 5);
        assert_eq!(config.stars.spawn_probability, 0.0);
        assert_eq!(config.stars.radius_min, 10.0);
        assert_eq!(config.audio.arpeggio_notes, vec!["A4".to_string()]);
        assert_eq!(config.width, 800.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(SimConfig::from_json("{ \"width\": ").is_err());
    }

    #[test]
    fn midline_is_canvas_centre() {
        assert_eq!(SimConfig::default().midline(), Vec2::new(400.0, 300.0));
    }
}
