//! Best-effort audio: the star-fall chime, bridge impacts and the background
//! arpeggio.
//!
//! Every sound is a [`Voice`] built by a pure function in [`envelope`] and
//! handed to an [`AudioBackend`]. Nothing plays until [`AudioEnvelopeEngine::enable`]
//! runs from a user gesture. Backend failures are logged and counted, never
//! returned to the caller.

pub mod backend;
pub mod envelope;
pub mod notes;

pub use backend::{AudioBackend, AudioError, Ramp, RampKind, RecordingAudio, Voice, Waveform};

use crate::api::config::AudioConfig;

pub struct AudioEnvelopeEngine {
    backend: Option<Box<dyn AudioBackend>>,
    config: AudioConfig,
    enabled: bool,
    arpeggio: Vec<f32>,
    note_index: usize,
    last_note_ms: Option<f64>,
    last_star_fall_ms: Option<f64>,
    played: u64,
    failures: u64,
}

impl AudioEnvelopeEngine {
    pub fn new(backend: Option<Box<dyn AudioBackend>>, config: AudioConfig) -> Self {
        if backend.is_none() {
            log::info!("no audio backend; running silent");
        }
        let arpeggio = config
            .arpeggio_notes
            .iter()
            .filter_map(|name| {
                let hz = notes::note_hz(name);
                if hz.is_none() {
                    log::warn!("skipping unknown arpeggio note {name:?}");
                }
                hz
            })
            .collect();
        Self {
            backend,
            config,
            enabled: false,
            arpeggio,
            note_index: 0,
            last_note_ms: None,
            last_star_fall_ms: None,
            played: 0,
            failures: 0,
        }
    }

    /// Unlock audio after a user gesture. Returns `true` only on the call
    /// that flips the flag; without a backend the engine stays disabled.
    pub fn enable(&mut self) -> bool {
        if self.enabled {
            return false;
        }
        let Some(backend) = self.backend.as_mut() else {
            return false;
        };
        if let Err(e) = backend.resume() {
            log::warn!("audio resume failed: {e}");
            self.failures += 1;
        }
        self.enabled = true;
        log::info!("audio enabled");
        true
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Play the star-fall chime unless one played within the cooldown.
    /// Returns the overtone frequency the caller should schedule.
    pub fn star_fall(&mut self, now_ms: f64) -> Option<f32> {
        if !self.enabled {
            return None;
        }
        if let Some(last) = self.last_star_fall_ms {
            if now_ms - last <= self.config.star_fall_cooldown_ms {
                return None;
            }
        }
        self.last_star_fall_ms = Some(now_ms);
        let volume = self.config.star_fall_volume;
        self.play("star fall", |t0| envelope::star_fall(t0, volume));
        Some(envelope::STAR_FALL_HZ * 2.0)
    }

    /// Second half of the star-fall chime, fired by the scheduler.
    pub fn star_fall_overtone(&mut self, frequency: f32) {
        if !self.enabled {
            return;
        }
        let volume = self.config.star_fall_volume * 0.5;
        self.play("star fall overtone", |t0| {
            envelope::star_fall_overtone(t0, frequency, volume)
        });
    }

    /// Impact tone for one star/bridge contact. `force` is already clamped.
    pub fn rope_collision(&mut self, force: f32) {
        if !self.enabled {
            return;
        }
        let volume = self.config.rope_volume;
        self.play("rope collision", |t0| envelope::rope_collision(t0, force, volume));
    }

    /// Advance the background arpeggio when its interval has elapsed.
    pub fn tick_arpeggio(&mut self, now_ms: f64) {
        if !self.enabled || self.arpeggio.is_empty() {
            return;
        }
        let interval = self.config.arpeggio_interval_ms;
        if let Some(last) = self.last_note_ms {
            if now_ms - last <= interval {
                return;
            }
        }
        let hz = self.arpeggio[self.note_index];
        self.note_index = (self.note_index + 1) % self.arpeggio.len();
        self.last_note_ms = Some(now_ms);
        let volume = self.config.arpeggio_volume;
        let sustain = interval * 0.8 / 1000.0;
        self.play("arpeggio", |t0| envelope::arpeggio_note(t0, hz, volume, sustain));
    }

    /// Index of the next arpeggio note.
    pub fn note_index(&self) -> usize {
        self.note_index
    }

    pub fn played(&self) -> u64 {
        self.played
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    fn play(&mut self, label: &str, build: impl FnOnce(f64) -> Voice) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        let voice = build(backend.current_time());
        match backend.play(&voice) {
            Ok(()) => self.played += 1,
            Err(e) => {
                self.failures += 1;
                log::debug!("{label} voice dropped: {e}");
            }
        }
    }
}
