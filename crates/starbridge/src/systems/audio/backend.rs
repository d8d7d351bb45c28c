//! Synthesis backend contract and the voice description handed to it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Failures reported by an audio backend. Never fatal: callers log and move on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AudioError {
    #[error("no audio backend available")]
    Unavailable,

    #[error("audio context could not be resumed: {0}")]
    Resume(String),

    #[error("failed to create audio node: {0}")]
    Node(String),

    #[error("failed to schedule audio parameter: {0}")]
    Schedule(String),
}

/// Oscillator waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Saw,
    Triangle,
}

/// How a parameter reaches `value` at time `at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampKind {
    /// Jump at `at`.
    Set,
    Linear,
    /// Exponential approach; `value` must be strictly positive.
    Exponential,
}

/// One automation point on an audio parameter. `at` is in backend seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    pub kind: RampKind,
    pub value: f32,
    pub at: f64,
}

impl Ramp {
    pub fn set(value: f32, at: f64) -> Self {
        Self { kind: RampKind::Set, value, at }
    }

    pub fn linear(value: f32, at: f64) -> Self {
        Self { kind: RampKind::Linear, value, at }
    }

    pub fn exponential(value: f32, at: f64) -> Self {
        Self { kind: RampKind::Exponential, value, at }
    }
}

/// A single oscillator routed through its own gain node.
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub waveform: Waveform,
    pub start: f64,
    pub stop: f64,
    pub frequency: Vec<Ramp>,
    pub gain: Vec<Ramp>,
}

impl Voice {
    pub fn duration(&self) -> f64 {
        self.stop - self.start
    }

    /// Highest gain value reached by the envelope.
    pub fn peak_gain(&self) -> f32 {
        self.gain.iter().map(|r| r.value).fold(0.0, f32::max)
    }
}

/// Something that can play voices against its own clock.
pub trait AudioBackend {
    /// Backend clock in seconds.
    fn current_time(&self) -> f64;

    /// Unlock output after a user gesture.
    fn resume(&mut self) -> Result<(), AudioError>;

    fn play(&mut self, voice: &Voice) -> Result<(), AudioError>;
}

/// Backend that keeps every played voice. Clones share state, so a test can
/// hand one clone to the engine and inspect another.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    voices: Rc<RefCell<Vec<Voice>>>,
    time: Rc<Cell<f64>>,
    resumed: Rc<Cell<bool>>,
    failing: Rc<Cell<bool>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_time(&self, seconds: f64) {
        self.time.set(seconds);
    }

    /// Make every subsequent call fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn voices(&self) -> Vec<Voice> {
        self.voices.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.voices.borrow().len()
    }

    pub fn resumed(&self) -> bool {
        self.resumed.get()
    }

    pub fn clear(&self) {
        self.voices.borrow_mut().clear();
    }
}

impl AudioBackend for RecordingAudio {
    fn current_time(&self) -> f64 {
        self.time.get()
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        if self.failing.get() {
            return Err(AudioError::Resume("recording backend set to fail".into()));
        }
        self.resumed.set(true);
        Ok(())
    }

    fn play(&mut self, voice: &Voice) -> Result<(), AudioError> {
        if self.failing.get() {
            return Err(AudioError::Schedule("recording backend set to fail".into()));
        }
        self.voices.borrow_mut().push(voice.clone());
        Ok(())
    }
}
