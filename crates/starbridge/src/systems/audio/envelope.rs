//! Envelope shapes. Each builder is pure: a start time and a few scalars in,
//! a complete [`Voice`] out.

use super::backend::{Ramp, Voice, Waveform};

/// Floor for exponential fades; Web Audio rejects exponential ramps to 0.
pub const SILENCE: f32 = 0.001;

pub const STAR_FALL_HZ: f32 = 800.0;
const STAR_FALL_LANDING_HZ: f32 = 500.0;

/// Downward "bling" played when a star appears.
pub fn star_fall(t0: f64, volume: f32) -> Voice {
    Voice {
        waveform: Waveform::Sine,
        start: t0,
        stop: t0 + 1.5,
        frequency: vec![
            Ramp::set(STAR_FALL_HZ, t0),
            Ramp::exponential(STAR_FALL_LANDING_HZ, t0 + 0.8),
        ],
        gain: vec![
            Ramp::set(0.0, t0),
            Ramp::linear(volume, t0 + 0.05),
            Ramp::exponential(SILENCE, t0 + 1.2),
        ],
    }
}

/// Short octave-up shimmer that trails the star-fall tone.
pub fn star_fall_overtone(t0: f64, frequency: f32, volume: f32) -> Voice {
    Voice {
        waveform: Waveform::Triangle,
        start: t0,
        stop: t0 + 0.5,
        frequency: vec![Ramp::set(frequency, t0)],
        gain: vec![
            Ramp::set(0.0, t0),
            Ramp::linear(volume, t0 + 0.02),
            Ramp::exponential(SILENCE, t0 + 0.3),
        ],
    }
}

/// Base pitch of the bridge impact for a clamped collision force.
pub fn rope_frequency(force: f32) -> f32 {
    380.0 + force * 80.0
}

/// Elastic "boing" for a bridge impact. Pitch jumps up during the attack,
/// drops, holds, bounces back and sinks while the gain decays.
pub fn rope_collision(t0: f64, force: f32, volume: f32) -> Voice {
    let base = rope_frequency(force);
    let attack = 0.003;
    let decay = 0.3 + force as f64 * 0.05;
    let total = attack + decay;
    Voice {
        waveform: Waveform::Sine,
        start: t0,
        stop: t0 + total + 0.05,
        frequency: vec![
            Ramp::set(base, t0),
            Ramp::linear(base * 1.15, t0 + attack),
            Ramp::exponential(base * 0.70, t0 + attack + decay * 0.2),
            Ramp::set(base * 0.70, t0 + attack + decay * 0.3),
            Ramp::linear(base * 0.85, t0 + attack + decay * 0.5),
            Ramp::exponential(base * 0.60, t0 + total),
        ],
        gain: vec![
            Ramp::set(0.0, t0),
            Ramp::linear(volume, t0 + attack),
            Ramp::exponential(SILENCE, t0 + total),
        ],
    }
}

/// One sustained arpeggio note lasting `sustain` seconds.
pub fn arpeggio_note(t0: f64, frequency: f32, volume: f32, sustain: f64) -> Voice {
    let attack = 0.02_f64.min(sustain * 0.5);
    Voice {
        waveform: Waveform::Sine,
        start: t0,
        stop: t0 + sustain + 0.05,
        frequency: vec![Ramp::set(frequency, t0)],
        gain: vec![
            Ramp::set(0.0, t0),
            Ramp::linear(volume, t0 + attack),
            Ramp::set(volume, t0 + sustain),
            Ramp::linear(0.0, t0 + sustain + 0.05),
        ],
    }
}
