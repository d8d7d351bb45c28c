use starbridge::{AudioBackend, AudioError, Ramp, RampKind, Voice, Waveform};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsValue;
use web_sys as web;

/// Web Audio backend: one oscillator and one gain node per voice, wired
/// straight to the destination and left for the browser to collect after `stop`.
pub struct WebAudio {
    ctx: web::AudioContext,
}

impl WebAudio {
    pub fn new() -> Result<Self, AudioError> {
        let ctx = web::AudioContext::new().map_err(|e| AudioError::Node(js_text(&e)))?;
        Ok(Self { ctx })
    }
}

fn js_text(e: &JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

fn oscillator_type(waveform: Waveform) -> web::OscillatorType {
    match waveform {
        Waveform::Sine => web::OscillatorType::Sine,
        Waveform::Square => web::OscillatorType::Square,
        Waveform::Saw => web::OscillatorType::Sawtooth,
        Waveform::Triangle => web::OscillatorType::Triangle,
    }
}

fn automate(param: &web::AudioParam, ramps: &[Ramp]) -> Result<(), AudioError> {
    for ramp in ramps {
        let result = match ramp.kind {
            RampKind::Set => param.set_value_at_time(ramp.value, ramp.at),
            RampKind::Linear => param.linear_ramp_to_value_at_time(ramp.value, ramp.at),
            RampKind::Exponential => param.exponential_ramp_to_value_at_time(ramp.value, ramp.at),
        };
        result.map_err(|e| AudioError::Schedule(js_text(&e)))?;
    }
    Ok(())
}

impl AudioBackend for WebAudio {
    fn current_time(&self) -> f64 {
        self.ctx.current_time()
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        if self.ctx.state() == web::AudioContextState::Suspended {
            let pending = self.ctx.resume().map_err(|e| AudioError::Resume(js_text(&e)))?;
            // Rejection arrives after this returns, so it can only be logged.
            let on_reject = Closure::wrap(Box::new(|e: JsValue| {
                log::warn!("audio resume rejected: {}", js_text(&e));
            }) as Box<dyn FnMut(JsValue)>);
            let _ = pending.catch(&on_reject);
            on_reject.forget();
        }
        Ok(())
    }

    fn play(&mut self, voice: &Voice) -> Result<(), AudioError> {
        let node_err = |e: JsValue| AudioError::Node(js_text(&e));

        let osc = web::OscillatorNode::new(&self.ctx).map_err(node_err)?;
        osc.set_type(oscillator_type(voice.waveform));
        let gain = web::GainNode::new(&self.ctx).map_err(node_err)?;

        automate(&osc.frequency(), &voice.frequency)?;
        automate(&gain.gain(), &voice.gain)?;

        osc.connect_with_audio_node(&gain).map_err(node_err)?;
        gain.connect_with_audio_node(&self.ctx.destination())
            .map_err(node_err)?;
        osc.start_with_when(voice.start).map_err(node_err)?;
        osc.stop_with_when(voice.stop).map_err(node_err)?;
        Ok(())
    }
}
