//! Procedural sound effects
//!
//! Every game event maps to a single enveloped oscillator tone. Synthesis is
//! pure ([`synthesize`] builds a [`ToneSpec`]); a [`ToneSink`] turns specs
//! into sound. In the browser that is Web Audio, elsewhere a logger.

use serde::Serialize;

/// Gain envelopes end here instead of at zero, which exponential ramps reject
pub const GAIN_FLOOR: f32 = 0.01;

/// Game events with a sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SoundEvent {
    /// Blade cut through a menu button
    Slice,
    /// First fruit of a chain
    Fruit,
    /// Fruit continuing a chain, with the combo count
    Combo(u32),
    Poop,
    Bomb,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// Interpolation curve for a parameter ramp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Ramp {
    Linear,
    Exponential,
}

/// A parameter moving from `from` to `to` over `seconds`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sweep {
    pub from: f32,
    pub to: f32,
    pub ramp: Ramp,
    pub seconds: f32,
}

/// One scheduled tone
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToneSpec {
    pub waveform: Waveform,
    pub frequency: Sweep,
    pub gain: Sweep,
    /// Oscillator stops after this many seconds
    pub duration: f32,
}

/// Tone for `event`. `jitter` in [0, 1) varies the fruit pitch.
pub fn synthesize(event: SoundEvent, jitter: f32) -> ToneSpec {
    match event {
        SoundEvent::Slice => ToneSpec {
            waveform: Waveform::Triangle,
            frequency: Sweep {
                from: 800.0,
                to: 100.0,
                ramp: Ramp::Exponential,
                seconds: 0.15,
            },
            gain: fade(0.4, Ramp::Exponential, 0.15),
            duration: 0.15,
        },
        SoundEvent::Fruit => ToneSpec {
            waveform: Waveform::Sine,
            frequency: Sweep {
                from: 400.0 + jitter * 200.0,
                to: 100.0,
                ramp: Ramp::Exponential,
                seconds: 0.2,
            },
            gain: fade(0.6, Ramp::Exponential, 0.2),
            duration: 0.2,
        },
        SoundEvent::Combo(count) => {
            let base = combo_base_frequency(count);
            ToneSpec {
                waveform: Waveform::Square,
                frequency: Sweep {
                    from: base,
                    to: base * 2.0,
                    ramp: Ramp::Linear,
                    seconds: 0.1,
                },
                gain: fade(0.3, Ramp::Linear, 0.3),
                duration: 0.3,
            }
        }
        SoundEvent::Poop => ToneSpec {
            waveform: Waveform::Sawtooth,
            frequency: Sweep {
                from: 150.0,
                to: 50.0,
                ramp: Ramp::Linear,
                seconds: 0.4,
            },
            gain: fade(0.5, Ramp::Linear, 0.4),
            duration: 0.4,
        },
        SoundEvent::Bomb => ToneSpec {
            waveform: Waveform::Sawtooth,
            frequency: Sweep {
                from: 80.0,
                to: 10.0,
                ramp: Ramp::Exponential,
                seconds: 0.8,
            },
            gain: fade(1.0, Ramp::Exponential, 0.8),
            duration: 0.8,
        },
    }
}

/// Combo pitch rises 50 Hz per chained fruit
#[inline]
pub fn combo_base_frequency(count: u32) -> f32 {
    440.0 + count as f32 * 50.0
}

fn fade(from: f32, ramp: Ramp, seconds: f32) -> Sweep {
    Sweep {
        from,
        to: GAIN_FLOOR,
        ramp,
        seconds,
    }
}

/// Something that can play tones
pub trait ToneSink {
    /// Start `tone` now, scaled by `master_gain`. Fire and forget.
    fn schedule(&mut self, tone: &ToneSpec, master_gain: f32);

    /// Release the backend
    fn close(&mut self) {}
}

/// Sink for headless runs: logs each tone
#[derive(Debug, Default)]
pub struct LogSink {
    pub played: usize,
}

impl ToneSink for LogSink {
    fn schedule(&mut self, tone: &ToneSpec, master_gain: f32) {
        self.played += 1;
        log::debug!(
            "tone {:?} {:.0}->{:.0} Hz for {:.2}s at gain {:.2}",
            tone.waveform,
            tone.frequency.from,
            tone.frequency.to,
            tone.duration,
            tone.gain.from * master_gain
        );
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn ToneSink>,
    master_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(sink: Box<dyn ToneSink>, master_volume: f32, muted: bool) -> Self {
        Self {
            sink,
            master_volume: master_volume.clamp(0.0, 1.0),
            muted,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Play a sound effect
    pub fn play(&mut self, event: SoundEvent) {
        if self.muted || self.master_volume <= 0.0 {
            return;
        }
        let tone = synthesize(event, rand::random::<f32>());
        self.sink.schedule(&tone, self.master_volume);
    }

    pub fn play_all(&mut self, events: &[SoundEvent]) {
        for &event in events {
            self.play(event);
        }
    }

    /// Release the audio backend
    pub fn close(&mut self) {
        self.sink.close();
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_audio::WebAudioSink;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use web_sys::{AudioContext, AudioContextState, AudioParam, GainNode, OscillatorNode, OscillatorType};

    use super::{Ramp, Sweep, ToneSink, ToneSpec, Waveform};

    /// Web Audio backend: one oscillator and gain node per tone, all through a
    /// shared master gain
    pub struct WebAudioSink {
        ctx: Option<AudioContext>,
        master: Option<GainNode>,
    }

    impl Default for WebAudioSink {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudioSink {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            let master = ctx.as_ref().and_then(|ctx| {
                let gain = ctx.create_gain().ok()?;
                gain.connect_with_audio_node(&ctx.destination()).ok()?;
                Some(gain)
            });
            Self { ctx, master }
        }

        /// Oscillator routed through its own gain into the master gain
        fn create_osc(
            ctx: &AudioContext,
            master: &GainNode,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(master).ok()?;

            Some((osc, gain))
        }
    }

    fn oscillator_type(waveform: Waveform) -> OscillatorType {
        match waveform {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Square => OscillatorType::Square,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
            Waveform::Triangle => OscillatorType::Triangle,
        }
    }

    fn apply_sweep(param: &AudioParam, sweep: &Sweep, t: f64) {
        param.set_value_at_time(sweep.from, t).ok();
        let end = t + sweep.seconds as f64;
        match sweep.ramp {
            Ramp::Linear => param.linear_ramp_to_value_at_time(sweep.to, end).ok(),
            Ramp::Exponential => param.exponential_ramp_to_value_at_time(sweep.to, end).ok(),
        };
    }

    impl ToneSink for WebAudioSink {
        fn schedule(&mut self, tone: &ToneSpec, master_gain: f32) {
            let (Some(ctx), Some(master)) = (&self.ctx, &self.master) else {
                return;
            };

            // Browsers suspend the context until a user gesture
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            master.gain().set_value(master_gain);

            let Some((osc, gain)) = Self::create_osc(ctx, master, oscillator_type(tone.waveform)) else {
                return;
            };
            let t = ctx.current_time();

            apply_sweep(&osc.frequency(), &tone.frequency, t);
            apply_sweep(&gain.gain(), &tone.gain, t);

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + tone.duration as f64).ok();
        }

        fn close(&mut self) {
            if let Some(ctx) = self.ctx.take() {
                let _ = ctx.close();
            }
            self.master = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct Recorder(Rc<RefCell<Vec<(ToneSpec, f32)>>>);

    impl ToneSink for Recorder {
        fn schedule(&mut self, tone: &ToneSpec, master_gain: f32) {
            self.0.borrow_mut().push((*tone, master_gain));
        }
    }

    #[test]
    fn test_durations_per_event() {
        let cases = [
            (SoundEvent::Slice, 0.15),
            (SoundEvent::Fruit, 0.2),
            (SoundEvent::Combo(2), 0.3),
            (SoundEvent::Poop, 0.4),
            (SoundEvent::Bomb, 0.8),
        ];
        for (event, duration) in cases {
            let tone = synthesize(event, 0.5);
            assert_eq!(tone.duration, duration, "{event:?}");
            assert_eq!(tone.gain.to, GAIN_FLOOR);
            assert!(tone.gain.to > 0.0);
        }
    }

    #[test]
    fn test_combo_pitch_rises() {
        let low = synthesize(SoundEvent::Combo(2), 0.0);
        let high = synthesize(SoundEvent::Combo(5), 0.0);
        assert_eq!(low.frequency.from, 540.0);
        assert_eq!(high.frequency.from, 690.0);
        assert_eq!(high.frequency.to, 1380.0);
        assert_eq!(high.frequency.ramp, Ramp::Linear);
        assert_eq!(high.frequency.seconds, 0.1);
    }

    #[test]
    fn test_fruit_jitter_range() {
        assert_eq!(synthesize(SoundEvent::Fruit, 0.0).frequency.from, 400.0);
        assert_eq!(synthesize(SoundEvent::Fruit, 1.0).frequency.from, 600.0);
        assert_eq!(synthesize(SoundEvent::Bomb, 0.3).waveform, Waveform::Sawtooth);
    }

    #[test]
    fn test_manager_applies_volume_and_mute() {
        let recorder = Recorder::default();
        let mut audio = AudioManager::new(Box::new(recorder.clone()), 0.3, false);

        audio.play_all(&[SoundEvent::Slice, SoundEvent::Poop]);
        assert_eq!(recorder.0.borrow().len(), 2);
        assert_eq!(recorder.0.borrow()[0].1, 0.3);

        audio.set_muted(true);
        audio.play(SoundEvent::Bomb);
        assert_eq!(recorder.0.borrow().len(), 2);

        audio.set_muted(false);
        audio.set_master_volume(0.0);
        audio.play(SoundEvent::Bomb);
        assert_eq!(recorder.0.borrow().len(), 2);
    }
}
