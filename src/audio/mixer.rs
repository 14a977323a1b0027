use crate::audio::{AudioBackend, AudioDriver, SynthDriver};
use crate::wave::formula::Formula;
use crate::wave::WaveId;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub type SharedMixer = Arc<Mutex<Mixer>>;

/// One synth voice per wave, summed into a mono block.
#[derive(Debug, Default)]
pub struct Mixer {
    voices: BTreeMap<WaveId, SynthDriver>,
    scratch: Vec<f32>,
}

impl Mixer {
    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    /// Fills `out` with the sum of every voice, hard-limited to `[-1, 1]`.
    pub fn render(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        self.scratch.resize(out.len(), 0.0);

        for voice in self.voices.values_mut() {
            voice.render(&mut self.scratch);
            for (sample, value) in out.iter_mut().zip(&self.scratch) {
                *sample += value;
            }
        }

        for sample in out.iter_mut() {
            *sample = sample.clamp(-1.0, 1.0);
        }
    }
}

// A panic inside the audio callback must not silence the UI side for good.
pub(crate) fn lock(mixer: &SharedMixer) -> MutexGuard<'_, Mixer> {
    mixer.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Hands out drivers that live inside a shared [`Mixer`].
#[derive(Debug, Clone)]
pub struct MixerBackend {
    mixer: SharedMixer,
    sample_rate: f64,
}

impl MixerBackend {
    pub fn new(sample_rate: f64) -> Self {
        MixerBackend {
            mixer: SharedMixer::default(),
            sample_rate,
        }
    }

    pub fn mixer(&self) -> &SharedMixer {
        &self.mixer
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}

impl AudioBackend for MixerBackend {
    fn create_driver(&self, id: WaveId) -> Box<dyn AudioDriver> {
        lock(&self.mixer)
            .voices
            .insert(id, SynthDriver::new(self.sample_rate));
        Box::new(MixerDriver {
            id,
            mixer: self.mixer.clone(),
        })
    }
}

/// Wave-side handle on a mixer voice. Dropping it removes the voice.
#[derive(Debug)]
pub struct MixerDriver {
    id: WaveId,
    mixer: SharedMixer,
}

impl MixerDriver {
    fn with_voice<R>(&self, f: impl FnOnce(&mut SynthDriver) -> R) -> Option<R> {
        lock(&self.mixer).voices.get_mut(&self.id).map(f)
    }
}

impl AudioDriver for MixerDriver {
    fn start(&mut self, formula: &Formula, origin: f64, now: f64) {
        self.with_voice(|voice| voice.start(formula, origin, now));
    }

    fn stop(&mut self) {
        self.with_voice(|voice| voice.stop());
    }

    fn update(&mut self, formula: &Formula) {
        self.with_voice(|voice| voice.update(formula));
    }

    fn set_gain(&mut self, gain: f64) {
        self.with_voice(|voice| voice.set_gain(gain));
    }

    fn is_playing(&self) -> bool {
        self.with_voice(|voice| voice.is_playing()).unwrap_or(false)
    }
}

impl Drop for MixerDriver {
    fn drop(&mut self) {
        lock(&self.mixer).voices.remove(&self.id);
    }
}
