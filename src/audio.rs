//! Audio driver capability.
//!
//! The model drives audio but never depends on it: every call is idempotent,
//! non-blocking and infallible, and a platform without sound gets the
//! [`NullDriver`]. With a device, every wave's [`SynthDriver`] is a voice in a
//! shared [`Mixer`] that the output stream pulls from.

mod device;
mod mixer;
mod null;
mod synth;

pub use device::DeviceBackend;
pub use mixer::{Mixer, MixerBackend, MixerDriver, SharedMixer};
pub use null::{NullBackend, NullDriver};
pub use synth::SynthDriver;

use crate::wave::formula::Formula;
use crate::wave::WaveId;

pub trait AudioDriver {
    /// Starts sounding `formula`, anchored to the shared playback `origin`.
    /// `now` is read from the same clock, so a voice joining mid-session picks
    /// up at `now - origin` and stays in phase with the others.
    fn start(&mut self, formula: &Formula, origin: f64, now: f64);

    fn stop(&mut self);

    /// Re-syncs to new parameters without restarting.
    fn update(&mut self, formula: &Formula);

    /// Linear gain applied on top of the formula, `0.0..=1.0`.
    fn set_gain(&mut self, gain: f64);

    fn is_playing(&self) -> bool;
}

/// Creates one driver per wave.
pub trait AudioBackend {
    fn create_driver(&self, id: WaveId) -> Box<dyn AudioDriver>;
}
