use crate::audio::{AudioBackend, AudioDriver};
use crate::wave::formula::Formula;
use crate::wave::WaveId;

/// Driver for platforms without audio output. Tracks state only.
#[derive(Debug, Default)]
pub struct NullDriver {
    playing: bool,
}

impl AudioDriver for NullDriver {
    fn start(&mut self, _formula: &Formula, _origin: f64, _now: f64) {
        self.playing = true;
    }

    fn stop(&mut self) {
        self.playing = false;
    }

    fn update(&mut self, _formula: &Formula) {}

    fn set_gain(&mut self, _gain: f64) {}

    fn is_playing(&self) -> bool {
        self.playing
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn create_driver(&self, _id: WaveId) -> Box<dyn AudioDriver> {
        Box::new(NullDriver::default())
    }
}
