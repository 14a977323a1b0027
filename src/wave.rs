pub mod formula;
pub mod kind;

use crate::audio::{AudioDriver, NullDriver};
use crate::events::{EventBus, WaveEvent};
use crate::transport::Transport;
use formula::Formula;
use kind::WaveKind;
use std::rc::Rc;

pub type WaveId = u32;

/// The signal parameters a user edits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    pub frequency: f64,
    pub amplitude: f64,
    pub phase_shift: f64,
    pub wave_type: WaveKind,
}

impl Default for WaveParams {
    fn default() -> Self {
        WaveParams {
            frequency: 440.0,
            amplitude: 50.0,
            phase_shift: 0.0,
            wave_type: WaveKind::Sine,
        }
    }
}

/// Input domains for wave parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveLimits {
    pub min_frequency: f64,
    pub max_frequency: f64,
    pub max_visible_cycles: u32,
}

impl Default for WaveLimits {
    fn default() -> Self {
        WaveLimits {
            min_frequency: 20.0,
            max_frequency: 2000.0,
            max_visible_cycles: 50,
        }
    }
}

impl WaveLimits {
    /// NaN and non-positive values go to the minimum, `+∞` to the maximum.
    pub fn clamp_frequency(&self, frequency: f64) -> f64 {
        if frequency.is_nan() {
            return self.min_frequency;
        }
        frequency.clamp(self.min_frequency, self.max_frequency)
    }

    pub fn clamp_amplitude(&self, amplitude: f64) -> f64 {
        if amplitude.is_nan() {
            return 0.0;
        }
        amplitude.clamp(0.0, 100.0)
    }

    pub fn clamp_phase(&self, phase_shift: f64) -> f64 {
        if phase_shift.is_finite() {
            phase_shift
        } else {
            0.0
        }
    }

    pub fn clamp_visible_cycles(&self, cycles: u32) -> u32 {
        cycles.clamp(1, self.max_visible_cycles.max(1))
    }
}

/// Parses a frequency typed by the user; non-numeric text means the minimum.
pub fn coerce_frequency(raw: &str, limits: &WaveLimits) -> f64 {
    let parsed = raw.trim().parse::<f64>().unwrap_or(limits.min_frequency);
    limits.clamp_frequency(parsed)
}

/// Parses an amplitude typed by the user; non-numeric text means silence.
pub fn coerce_amplitude(raw: &str, limits: &WaveLimits) -> f64 {
    limits.clamp_amplitude(raw.trim().parse::<f64>().unwrap_or(0.0))
}

pub fn coerce_phase(raw: &str, limits: &WaveLimits) -> f64 {
    limits.clamp_phase(raw.trim().parse::<f64>().unwrap_or(0.0))
}

/// Read-only copy of a wave's state, carried by change notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveSnapshot {
    pub id: WaveId,
    pub params: WaveParams,
    pub is_active: bool,
    pub visible_cycles: u32,
    pub formula: String,
}

/// One periodic signal source.
///
/// Every setter clamps its input, regenerates the formula, re-syncs the audio
/// driver and only then publishes its notification.
pub struct Wave {
    id: WaveId,
    params: WaveParams,
    is_active: bool,
    visible_cycles: u32,
    formula: Formula,
    limits: WaveLimits,
    bus: EventBus,
    transport: Rc<Transport>,
    driver: Box<dyn AudioDriver>,
}

impl Wave {
    pub fn id(&self) -> WaveId {
        self.id
    }

    pub fn params(&self) -> WaveParams {
        self.params
    }

    pub fn frequency(&self) -> f64 {
        self.params.frequency
    }

    pub fn amplitude(&self) -> f64 {
        self.params.amplitude
    }

    pub fn phase_shift(&self) -> f64 {
        self.params.phase_shift
    }

    pub fn wave_type(&self) -> WaveKind {
        self.params.wave_type
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn visible_cycles(&self) -> u32 {
        self.visible_cycles
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    pub fn limits(&self) -> &WaveLimits {
        &self.limits
    }

    pub fn is_sounding(&self) -> bool {
        self.driver.is_playing()
    }

    /// Signal value at `t` seconds, amplitude included.
    pub fn value_at(&self, t: f64) -> f64 {
        self.formula.evaluate(t)
    }

    pub fn snapshot(&self) -> WaveSnapshot {
        WaveSnapshot {
            id: self.id,
            params: self.params,
            is_active: self.is_active,
            visible_cycles: self.visible_cycles,
            formula: self.formula.display().to_string(),
        }
    }

    pub fn set_frequency(&mut self, frequency: f64) {
        let clamped = self.limits.clamp_frequency(frequency);
        if clamped != frequency {
            log::debug!("Wave {} frequency {} clamped to {}", self.id, frequency, clamped);
        }
        self.params.frequency = clamped;
        self.regenerate();
        log::debug!("Wave {} frequency set to {}", self.id, clamped);
        self.notify_changed();
    }

    pub fn set_amplitude(&mut self, amplitude: f64) {
        let clamped = self.limits.clamp_amplitude(amplitude);
        if clamped != amplitude {
            log::debug!("Wave {} amplitude {} clamped to {}", self.id, amplitude, clamped);
        }
        self.params.amplitude = clamped;
        self.regenerate();
        log::debug!("Wave {} amplitude set to {}", self.id, clamped);
        self.notify_changed();
    }

    pub fn set_phase_shift(&mut self, phase_shift: f64) {
        self.params.phase_shift = self.limits.clamp_phase(phase_shift);
        self.regenerate();
        log::debug!("Wave {} phase set to {}", self.id, self.params.phase_shift);
        self.notify_changed();
    }

    pub fn set_wave_type(&mut self, wave_type: WaveKind) {
        self.params.wave_type = wave_type;
        self.regenerate();
        log::debug!("Wave {} type set to {}", self.id, wave_type);
        self.notify_changed();
    }

    /// Unknown names fall back to the default kind.
    pub fn set_wave_type_named(&mut self, name: &str) {
        let wave_type = name.parse::<WaveKind>().unwrap_or_else(|err| {
            log::warn!("Wave {}: {}, using {}", self.id, err, WaveKind::default());
            WaveKind::default()
        });
        self.set_wave_type(wave_type);
    }

    pub fn set_visible_cycles(&mut self, cycles: u32) {
        self.visible_cycles = self.limits.clamp_visible_cycles(cycles);
        self.notify_changed();
    }

    /// Sets the active flag; publishes only when it actually flips.
    pub fn set_active(&mut self, active: bool) {
        if self.is_active != active {
            self.toggle_active();
        }
    }

    pub fn toggle_active(&mut self) {
        self.is_active = !self.is_active;
        self.sync_audio();
        log::debug!("Wave {} active: {}", self.id, self.is_active);
        self.bus.publish(WaveEvent::WaveToggled {
            id: self.id,
            is_active: self.is_active,
        });
    }

    pub(crate) fn set_gain(&mut self, gain: f64) {
        self.driver.set_gain(gain);
    }

    /// Starts or stops the driver to match the transport and the active flag.
    pub(crate) fn sync_audio(&mut self) {
        match self.transport.origin() {
            Some(origin) if self.is_active => {
                self.driver.start(&self.formula, origin, self.transport.now())
            }
            _ => self.driver.stop(),
        }
    }

    pub(crate) fn release(&mut self) {
        self.driver.stop();
    }

    fn regenerate(&mut self) {
        self.formula = formula::generate(
            self.params.wave_type,
            self.params.amplitude,
            self.params.frequency,
            self.params.phase_shift,
        );
        self.driver.update(&self.formula);
    }

    fn notify_changed(&self) {
        self.bus.publish(WaveEvent::WavePropertyChanged {
            id: self.id,
            wave: self.snapshot(),
        });
    }

    pub fn with_bus(mut self, bus: EventBus) -> Self {
        self.bus = bus;
        self
    }

    pub fn with_transport(mut self, transport: Rc<Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_driver(mut self, driver: Box<dyn AudioDriver>) -> Self {
        self.driver = driver;
        self.driver.update(&self.formula);
        self
    }

    pub fn with_visible_cycles(mut self, cycles: u32) -> Self {
        self.visible_cycles = self.limits.clamp_visible_cycles(cycles);
        self
    }

    /// A standalone, active wave with its own bus, an idle transport and no
    /// audio. Parameters are clamped to `limits`.
    pub fn new(id: WaveId, params: WaveParams, limits: WaveLimits) -> Self {
        let params = WaveParams {
            frequency: limits.clamp_frequency(params.frequency),
            amplitude: limits.clamp_amplitude(params.amplitude),
            phase_shift: limits.clamp_phase(params.phase_shift),
            wave_type: params.wave_type,
        };
        let formula = formula::generate(
            params.wave_type,
            params.amplitude,
            params.frequency,
            params.phase_shift,
        );

        Wave {
            id,
            params,
            is_active: true,
            visible_cycles: limits.clamp_visible_cycles(10),
            formula,
            limits,
            bus: EventBus::new(),
            transport: Transport::detached(),
            driver: Box::new(NullDriver::default()),
        }
    }
}
