use crate::audio::AudioBackend;
use crate::config::StudioConfig;
use crate::events::{EventBus, WaveEvent};
use crate::render::TimeWindow;
use crate::transport::{Clock, RedrawLoop, RedrawTicket, Transport};
use crate::wave::kind::WaveKind;
use crate::wave::{Wave, WaveId, WaveLimits, WaveParams};
use std::rc::Rc;

/// Parameters given to newly added waves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveDefaults {
    /// Frequency of the first wave.
    pub reference_frequency: f64,
    pub frequency: f64,
    pub amplitude: f64,
    pub wave_type: WaveKind,
}

impl WaveDefaults {
    pub fn from_config(config: &StudioConfig) -> Self {
        WaveDefaults {
            reference_frequency: config.reference_frequency,
            frequency: config.default_frequency,
            amplitude: config.default_amplitude,
            wave_type: config.default_wave_type,
        }
    }

    fn params_for(&self, id: WaveId) -> WaveParams {
        WaveParams {
            frequency: if id == 1 {
                self.reference_frequency
            } else {
                self.frequency
            },
            amplitude: self.amplitude,
            phase_shift: 0.0,
            wave_type: self.wave_type,
        }
    }
}

/// Ordered set of waves plus the display and playback state they share.
pub struct WaveCollection {
    waves: Vec<Wave>,
    last_id: WaveId,
    visible_cycles: u32,
    base_frequency: f64,
    master_volume: f64,
    limits: WaveLimits,
    defaults: WaveDefaults,
    bus: EventBus,
    transport: Rc<Transport>,
    backend: Box<dyn AudioBackend>,
    redraw: RedrawLoop,
    ticket: Option<RedrawTicket>,
}

impl WaveCollection {
    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    pub fn ids(&self) -> Vec<WaveId> {
        self.waves.iter().map(Wave::id).collect()
    }

    pub fn get(&self, id: WaveId) -> Option<&Wave> {
        self.waves.iter().find(|wave| wave.id() == id)
    }

    pub fn get_mut(&mut self, id: WaveId) -> Option<&mut Wave> {
        self.waves.iter_mut().find(|wave| wave.id() == id)
    }

    pub fn active_waves(&self) -> impl Iterator<Item = &Wave> {
        self.waves.iter().filter(|wave| wave.is_active())
    }

    /// Sum of every active wave at `t`.
    pub fn combined_value_at(&self, t: f64) -> f64 {
        self.active_waves().map(|wave| wave.value_at(t)).sum()
    }

    pub fn visible_cycles(&self) -> u32 {
        self.visible_cycles
    }

    pub fn base_frequency(&self) -> f64 {
        self.base_frequency
    }

    pub fn master_volume(&self) -> f64 {
        self.master_volume
    }

    pub fn limits(&self) -> &WaveLimits {
        &self.limits
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn transport(&self) -> &Rc<Transport> {
        &self.transport
    }

    /// Window shared by the combined view.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.visible_cycles, self.base_frequency)
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    pub fn playback_start_time(&self) -> Option<f64> {
        self.transport.origin()
    }

    /// Appends a wave with the next id and the shared defaults.
    ///
    /// While playing, an active new wave starts sounding right away on the
    /// running session's origin.
    pub fn add(&mut self) -> &mut Wave {
        self.last_id += 1;
        let id = self.last_id;
        let gain = self.master_volume / 100.0;

        let mut wave = Wave::new(id, self.defaults.params_for(id), self.limits)
            .with_visible_cycles(self.visible_cycles)
            .with_bus(self.bus.clone())
            .with_transport(self.transport.clone())
            .with_driver(self.backend.create_driver(id));
        wave.set_gain(gain);
        wave.sync_audio();

        self.waves.push(wave);
        log::info!("Added wave {}", id);
        self.bus.publish(WaveEvent::WaveAdded { id });

        let index = self.waves.len() - 1;
        &mut self.waves[index]
    }

    /// Removes the wave with `id`; unknown ids are ignored.
    pub fn remove(&mut self, id: WaveId) {
        let Some(index) = self.waves.iter().position(|wave| wave.id() == id) else {
            log::debug!("Wave {} already removed", id);
            return;
        };

        let mut wave = self.waves.remove(index);
        wave.release();
        log::info!("Removed wave {}", id);
        self.bus.publish(WaveEvent::WaveRemoved { id });
    }

    pub fn set_active_for_all(&mut self, active: bool) {
        for wave in self.waves.iter_mut() {
            wave.set_active(active);
        }
        log::info!("All waves {}", if active { "active" } else { "inactive" });
    }

    pub fn broadcast_visible_cycles(&mut self, cycles: u32) {
        self.visible_cycles = self.limits.clamp_visible_cycles(cycles);
        for wave in self.waves.iter_mut() {
            wave.set_visible_cycles(self.visible_cycles);
        }
        self.notify_display_changed();
    }

    pub fn broadcast_base_frequency(&mut self, frequency: f64) {
        self.base_frequency = self.limits.clamp_frequency(frequency);
        self.notify_display_changed();
    }

    /// Master audio volume in percent. Rendering is unaffected.
    pub fn set_master_volume(&mut self, volume: f64) {
        self.master_volume = coerce_volume(volume);
        for wave in self.waves.iter_mut() {
            wave.set_gain(self.master_volume / 100.0);
        }
        log::info!("Master volume set to {}", self.master_volume);
    }

    pub fn play(&mut self) {
        if self.is_playing() {
            return;
        }

        let origin = self.transport.begin();
        for wave in self.waves.iter_mut() {
            wave.sync_audio();
        }
        self.ticket = Some(self.redraw.start());
        log::info!("Playback started at {:.3}s", origin);
    }

    pub fn stop(&mut self) {
        if !self.is_playing() {
            return;
        }

        self.redraw.cancel();
        self.ticket = None;
        self.transport.end();
        for wave in self.waves.iter_mut() {
            wave.sync_audio();
        }
        log::info!("Playback stopped");
    }

    /// Elapsed playback time for the current display refresh, `None` when
    /// the redraw loop is not running.
    pub fn frame_elapsed(&self) -> Option<f64> {
        self.ticket
            .and_then(|ticket| self.redraw.tick(ticket, &self.transport))
    }

    fn notify_display_changed(&self) {
        log::debug!(
            "Display window: {} cycles at {} Hz",
            self.visible_cycles,
            self.base_frequency
        );
        self.bus.publish(WaveEvent::DisplayChanged {
            visible_cycles: self.visible_cycles,
            base_frequency: self.base_frequency,
        });
    }

    pub fn new(
        config: &StudioConfig,
        bus: EventBus,
        clock: Rc<dyn Clock>,
        backend: Box<dyn AudioBackend>,
    ) -> Self {
        let limits = config.limits();

        WaveCollection {
            waves: vec![],
            last_id: 0,
            visible_cycles: limits.clamp_visible_cycles(config.visible_cycles),
            base_frequency: limits.clamp_frequency(config.base_frequency),
            master_volume: coerce_volume(config.master_volume),
            limits,
            defaults: WaveDefaults::from_config(config),
            bus,
            transport: Rc::new(Transport::new(clock)),
            backend,
            redraw: RedrawLoop::default(),
            ticket: None,
        }
    }
}

// NaN reads as silence.
fn coerce_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 100.0)
    }
}
