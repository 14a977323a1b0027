use crate::audio::AudioBackend;
use crate::collection::WaveCollection;
use crate::config::StudioConfig;
use crate::events::{EventBus, SubscriptionId, WaveEvent};
use crate::render::{CombinedRenderer, Surface, WaveRenderer};
use crate::transport::Clock;
use crate::wave::WaveId;
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

type Inbox = Rc<RefCell<VecDeque<WaveEvent>>>;

/// Wires the wave collection to its renderers through the event bus.
///
/// Renderers are created and dropped in response to `wave-added` and
/// `wave-removed`, never by the code that mutates the collection.
pub struct Studio {
    config: StudioConfig,
    collection: WaveCollection,
    renderers: BTreeMap<WaveId, WaveRenderer>,
    combined: CombinedRenderer,
    inbox: Inbox,
    subscription: SubscriptionId,
}

impl Studio {
    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn collection(&self) -> &WaveCollection {
        &self.collection
    }

    pub fn collection_mut(&mut self) -> &mut WaveCollection {
        &mut self.collection
    }

    pub fn bus(&self) -> &EventBus {
        self.collection.bus()
    }

    pub fn renderer(&self, id: WaveId) -> Option<&WaveRenderer> {
        self.renderers.get(&id)
    }

    pub fn renderer_ids(&self) -> Vec<WaveId> {
        self.renderers.keys().copied().collect()
    }

    pub fn combined(&self) -> &CombinedRenderer {
        &self.combined
    }

    /// Adds `count` waves with the configured defaults.
    pub fn populate(&mut self, count: usize) {
        for _ in 0..count {
            self.collection.add();
        }
        self.pump_events();
    }

    /// Applies every queued bus event to the renderers. Returns how many
    /// events were handled.
    pub fn pump_events(&mut self) -> usize {
        let events: Vec<WaveEvent> = self.inbox.borrow_mut().drain(..).collect();

        for event in &events {
            match event {
                WaveEvent::WaveAdded { id } => {
                    self.renderers.insert(
                        *id,
                        WaveRenderer::new(*id, self.config.wave_padding, self.config.sample_step),
                    );
                }
                WaveEvent::WaveRemoved { id } => {
                    self.renderers.remove(id);
                }
                _ => {}
            }
            log::trace!("Handled {}", event.name());
        }

        if !events.is_empty() {
            self.combined.invalidate();
        }
        events.len()
    }

    /// Handles pending events and returns the elapsed playback time for this
    /// refresh, if the redraw loop is running.
    pub fn frame(&mut self) -> Option<f64> {
        self.pump_events();
        self.collection.frame_elapsed()
    }

    /// Redraws the viewport of wave `id`. Returns `false` when there is no
    /// such wave.
    pub fn draw_wave(&self, id: WaveId, surface: &mut dyn Surface, elapsed: Option<f64>) -> bool {
        let (Some(wave), Some(renderer)) = (self.collection.get(id), self.renderers.get(&id)) else {
            return false;
        };
        renderer.draw(surface, wave, self.collection.base_frequency(), elapsed);
        true
    }

    pub fn draw_combined(&mut self, surface: &mut dyn Surface, elapsed: Option<f64>) {
        let window = self.collection.window();
        self.combined
            .draw(surface, self.collection.waves(), &window, elapsed);
    }

    pub fn new(config: StudioConfig, clock: Rc<dyn Clock>, backend: Box<dyn AudioBackend>) -> Self {
        let bus = EventBus::new();
        let inbox: Inbox = Rc::default();
        let queue = inbox.clone();
        let subscription = bus.subscribe(move |event| queue.borrow_mut().push_back(event.clone()));

        Studio {
            collection: WaveCollection::new(&config, bus, clock, backend),
            renderers: BTreeMap::new(),
            combined: CombinedRenderer::new(
                config.combined_padding,
                config.sample_step,
                config.auto_scale(),
            ),
            config,
            inbox,
            subscription,
        }
    }
}

impl Drop for Studio {
    fn drop(&mut self) {
        self.collection.bus().unsubscribe(self.subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullBackend;
    use crate::render::DisplayList;
    use crate::transport::ManualClock;
    use pretty_assertions::assert_eq;

    fn studio(clock: &ManualClock) -> Studio {
        Studio::new(
            StudioConfig::default(),
            Rc::new(clock.clone()),
            Box::new(NullBackend),
        )
    }

    #[test]
    fn test_populate_creates_renderers() {
        let clock = ManualClock::new(0.0);
        let mut studio = studio(&clock);
        studio.populate(6);

        assert_eq!(studio.renderer_ids(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(studio.collection().get(1).map(|w| w.frequency()), Some(440.0));
        assert_eq!(studio.collection().get(2).map(|w| w.frequency()), Some(220.0));
    }

    #[test]
    fn test_remove_drops_renderer() {
        let clock = ManualClock::new(0.0);
        let mut studio = studio(&clock);
        studio.populate(3);

        studio.collection_mut().remove(2);
        assert_eq!(studio.pump_events(), 1);
        assert_eq!(studio.renderer_ids(), vec![1, 3]);

        let mut list = DisplayList::new(100.0, 50.0);
        assert!(!studio.draw_wave(2, &mut list, None));
        assert!(list.is_empty());
        assert!(studio.draw_wave(3, &mut list, None));
        assert!(!list.is_empty());
    }

    #[test]
    fn test_property_change_invalidates_combined_view() {
        let clock = ManualClock::new(0.0);
        let mut studio = studio(&clock);
        studio.populate(1);

        let mut list = DisplayList::new(200.0, 150.0);
        studio.draw_combined(&mut list, None);
        assert!(!studio.combined().is_stale());

        if let Some(wave) = studio.collection_mut().get_mut(1) {
            wave.set_amplitude(10.0);
        }
        studio.pump_events();
        assert!(studio.combined().is_stale());

        studio.draw_combined(&mut list, None);
        let peak = studio.combined().trace().map(|trace| trace.peak).unwrap_or_default();
        assert!(peak <= 0.1 + 1e-9);
    }

    #[test]
    fn test_frame_follows_playback() {
        let clock = ManualClock::new(2.0);
        let mut studio = studio(&clock);
        studio.populate(2);
        assert_eq!(studio.frame(), None);

        studio.collection_mut().play();
        clock.advance(0.5);
        assert_eq!(studio.frame(), Some(0.5));

        studio.collection_mut().stop();
        assert_eq!(studio.frame(), None);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let clock = ManualClock::new(0.0);
        let studio = studio(&clock);
        let bus = studio.bus().clone();
        assert_eq!(bus.subscriber_count(), 1);
        drop(studio);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
