//! Notification bus between the wave model and whoever draws it.
//!
//! Events are delivered synchronously, in publication order, exactly once to
//! every subscriber. A subscriber that publishes while an event is being
//! dispatched does not re-enter the dispatch loop: its event is queued and
//! delivered once the current event has reached every subscriber.

use crate::wave::{WaveId, WaveSnapshot};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum WaveEvent {
    WaveAdded { id: WaveId },
    WaveRemoved { id: WaveId },
    WaveToggled { id: WaveId, is_active: bool },
    WavePropertyChanged { id: WaveId, wave: WaveSnapshot },
    DisplayChanged { visible_cycles: u32, base_frequency: f64 },
}

impl WaveEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WaveEvent::WaveAdded { .. } => "wave-added",
            WaveEvent::WaveRemoved { .. } => "wave-removed",
            WaveEvent::WaveToggled { .. } => "wave-toggled",
            WaveEvent::WavePropertyChanged { .. } => "wave-property-changed",
            WaveEvent::DisplayChanged { .. } => "display-changed",
        }
    }

    pub fn wave_id(&self) -> Option<WaveId> {
        match self {
            WaveEvent::WaveAdded { id }
            | WaveEvent::WaveRemoved { id }
            | WaveEvent::WaveToggled { id, .. }
            | WaveEvent::WavePropertyChanged { id, .. } => Some(*id),
            WaveEvent::DisplayChanged { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&WaveEvent)>;

#[derive(Default)]
struct BusInner {
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    pending: RefCell<VecDeque<WaveEvent>>,
    removed: RefCell<Vec<SubscriptionId>>,
    dispatching: Cell<bool>,
    next_id: Cell<u64>,
}

/// Cheaply cloneable handle; clones publish to the same subscribers.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<BusInner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl FnMut(&WaveEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .listeners
            .borrow_mut()
            .retain(|(listener_id, _)| *listener_id != id);
        if self.inner.dispatching.get() {
            self.inner.removed.borrow_mut().push(id);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    pub fn publish(&self, event: WaveEvent) {
        log::debug!("{} {:?}", event.name(), event.wave_id());
        self.inner.pending.borrow_mut().push_back(event);
        if self.inner.dispatching.get() {
            return;
        }

        self.inner.dispatching.set(true);
        loop {
            // bind first so the queue borrow ends before listeners run
            let next = self.inner.pending.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };

            let mut listeners = std::mem::take(&mut *self.inner.listeners.borrow_mut());
            for (_, listener) in listeners.iter_mut() {
                listener(&event);
            }

            let mut current = self.inner.listeners.borrow_mut();
            let added = std::mem::take(&mut *current);
            let removed = std::mem::take(&mut *self.inner.removed.borrow_mut());
            listeners.retain(|(id, _)| !removed.contains(id));
            *current = listeners;
            current.extend(added);
        }
        self.inner.dispatching.set(false);
    }
}
