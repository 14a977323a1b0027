//! Playback clock and the redraw loop that follows it.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic time source, in seconds from an arbitrary epoch.
pub trait Clock {
    fn now(&self) -> f64;
}

pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        ManualClock {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }

    pub fn set(&self, seconds: f64) {
        self.now.set(seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

/// The shared playback origin.
///
/// Written only when playback starts or stops; every wave and renderer reads
/// elapsed time from the same origin so cursors and oscillators stay aligned.
pub struct Transport {
    clock: Rc<dyn Clock>,
    origin: Cell<Option<f64>>,
}

impl Transport {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Transport {
            clock,
            origin: Cell::new(None),
        }
    }

    /// A transport that is never started, for waves living outside a collection.
    pub fn detached() -> Rc<Transport> {
        Rc::new(Transport::new(Rc::new(MonotonicClock::new())))
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn origin(&self) -> Option<f64> {
        self.origin.get()
    }

    pub fn is_playing(&self) -> bool {
        self.origin.get().is_some()
    }

    pub fn elapsed(&self) -> Option<f64> {
        self.origin.get().map(|origin| self.now() - origin)
    }

    pub(crate) fn begin(&self) -> f64 {
        let origin = self.now();
        self.origin.set(Some(origin));
        origin
    }

    pub(crate) fn end(&self) {
        self.origin.set(None);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedrawTicket(u64);

/// Cancellable repeating redraw task.
///
/// Every start hands out a ticket for a fresh generation; a tick only yields
/// an elapsed time for the ticket of the generation that is still running,
/// so nothing scheduled before a cancel can draw after it.
#[derive(Debug, Default)]
pub struct RedrawLoop {
    generation: u64,
    running: bool,
}

impl RedrawLoop {
    pub fn start(&mut self) -> RedrawTicket {
        self.generation += 1;
        self.running = true;
        RedrawTicket(self.generation)
    }

    pub fn cancel(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_current(&self, ticket: RedrawTicket) -> bool {
        self.running && ticket.0 == self.generation
    }

    pub fn tick(&self, ticket: RedrawTicket, transport: &Transport) -> Option<f64> {
        if !self.is_current(ticket) {
            return None;
        }
        transport.elapsed()
    }
}
