//! Events emitted by the Pinnacle trackpad
use heapless::Deque;

/// Number of buttons reported by the sensor
pub const BUTTON_COUNT: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinnacleEvent {
    /// A button changed its state, `index` is 0 (primary), 1 (secondary) or 2 (auxiliary)
    Button { index: u8, pressed: bool },
    /// Relative motion
    Motion { dx: i8, dy: i8 },
    /// A key event from circular scroll key mode
    Key { code: u16, pressed: bool },
}

/// Outward sink of decoded events
pub trait EventSink {
    fn button(&mut self, index: u8, pressed: bool);

    fn relative_motion(&mut self, dx: i8, dy: i8);

    /// Press and release `code`
    fn key_pulse(&mut self, code: u16);
}

/// Bounded FIFO of events waiting to be read
///
/// One sample produces at most 3 button events, a motion event and a key pulse.
pub struct EventQueue<const N: usize> {
    events: Deque<PinnacleEvent, N>,
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EventQueue<N> {
    pub const fn new() -> Self {
        Self { events: Deque::new() }
    }

    pub fn pop(&mut self) -> Option<PinnacleEvent> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn push(&mut self, event: PinnacleEvent) {
        if self.events.push_back(event).is_err() {
            warn!("Pinnacle: event queue is full, dropping {:?}", event);
        }
    }
}

impl<const N: usize> EventSink for EventQueue<N> {
    fn button(&mut self, index: u8, pressed: bool) {
        self.push(PinnacleEvent::Button { index, pressed });
    }

    fn relative_motion(&mut self, dx: i8, dy: i8) {
        self.push(PinnacleEvent::Motion { dx, dy });
    }

    fn key_pulse(&mut self, code: u16) {
        self.push(PinnacleEvent::Key { code, pressed: true });
        self.push(PinnacleEvent::Key { code, pressed: false });
    }
}
