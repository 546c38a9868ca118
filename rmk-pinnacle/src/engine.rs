//! Per-sample motion processing
//!
//! Every decoded sample goes through either the circular scroll gesture or the acceleration curve,
//! never both. Button edges are reported against the buttons of the previous sample.
use embassy_time::Instant;

use crate::acceleration::Accelerator;
use crate::circular_scroll::{CircularScroll, ScrollDirection};
use crate::config::PinnacleConfig;
use crate::event::{BUTTON_COUNT, EventSink};
use crate::packet::MotionSample;

pub struct MotionEngine {
    no_taps: bool,
    scroll: CircularScroll,
    accelerator: Accelerator,
    /// Buttons of the previous sample
    buttons: u8,
}

impl MotionEngine {
    pub fn new(config: &PinnacleConfig) -> Self {
        Self {
            no_taps: config.no_taps,
            scroll: CircularScroll::new(config.circular_scroll),
            accelerator: Accelerator::new(config.acceleration),
            buttons: 0,
        }
    }

    pub fn scrolling(&self) -> bool {
        self.scroll.is_active()
    }

    pub fn scroll_direction(&self) -> ScrollDirection {
        self.scroll.direction()
    }

    /// Process one sample received at `now`, events are written to `sink`
    pub fn process<S: EventSink>(&mut self, sample: MotionSample, now: Instant, sink: &mut S) {
        let held = sample.buttons != 0;

        let (dx, dy) = match self.scroll.process(held, sample.dx, sample.dy) {
            Some(output) => {
                if let Some(key) = output.key {
                    sink.key_pulse(key);
                }
                (output.dx, output.dy)
            }
            None if self.accelerator.enabled() => (
                self.accelerator.shape(sample.dx, now),
                self.accelerator.shape(sample.dy, now),
            ),
            None => (sample.dx, sample.dy),
        };

        self.report_buttons(sample.buttons, sink);

        if dx != 0 || dy != 0 {
            sink.relative_motion(dx, dy);
        }
    }

    fn report_buttons<S: EventSink>(&mut self, buttons: u8, sink: &mut S) {
        if !self.no_taps && (buttons != 0 || self.buttons != 0) {
            for index in 0..BUTTON_COUNT {
                let mask = 1 << index;
                if buttons & mask != self.buttons & mask {
                    sink.button(index, buttons & mask != 0);
                }
            }
        }
        // Keep tracking while suppressed, so that edges stay correct
        self.buttons = buttons;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AccelerationConfig, CircularScrollConfig};
    use crate::event::{EventQueue, PinnacleEvent};

    fn sample(buttons: u8, dx: i8, dy: i8) -> MotionSample {
        MotionSample { buttons, dx, dy }
    }

    fn drain(queue: &mut EventQueue<16>) -> Vec<PinnacleEvent> {
        core::iter::from_fn(|| queue.pop()).collect()
    }

    #[test]
    fn test_plain_motion() {
        let mut engine = MotionEngine::new(&PinnacleConfig::default());
        let mut queue = EventQueue::<16>::new();

        engine.process(sample(0, 3, -4), Instant::from_millis(0), &mut queue);
        assert_eq!(drain(&mut queue), [PinnacleEvent::Motion { dx: 3, dy: -4 }]);

        // No motion, no buttons: nothing is reported
        engine.process(sample(0, 0, 0), Instant::from_millis(10), &mut queue);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_button_edges() {
        let mut engine = MotionEngine::new(&PinnacleConfig::default());
        let mut queue = EventQueue::<16>::new();

        engine.process(sample(0b001, 0, 0), Instant::from_millis(0), &mut queue);
        assert_eq!(drain(&mut queue), [PinnacleEvent::Button { index: 0, pressed: true }]);

        // Held, no edge
        engine.process(sample(0b001, 1, 0), Instant::from_millis(10), &mut queue);
        assert_eq!(drain(&mut queue), [PinnacleEvent::Motion { dx: 1, dy: 0 }]);

        engine.process(sample(0b110, 0, 0), Instant::from_millis(20), &mut queue);
        assert_eq!(
            drain(&mut queue),
            [
                PinnacleEvent::Button { index: 0, pressed: false },
                PinnacleEvent::Button { index: 1, pressed: true },
                PinnacleEvent::Button { index: 2, pressed: true },
            ]
        );

        engine.process(sample(0, 0, 0), Instant::from_millis(30), &mut queue);
        assert_eq!(
            drain(&mut queue),
            [
                PinnacleEvent::Button { index: 1, pressed: false },
                PinnacleEvent::Button { index: 2, pressed: false },
            ]
        );
    }

    #[test]
    fn test_no_taps_suppresses_buttons() {
        let config = PinnacleConfig {
            no_taps: true,
            ..Default::default()
        };
        let mut engine = MotionEngine::new(&config);
        let mut queue = EventQueue::<16>::new();

        engine.process(sample(0b001, 0, 0), Instant::from_millis(0), &mut queue);
        engine.process(sample(0, 0, 0), Instant::from_millis(10), &mut queue);
        assert!(queue.is_empty());
        assert_eq!(engine.buttons, 0);

        engine.process(sample(0b010, 0, 0), Instant::from_millis(20), &mut queue);
        assert!(queue.is_empty());
        assert_eq!(engine.buttons, 0b010);
    }

    #[test]
    fn test_acceleration_applied() {
        let config = PinnacleConfig {
            acceleration: AccelerationConfig {
                enabled: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut engine = MotionEngine::new(&config);
        let mut queue = EventQueue::<16>::new();

        // First sample: X has no previous event, Y continues the X call
        engine.process(sample(0, 10, 10), Instant::from_millis(0), &mut queue);
        assert_eq!(drain(&mut queue), [PinnacleEvent::Motion { dx: 10, dy: 7 }]);

        engine.process(sample(0, 10, -10), Instant::from_millis(8), &mut queue);
        assert_eq!(drain(&mut queue), [PinnacleEvent::Motion { dx: 7, dy: -7 }]);
    }

    #[test]
    fn test_scroll_owns_motion() {
        let config = PinnacleConfig {
            acceleration: AccelerationConfig {
                enabled: true,
                ..Default::default()
            },
            circular_scroll: CircularScrollConfig {
                enabled: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut engine = MotionEngine::new(&config);
        let mut queue = EventQueue::<16>::new();

        // Press starts the gesture, the press itself is still reported
        engine.process(sample(0b001, 10, 10), Instant::from_millis(0), &mut queue);
        assert_eq!(drain(&mut queue), [PinnacleEvent::Button { index: 0, pressed: true }]);
        assert!(engine.scrolling());

        // Inside the radius, motion is swallowed instead of accelerated
        engine.process(sample(0b001, 10, 0), Instant::from_millis(5), &mut queue);
        assert!(queue.is_empty());

        // Angle 0 recorded, then 0 -> 21
        engine.process(sample(0b001, 20, 0), Instant::from_millis(10), &mut queue);
        engine.process(sample(0b001, 0, 10), Instant::from_millis(15), &mut queue);
        assert_eq!(drain(&mut queue), [PinnacleEvent::Motion { dx: 1, dy: 0 }]);
        assert_eq!(engine.scroll_direction(), ScrollDirection::Horizontal);

        // Release ends the gesture and swallows its motion
        engine.process(sample(0, 50, 50), Instant::from_millis(20), &mut queue);
        assert_eq!(drain(&mut queue), [PinnacleEvent::Button { index: 0, pressed: false }]);
        assert!(!engine.scrolling());

        // Acceleration is back, starting from a fresh motion
        engine.process(sample(0, 10, 0), Instant::from_millis(25), &mut queue);
        assert_eq!(drain(&mut queue), [PinnacleEvent::Motion { dx: 10, dy: 0 }]);
        engine.process(sample(0, 10, 0), Instant::from_millis(30), &mut queue);
        assert_eq!(drain(&mut queue), [PinnacleEvent::Motion { dx: 7, dy: 0 }]);
    }

    #[test]
    fn test_key_pulse() {
        let config = PinnacleConfig {
            circular_scroll: CircularScrollConfig {
                enabled: true,
                key_mode: true,
                key_clockwise: 0x4F,
                key_counterclockwise: 0x50,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut engine = MotionEngine::new(&config);
        let mut queue = EventQueue::<16>::new();

        engine.process(sample(0b001, 0, 0), Instant::from_millis(0), &mut queue);
        engine.process(sample(0b001, 30, 0), Instant::from_millis(5), &mut queue);
        drain(&mut queue);

        engine.process(sample(0b001, 0, 10), Instant::from_millis(10), &mut queue);
        assert_eq!(
            drain(&mut queue),
            [
                PinnacleEvent::Key { code: 0x4F, pressed: true },
                PinnacleEvent::Key { code: 0x4F, pressed: false },
            ]
        );
    }
}
