//! Sigmoid acceleration of relative motion
//!
//! `delta / (1 + |delta| / threshold) * factor`: slow movements keep their resolution while the output
//! of fast movements saturates towards `threshold * factor`.
use embassy_time::{Duration, Instant};

use crate::config::AccelerationConfig;

/// Motion separated by a longer gap starts over without acceleration
const STALE_AFTER: Duration = Duration::from_millis(100);

pub struct Accelerator {
    config: AccelerationConfig,
    /// Time of the last shaped delta, shared by both axes
    last_event: Option<Instant>,
}

impl Accelerator {
    pub fn new(config: AccelerationConfig) -> Self {
        Self {
            config,
            last_event: None,
        }
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    /// Shape one axis delta received at `now`
    pub fn shape(&mut self, delta: i8, now: Instant) -> i8 {
        let last = self.last_event.replace(now);

        let threshold = self.config.threshold;
        if !self.config.enabled || threshold == 0 || delta.unsigned_abs() < threshold {
            return delta;
        }

        let continued = last
            .and_then(|last| now.checked_duration_since(last))
            .is_some_and(|elapsed| elapsed <= STALE_AFTER);
        if !continued {
            return delta;
        }

        let accel = delta as f32 / (1.0 + delta.unsigned_abs() as f32 / threshold as f32) * self.config.factor;

        // Round half away from zero, `as` saturates to i8
        if delta >= 0 {
            (accel + 0.5) as i8
        } else {
            (accel - 0.5) as i8
        }
    }
}
