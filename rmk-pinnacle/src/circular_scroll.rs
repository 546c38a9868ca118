//! Circular scroll gesture
//!
//! While a button is held, the relative motion is accumulated into an offset from the point where
//! the gesture started. Once the offset leaves the configured radius, its angle is tracked and every
//! rotation step larger than the angular dead zone becomes a unit scroll step, or a key pulse in key
//! mode. Distance and angle are integer approximations, no sqrt and no trigonometry.
//!
//! Angles are in 1/256 of a turn: 0 is right, 64 is up, 128 is left and 192 is down.
use crate::config::CircularScrollConfig;

/// Axis a scroll gesture is locked to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScrollDirection {
    /// Not decided yet
    #[default]
    None,
    Horizontal,
    Vertical,
}

/// Result of one gesture step, replaces the motion of the sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScrollOutput {
    pub dx: i8,
    pub dy: i8,
    /// Key code to pulse
    pub key: Option<u16>,
}

impl ScrollOutput {
    fn step(dx: i8, dy: i8) -> Self {
        Self { dx, dy, key: None }
    }

    fn key(key: u16) -> Self {
        Self {
            dx: 0,
            dy: 0,
            key: if key != 0 { Some(key) } else { None },
        }
    }
}

pub struct CircularScroll {
    config: CircularScrollConfig,
    active: bool,
    /// Accumulated offset from the gesture center
    offset_x: i16,
    offset_y: i16,
    /// Angle of the last sample outside the radius
    last_angle: Option<u8>,
    direction: ScrollDirection,
}

impl CircularScroll {
    pub fn new(config: CircularScrollConfig) -> Self {
        Self {
            config,
            active: false,
            offset_x: 0,
            offset_y: 0,
            last_angle: None,
            direction: ScrollDirection::None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    pub fn offset(&self) -> (i16, i16) {
        (self.offset_x, self.offset_y)
    }

    fn reset(&mut self) {
        self.active = false;
        self.offset_x = 0;
        self.offset_y = 0;
        self.last_angle = None;
        self.direction = ScrollDirection::None;
    }

    /// Feed one sample into the gesture.
    ///
    /// Returns `None` when the gesture doesn't own the sample and the motion should be reported as is.
    /// The samples starting and ending the gesture are consumed.
    pub fn process(&mut self, held: bool, dx: i8, dy: i8) -> Option<ScrollOutput> {
        if !self.config.enabled {
            return None;
        }

        match (self.active, held) {
            (false, false) => None,
            (false, true) => {
                self.reset();
                self.active = true;
                debug!("Circular scroll started");
                Some(ScrollOutput::default())
            }
            (true, false) => {
                self.reset();
                debug!("Circular scroll stopped");
                Some(ScrollOutput::default())
            }
            (true, true) => Some(self.track(dx, dy)),
        }
    }

    fn track(&mut self, dx: i8, dy: i8) -> ScrollOutput {
        self.offset_x = self.offset_x.saturating_add(dx as i16);
        self.offset_y = self.offset_y.saturating_add(dy as i16);

        let distance = approx_distance(self.offset_x, self.offset_y);
        if distance < self.config.deadzone_radius as i32 || distance < self.config.radius as i32 {
            return ScrollOutput::default();
        }

        let angle = approx_angle(self.offset_x, self.offset_y);
        let Some(last_angle) = self.last_angle.replace(angle) else {
            return ScrollOutput::default();
        };

        let diff = angle_diff(last_angle, angle);
        if diff.abs() < self.config.deadzone_angle {
            return ScrollOutput::default();
        }

        if self.config.key_mode {
            let clockwise = (diff > 0) != self.config.invert_direction;
            return if clockwise {
                ScrollOutput::key(self.config.key_clockwise)
            } else {
                ScrollOutput::key(self.config.key_counterclockwise)
            };
        }

        if self.direction == ScrollDirection::None {
            self.direction = if (32..96).contains(&angle) || (160..224).contains(&angle) {
                ScrollDirection::Vertical
            } else {
                ScrollDirection::Horizontal
            };
            debug!("Circular scroll locked to {:?}", self.direction);
        }

        match self.direction {
            ScrollDirection::Vertical => ScrollOutput::step(0, if diff > 0 { -1 } else { 1 }),
            _ => ScrollOutput::step(if diff > 0 { 1 } else { -1 }, 0),
        }
    }
}

/// Octagonal distance: `max + min / 2`
fn approx_distance(x: i16, y: i16) -> i32 {
    let (ax, ay) = (x.unsigned_abs() as i32, y.unsigned_abs() as i32);
    if ax > ay { ax + ay / 2 } else { ay + ax / 2 }
}

/// Piecewise linear angle: the dominant axis picks the anchor, `minor * 64 / major` is the offset
fn approx_angle(x: i16, y: i16) -> u8 {
    let (ax, ay) = (x.unsigned_abs() as i32, y.unsigned_abs() as i32);
    let angle = if ax > ay {
        let ratio = ay * 64 / ax;
        match (x > 0, y > 0) {
            (true, true) => ratio,
            (true, false) => 256 - ratio,
            (false, true) => 128 - ratio,
            (false, false) => 128 + ratio,
        }
    } else {
        let ratio = ax * 64 / ay.max(1);
        match (y > 0, x > 0) {
            (true, true) => 64 - ratio,
            (true, false) => 64 + ratio,
            (false, true) => 192 + ratio,
            (false, false) => 192 - ratio,
        }
    };
    (angle & 0xFF) as u8
}

/// Signed difference `to - from`, wrapped into (-128, 128]
fn angle_diff(from: u8, to: u8) -> i16 {
    let diff = to as i16 - from as i16;
    if diff > 128 {
        diff - 256
    } else if diff <= -128 {
        diff + 256
    } else {
        diff
    }
}
