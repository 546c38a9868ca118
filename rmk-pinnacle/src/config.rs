//! Configurations of the Pinnacle trackpad
use embassy_time::Duration;

/// ADC gain used while tracking, higher gain makes the pad more sensitive to a light touch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sensitivity {
    #[default]
    X1,
    X2,
    X3,
    X4,
}

impl Sensitivity {
    /// Gain bits of the tracking ADC config register
    pub(crate) fn adc_config_bits(&self) -> u8 {
        match self {
            Sensitivity::X1 => 0x00,
            Sensitivity::X2 => 0x40,
            Sensitivity::X3 => 0x80,
            Sensitivity::X4 => 0xC0,
        }
    }
}

/// Sigmoid acceleration of relative motion
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelerationConfig {
    pub enabled: bool,
    /// Overall gain of the curve
    pub factor: f32,
    /// Deltas smaller than the threshold are never accelerated
    pub threshold: u8,
}

impl Default for AccelerationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            factor: 2.0,
            threshold: 5,
        }
    }
}

/// Circular scroll gesture: hold a button and draw circles on the pad
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CircularScrollConfig {
    pub enabled: bool,
    /// Distance from the gesture center where rotation starts being tracked
    pub radius: i16,
    /// Minimum angle change between two samples, in 1/256 of a turn
    pub deadzone_angle: i16,
    /// Distance from the gesture center where nothing is reported
    pub deadzone_radius: i16,
    /// Swap clockwise and counter-clockwise
    pub invert_direction: bool,
    /// Emit key pulses instead of scroll steps
    pub key_mode: bool,
    /// Key code pulsed for a clockwise step in key mode, 0 disables it
    pub key_clockwise: u16,
    /// Key code pulsed for a counter-clockwise step in key mode, 0 disables it
    pub key_counterclockwise: u16,
}

impl Default for CircularScrollConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            radius: 20,
            deadzone_angle: 4,
            deadzone_radius: 15,
            invert_direction: false,
            key_mode: false,
            key_clockwise: 0,
            key_counterclockwise: 0,
        }
    }
}

/// Polling budget of the extended register access handshake
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EraConfig {
    /// Max reads of the control register before giving up
    pub max_polls: u16,
    /// Delay between two reads of the control register
    pub poll_interval: Duration,
}

impl Default for EraConfig {
    fn default() -> Self {
        Self {
            max_polls: 100,
            poll_interval: Duration::from_micros(100),
        }
    }
}

/// Pinnacle trackpad configuration
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinnacleConfig {
    /// Rotate the sensor by 90 degrees
    pub rotate_90: bool,
    /// Invert X axis
    pub invert_x: bool,
    /// Invert Y axis
    pub invert_y: bool,
    /// Let the sensor enter sleep mode when idle
    pub sleep: bool,
    /// Disable taps, button events are not reported either
    pub no_taps: bool,
    /// Disable secondary (top-right corner) taps
    pub no_secondary_tap: bool,
    /// Z-min calibration byte of the X axis
    pub x_axis_z_min: u8,
    /// Z-min calibration byte of the Y axis
    pub y_axis_z_min: u8,
    pub sensitivity: Sensitivity,
    pub acceleration: AccelerationConfig,
    pub circular_scroll: CircularScrollConfig,
    pub era: EraConfig,
}

impl Default for PinnacleConfig {
    fn default() -> Self {
        Self {
            rotate_90: false,
            invert_x: false,
            invert_y: false,
            sleep: false,
            no_taps: false,
            no_secondary_tap: false,
            x_axis_z_min: 5,
            y_axis_z_min: 4,
            sensitivity: Sensitivity::X1,
            acceleration: AccelerationConfig::default(),
            circular_scroll: CircularScrollConfig::default(),
            era: EraConfig::default(),
        }
    }
}
