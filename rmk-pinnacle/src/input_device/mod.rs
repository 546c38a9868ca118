//! Input device interface
//!
//! The `InputDevice` trait is the interface between a sensor and whoever consumes its events, for
//! example a keyboard processor that turns them into HID reports.
//!
//! # Example
//! ```rust
//! let mut trackpad = PinnacleDevice::new(PinnacleI2c::new(i2c), DataReadyPin::new(dr_pin), config, 0);
//! loop {
//!     match trackpad.read_event().await {
//!         PinnacleEvent::Motion { dx, dy } => { /* move the pointer */ }
//!         _ => {}
//!     }
//! }
//! ```
pub mod pinnacle;

/// The trait for input devices.
pub trait InputDevice {
    type Event;

    /// Read the next event, waits until the device has one
    async fn read_event(&mut self) -> Self::Event;
}

/// Initialization state of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitState {
    Pending,
    Initializing(u8),
    Ready,
    Failed,
}
