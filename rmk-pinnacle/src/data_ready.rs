//! Data-ready notification of the Pinnacle sensor
//!
//! The sensor raises its HW_DR line when a new frame is available. The line stays asserted until
//! STATUS1 is cleared, so waiting on the level (instead of the edge) coalesces bursts into a single
//! processing pass.
use core::future::pending;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;

use crate::error::PinnacleError;

/// Source of "data ready" notifications
pub trait DataReady {
    /// Wait until the sensor has a frame, never returns while notifications are disabled
    async fn wait(&mut self);

    /// Enable or disable notifications
    fn set_enabled(&mut self, enabled: bool) -> Result<(), PinnacleError>;

    fn is_enabled(&self) -> bool;
}

/// HW_DR connected to a GPIO, active high
pub struct DataReadyPin<P: InputPin + Wait> {
    pin: P,
    enabled: bool,
}

impl<P: InputPin + Wait> DataReadyPin<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, enabled: false }
    }
}

impl<P: InputPin + Wait> DataReady for DataReadyPin<P> {
    async fn wait(&mut self) {
        if !self.enabled {
            pending::<()>().await;
        }
        if self.pin.wait_for_high().await.is_err() {
            warn!("Pinnacle: waiting for HW_DR failed");
            // Don't spin on a broken pin
            Timer::after(Duration::from_millis(1)).await;
        }
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), PinnacleError> {
        self.enabled = enabled;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Notifications raised from an interrupt handler through a [`Signal`]
///
/// The signal keeps at most one pending notification, so an interrupt burst results in one pass.
pub struct DataReadySignal<'a, M: RawMutex> {
    signal: &'a Signal<M, ()>,
    enabled: bool,
}

impl<'a, M: RawMutex> DataReadySignal<'a, M> {
    pub fn new(signal: &'a Signal<M, ()>) -> Self {
        Self { signal, enabled: false }
    }
}

impl<'a, M: RawMutex> DataReady for DataReadySignal<'a, M> {
    async fn wait(&mut self) {
        if !self.enabled {
            pending::<()>().await;
        }
        self.signal.wait().await;
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), PinnacleError> {
        if enabled && !self.enabled {
            // Drop notifications raised while disabled
            self.signal.reset();
        }
        self.enabled = enabled;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// No HW_DR line, read STATUS1 periodically
pub struct DataReadyPolling {
    interval: Duration,
    enabled: bool,
}

impl DataReadyPolling {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            enabled: false,
        }
    }
}

impl DataReady for DataReadyPolling {
    async fn wait(&mut self) {
        if !self.enabled {
            pending::<()>().await;
        }
        Timer::after(self.interval).await;
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), PinnacleError> {
        self.enabled = enabled;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
