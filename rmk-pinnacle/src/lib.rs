//! # rmk-pinnacle
//!
//! Driver and motion engine for Cirque Pinnacle (GlidePoint) trackpads.
//!
//! The sensor is reached over I2C or SPI. Each relative motion packet is decoded into buttons and
//! X/Y deltas, then either shaped by the sigmoid acceleration curve or consumed by the circular
//! scroll gesture, and finally emitted as [`PinnacleEvent`]s.
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
pub(crate) mod fmt;

pub mod acceleration;
pub mod circular_scroll;
pub mod config;
pub mod data_ready;
pub mod driver;
pub mod engine;
mod era;
pub mod error;
pub mod event;
pub mod input_device;
pub mod packet;
pub(crate) mod registers;
pub mod transport;

pub use config::{AccelerationConfig, CircularScrollConfig, EraConfig, PinnacleConfig, Sensitivity};
pub use data_ready::{DataReady, DataReadyPin, DataReadyPolling, DataReadySignal};
pub use driver::Pinnacle;
pub use error::PinnacleError;
pub use event::{EventQueue, EventSink, PinnacleEvent};
pub use input_device::pinnacle::PinnacleDevice;
pub use input_device::{InitState, InputDevice};
pub use transport::{PinnacleBus, PinnacleI2c, PinnacleSpi};
