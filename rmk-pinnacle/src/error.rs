//! Errors of the Pinnacle driver

/// Errors of the Pinnacle sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinnacleError {
    /// A primitive register read/write failed on the bus
    Transport,
    /// The sensor didn't finish a polled operation within the configured budget
    ProtocolTimeout,
    /// Unknown firmware id
    InvalidProductId(u8),
}
