//! Relative motion packet decoding
use crate::registers::{PacketStatus, STATUS1_COMM_FAILURE, STATUS1_SW_DR};

/// Length of a relative motion packet: status, X magnitude, Y magnitude
pub const FRAME_LEN: usize = 3;

/// One decoded relative motion packet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionSample {
    /// Primary, secondary and auxiliary button in bit 0, 1 and 2
    pub buttons: u8,
    pub dx: i8,
    pub dy: i8,
}

impl MotionSample {
    pub fn decode(frame: &[u8; FRAME_LEN]) -> Self {
        let status = PacketStatus::from_bits(frame[0]);
        Self {
            buttons: status.buttons(),
            dx: signed_delta(frame[1], status.x_sign()),
            dy: signed_delta(frame[2], status.y_sign()),
        }
    }
}

/// Whether STATUS1 announces a packet.
///
/// All ones means the bus isn't talking to the sensor, which is skipped like a missing data-ready bit.
pub fn frame_ready(status1: u8) -> bool {
    status1 != STATUS1_COMM_FAILURE && status1 & STATUS1_SW_DR != 0
}

/// The sensor sends the sign of each axis in the status byte, force it into bit 7 of the delta
fn signed_delta(delta: u8, negative: bool) -> i8 {
    if negative { (delta | 0x80) as i8 } else { delta as i8 }
}
