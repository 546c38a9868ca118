//! Cirque Pinnacle register map
//!
//! Register addresses and bit layouts of the Pinnacle ASIC (GlidePoint firmware 0x07).
use bitfield_struct::bitfield;

// ============================================================================
// Bus command prefixes
// ============================================================================
pub(crate) const READ: u8 = 0xA0;
pub(crate) const WRITE: u8 = 0x80;
/// SPI filler byte clocked out while reading with auto-increment
pub(crate) const AUTOINC: u8 = 0xFC;
/// SPI filler byte returned by the sensor during a write
pub(crate) const FILLER: u8 = 0xFB;

// ============================================================================
// Register access protocol registers
// ============================================================================
pub(crate) const FW_ID: u8 = 0x00;
pub(crate) const STATUS1: u8 = 0x02;
pub(crate) const SYS_CFG: u8 = 0x03;
pub(crate) const FEED_CFG1: u8 = 0x04;
pub(crate) const FEED_CFG2: u8 = 0x05;
pub(crate) const CAL_CFG: u8 = 0x07;
pub(crate) const Z_IDLE: u8 = 0x0A;
pub(crate) const SLEEP_INTERVAL: u8 = 0x0C;
/// First byte of the relative (2.2) motion packet
pub(crate) const PACKET0: u8 = 0x12;
pub(crate) const ERA_VALUE: u8 = 0x1B;
pub(crate) const ERA_HIGH_BYTE: u8 = 0x1C;
pub(crate) const ERA_LOW_BYTE: u8 = 0x1D;
pub(crate) const ERA_CONTROL: u8 = 0x1E;

// ============================================================================
// Register values
// ============================================================================
pub(crate) const STATUS1_SW_DR: u8 = 1 << 2;
/// STATUS1 reads back all ones when the bus is not talking to a sensor
pub(crate) const STATUS1_COMM_FAILURE: u8 = 0xFF;
pub(crate) const SYS_CFG_RESET: u8 = 1 << 0;
pub(crate) const SYS_CFG_EN_SLEEP: u8 = 1 << 2;
pub(crate) const CAL_CFG_CALIBRATE: u8 = 1 << 0;
pub(crate) const ERA_CONTROL_READ: u8 = 0x01;
pub(crate) const ERA_CONTROL_WRITE: u8 = 0x02;
/// Disable Z-idle packets
pub(crate) const Z_IDLE_COUNT: u8 = 0x05;
pub(crate) const SLEEP_INTERVAL_MAX: u8 = 0xFF;

// ============================================================================
// Extended registers, reached through ERA
// ============================================================================
pub(crate) const ERA_X_AXIS_WIDE_Z_MIN: u16 = 0x0149;
pub(crate) const ERA_Y_AXIS_WIDE_Z_MIN: u16 = 0x0168;
pub(crate) const ERA_TRACKING_ADC_CONFIG: u16 = 0x0187;
/// Bits of the tracking ADC config which are not the gain
pub(crate) const TRACKING_ADC_CONFIG_KEEP_MASK: u8 = 0x3F;

/// The first byte of a relative motion packet
#[bitfield(u8, defmt = cfg(feature = "defmt"))]
#[derive(PartialEq, Eq)]
pub(crate) struct PacketStatus {
    #[bits(1)]
    pub btn_primary: bool,
    #[bits(1)]
    pub btn_secondary: bool,
    #[bits(1)]
    pub btn_aux: bool,
    #[bits(1)]
    _always_set: bool,
    #[bits(1)]
    pub x_sign: bool,
    #[bits(1)]
    pub y_sign: bool,
    #[bits(2)]
    _unused: u8,
}

impl PacketStatus {
    pub(crate) const BUTTON_MASK: u8 = 0b0000_0111;

    pub(crate) fn buttons(&self) -> u8 {
        self.into_bits() & Self::BUTTON_MASK
    }
}

/// FEED_CFG1 register
#[bitfield(u8, defmt = cfg(feature = "defmt"))]
#[derive(PartialEq, Eq)]
pub(crate) struct FeedConfig1 {
    #[bits(1)]
    pub feed_enable: bool,
    #[bits(1)]
    pub absolute_mode: bool,
    #[bits(1)]
    pub disable_filter: bool,
    #[bits(1)]
    pub disable_x: bool,
    #[bits(1)]
    pub disable_y: bool,
    #[bits(1)]
    _reserved: bool,
    #[bits(1)]
    pub invert_x: bool,
    #[bits(1)]
    pub invert_y: bool,
}

/// FEED_CFG2 register
#[bitfield(u8, defmt = cfg(feature = "defmt"))]
#[derive(PartialEq, Eq)]
pub(crate) struct FeedConfig2 {
    #[bits(1)]
    pub intellimouse: bool,
    #[bits(1)]
    pub disable_tap: bool,
    #[bits(1)]
    pub disable_secondary_tap: bool,
    #[bits(1)]
    pub disable_scroll: bool,
    #[bits(1)]
    pub disable_glide_extend: bool,
    #[bits(1)]
    _reserved: bool,
    #[bits(1)]
    pub button_scroll: bool,
    #[bits(1)]
    pub rotate_90: bool,
}
