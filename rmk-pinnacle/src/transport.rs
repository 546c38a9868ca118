//! Register transports of the Pinnacle sensor
//!
//! The sensor exposes the same register protocol over I2C and SPI. [`PinnacleBus`] abstracts the two
//! primitives the driver needs: reading N consecutive registers and writing a single register.
use embassy_time::{Duration, Timer};
use embedded_hal_async::i2c::I2c;
use embedded_hal_async::spi::SpiDevice;

use crate::error::PinnacleError;
use crate::registers::{AUTOINC, FILLER, READ, WRITE};

/// Default 7-bit I2C address of the sensor
pub const DEFAULT_I2C_ADDRESS: u8 = 0x2A;

/// Bytes clocked before read data arrives on SPI: the command plus two fillers
const SPI_READ_HEADER_LEN: usize = 3;
/// Longest consecutive read the driver performs
const SPI_MAX_READ_LEN: usize = 8;
/// Settle time after an SPI register write
const SPI_WRITE_DELAY_US: u64 = 50;

/// Primitive register access of the sensor
pub trait PinnacleBus {
    /// Read `buf.len()` consecutive registers starting from `reg`
    async fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), PinnacleError>;

    /// Write a single register
    async fn write(&mut self, reg: u8, value: u8) -> Result<(), PinnacleError>;
}

/// Pinnacle connected over I2C
pub struct PinnacleI2c<I2C: I2c> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> PinnacleI2c<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_I2C_ADDRESS)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }
}

impl<I2C: I2c> PinnacleBus for PinnacleI2c<I2C> {
    async fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), PinnacleError> {
        self.i2c
            .write_read(self.address, &[READ | reg], buf)
            .await
            .map_err(|_| PinnacleError::Transport)
    }

    async fn write(&mut self, reg: u8, value: u8) -> Result<(), PinnacleError> {
        self.i2c
            .write(self.address, &[WRITE | reg, value])
            .await
            .map_err(|_| PinnacleError::Transport)
    }
}

/// Pinnacle connected over SPI, mode 1
pub struct PinnacleSpi<SPI: SpiDevice> {
    spi: SPI,
}

impl<SPI: SpiDevice> PinnacleSpi<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }
}

impl<SPI: SpiDevice> PinnacleBus for PinnacleSpi<SPI> {
    async fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), PinnacleError> {
        if buf.len() > SPI_MAX_READ_LEN {
            error!("Pinnacle: SPI read of {} bytes is too long", buf.len());
            return Err(PinnacleError::Transport);
        }

        let len = buf.len() + SPI_READ_HEADER_LEN;
        let mut frame = [AUTOINC; SPI_READ_HEADER_LEN + SPI_MAX_READ_LEN];
        frame[0] = READ | reg;

        self.spi
            .transfer_in_place(&mut frame[..len])
            .await
            .map_err(|_| PinnacleError::Transport)?;

        buf.copy_from_slice(&frame[SPI_READ_HEADER_LEN..len]);
        Ok(())
    }

    async fn write(&mut self, reg: u8, value: u8) -> Result<(), PinnacleError> {
        let mut frame = [WRITE | reg, value];
        self.spi.transfer_in_place(&mut frame).await.map_err(|_| {
            error!("Pinnacle: SPI write to {:#04x} failed", reg);
            PinnacleError::Transport
        })?;

        if frame[1] != FILLER {
            error!("Pinnacle: bad SPI write response {:#04x} {:#04x}", frame[0], frame[1]);
            return Err(PinnacleError::Transport);
        }

        Timer::after(Duration::from_micros(SPI_WRITE_DELAY_US)).await;
        Ok(())
    }
}
