//! Extended register access
//!
//! Registers above 0x1F are reached indirectly: the address goes to ERA_HIGH_BYTE/ERA_LOW_BYTE, a
//! direction code to ERA_CONTROL, and the sensor clears ERA_CONTROL when the access is done. The
//! data-ready interrupt is disabled for the whole transaction and restored afterwards.
use embassy_time::Timer;

use crate::data_ready::DataReady;
use crate::driver::Pinnacle;
use crate::error::PinnacleError;
use crate::registers::*;
use crate::transport::PinnacleBus;

impl<B: PinnacleBus, D: DataReady> Pinnacle<B, D> {
    /// Read one extended register
    pub async fn era_read(&mut self, address: u16) -> Result<u8, PinnacleError> {
        let enabled = self.data_ready.is_enabled();
        self.data_ready.set_enabled(false)?;
        let result = self.era_read_inner(address).await;
        self.finish_era(enabled, result)
    }

    /// Write one extended register
    pub async fn era_write(&mut self, address: u16, value: u8) -> Result<(), PinnacleError> {
        let enabled = self.data_ready.is_enabled();
        self.data_ready.set_enabled(false)?;
        let result = self.era_write_inner(address, value).await;
        self.finish_era(enabled, result)
    }

    async fn era_read_inner(&mut self, address: u16) -> Result<u8, PinnacleError> {
        self.start_era(address, ERA_CONTROL_READ).await?;
        let value = self.read_reg(ERA_VALUE).await?;
        self.clear_status().await?;
        Ok(value)
    }

    async fn era_write_inner(&mut self, address: u16, value: u8) -> Result<(), PinnacleError> {
        self.write_reg(ERA_VALUE, value).await?;
        self.start_era(address, ERA_CONTROL_WRITE).await?;
        self.clear_status().await
    }

    /// Send the address and the direction, then wait until the sensor is done
    async fn start_era(&mut self, address: u16, direction: u8) -> Result<(), PinnacleError> {
        let [high, low] = address.to_be_bytes();
        self.write_reg(ERA_HIGH_BYTE, high).await?;
        self.write_reg(ERA_LOW_BYTE, low).await?;
        self.write_reg(ERA_CONTROL, direction).await?;

        let era = self.config.era;
        for _ in 0..era.max_polls {
            if self.read_reg(ERA_CONTROL).await? == 0 {
                return Ok(());
            }
            Timer::after(era.poll_interval).await;
        }

        error!("Pinnacle: ERA access to {:#06x} timed out", address);
        Err(PinnacleError::ProtocolTimeout)
    }

    /// Put the interrupt back into its state before the transaction, whatever the result is
    fn finish_era<T>(&mut self, enabled: bool, result: Result<T, PinnacleError>) -> Result<T, PinnacleError> {
        let restored = self.data_ready.set_enabled(enabled);
        let value = result?;
        restored?;
        Ok(value)
    }
}
