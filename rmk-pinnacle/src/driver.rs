//! Cirque Pinnacle sensor driver
//!
//! Talks to the Pinnacle ASIC through a [`PinnacleBus`], configures it for relative (2.2) packets and
//! reads one motion packet per data-ready notification.
use embassy_time::{Duration, Timer};

use crate::config::PinnacleConfig;
use crate::data_ready::DataReady;
use crate::error::PinnacleError;
use crate::packet::{FRAME_LEN, MotionSample, frame_ready};
use crate::registers::*;
use crate::transport::PinnacleBus;

/// Firmware id of the Pinnacle ASIC
const FIRMWARE_ID: u8 = 0x07;

pub struct Pinnacle<B: PinnacleBus, D: DataReady> {
    pub(crate) bus: B,
    pub(crate) data_ready: D,
    pub(crate) config: PinnacleConfig,
}

impl<B: PinnacleBus, D: DataReady> Pinnacle<B, D> {
    pub fn new(bus: B, data_ready: D, config: PinnacleConfig) -> Self {
        Self {
            bus,
            data_ready,
            config,
        }
    }

    pub fn config(&self) -> &PinnacleConfig {
        &self.config
    }

    /// Wait for the next data-ready notification
    pub async fn wait_data_ready(&mut self) {
        self.data_ready.wait().await
    }

    pub(crate) async fn read_reg(&mut self, reg: u8) -> Result<u8, PinnacleError> {
        let mut buf = [0u8; 1];
        self.bus.read(reg, &mut buf).await?;
        Ok(buf[0])
    }

    pub(crate) async fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), PinnacleError> {
        self.bus.write(reg, value).await
    }

    /// Acknowledge the current frame, HW_DR deasserts
    pub async fn clear_status(&mut self) -> Result<(), PinnacleError> {
        self.write_reg(STATUS1, 0).await
    }

    /// Reset and configure the sensor, data-ready notifications are enabled at the end
    pub async fn init(&mut self) -> Result<(), PinnacleError> {
        let mut fw = [0u8; 2];
        self.bus.read(FW_ID, &mut fw).await?;
        info!("Pinnacle: firmware id {:#04x}, version {:#04x}", fw[0], fw[1]);
        if fw[0] != FIRMWARE_ID {
            error!("Pinnacle: unexpected firmware id {:#04x}", fw[0]);
            return Err(PinnacleError::InvalidProductId(fw[0]));
        }

        Timer::after(Duration::from_millis(10)).await;
        self.clear_status().await?;

        self.write_reg(SYS_CFG, SYS_CFG_RESET).await?;
        Timer::after(Duration::from_millis(20)).await;

        self.write_reg(Z_IDLE, Z_IDLE_COUNT).await?;

        if let Err(e) = self.set_adc_sensitivity().await {
            warn!("Pinnacle: setting ADC sensitivity failed: {:?}", e);
        }
        if let Err(e) = self.tune_edge_sensitivity().await {
            warn!("Pinnacle: edge tuning failed: {:?}", e);
        }
        if let Err(e) = self.force_recalibrate().await {
            warn!("Pinnacle: recalibration failed: {:?}", e);
        }

        if self.config.sleep {
            self.set_sleep(true).await?;
        }

        let interval = self.read_reg(SLEEP_INTERVAL).await?;
        debug!("Pinnacle: sleep interval {}", interval);
        self.write_reg(SLEEP_INTERVAL, SLEEP_INTERVAL_MAX).await?;

        let feed2 = FeedConfig2::new()
            .with_intellimouse(true)
            .with_button_scroll(true)
            .with_disable_tap(self.config.no_taps)
            .with_disable_secondary_tap(self.config.no_secondary_tap)
            .with_rotate_90(self.config.rotate_90);
        self.write_reg(FEED_CFG2, feed2.into_bits()).await?;

        let feed1 = FeedConfig1::new()
            .with_feed_enable(true)
            .with_invert_x(self.config.invert_x)
            .with_invert_y(self.config.invert_y);
        self.write_reg(FEED_CFG1, feed1.into_bits()).await?;

        self.clear_status().await?;
        self.data_ready.set_enabled(true)?;

        info!("Pinnacle: initialized");
        Ok(())
    }

    /// Apply the configured tracking ADC gain, the other bits of the ADC config are kept
    async fn set_adc_sensitivity(&mut self) -> Result<(), PinnacleError> {
        let current = self.era_read(ERA_TRACKING_ADC_CONFIG).await?;
        let value = (current & TRACKING_ADC_CONFIG_KEEP_MASK) | self.config.sensitivity.adc_config_bits();
        self.era_write(ERA_TRACKING_ADC_CONFIG, value).await?;

        let readback = self.era_read(ERA_TRACKING_ADC_CONFIG).await?;
        debug!("Pinnacle: tracking ADC config {:#04x} -> {:#04x}", current, readback);
        Ok(())
    }

    /// Lower the z-min thresholds so that touches close to the edges are tracked
    async fn tune_edge_sensitivity(&mut self) -> Result<(), PinnacleError> {
        let x = self.era_read(ERA_X_AXIS_WIDE_Z_MIN).await?;
        let y = self.era_read(ERA_Y_AXIS_WIDE_Z_MIN).await?;
        debug!("Pinnacle: z-min x {}, y {}", x, y);

        self.era_write(ERA_X_AXIS_WIDE_Z_MIN, self.config.x_axis_z_min).await?;
        self.era_write(ERA_Y_AXIS_WIDE_Z_MIN, self.config.y_axis_z_min).await
    }

    /// Start a calibration and wait until the sensor clears the calibrate bit
    async fn force_recalibrate(&mut self) -> Result<(), PinnacleError> {
        let cal = self.read_reg(CAL_CFG).await?;
        self.write_reg(CAL_CFG, cal | CAL_CFG_CALIBRATE).await?;

        for _ in 0..self.config.era.max_polls {
            if self.read_reg(CAL_CFG).await? & CAL_CFG_CALIBRATE == 0 {
                return self.clear_status().await;
            }
            Timer::after(self.config.era.poll_interval).await;
        }
        Err(PinnacleError::ProtocolTimeout)
    }

    /// Enable or disable the sensor's own sleep mode
    pub async fn set_sleep(&mut self, enabled: bool) -> Result<(), PinnacleError> {
        let sys_cfg = self.read_reg(SYS_CFG).await?;
        if (sys_cfg & SYS_CFG_EN_SLEEP != 0) == enabled {
            return Ok(());
        }
        let sys_cfg = if enabled {
            sys_cfg | SYS_CFG_EN_SLEEP
        } else {
            sys_cfg & !SYS_CFG_EN_SLEEP
        };
        self.write_reg(SYS_CFG, sys_cfg).await
    }

    /// Stop data-ready notifications
    pub fn suspend(&mut self) -> Result<(), PinnacleError> {
        self.data_ready.set_enabled(false)
    }

    pub fn resume(&mut self) -> Result<(), PinnacleError> {
        self.data_ready.set_enabled(true)
    }

    /// Read the pending motion packet, `None` if the sensor has no packet
    pub async fn read_sample(&mut self) -> Result<Option<MotionSample>, PinnacleError> {
        let status = self.read_reg(STATUS1).await?;
        if !frame_ready(status) {
            trace!("Pinnacle: no frame, status {:#04x}", status);
            return Ok(None);
        }

        let mut frame = [0u8; FRAME_LEN];
        self.bus.read(PACKET0, &mut frame).await?;
        self.clear_status().await?;

        debug!("Pinnacle: frame {:?}", frame);
        Ok(Some(MotionSample::decode(&frame)))
    }
}
