//! An emulated Pinnacle ASIC behind the `PinnacleBus` and `DataReady` traits
use core::future::pending;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use rmk_pinnacle::{DataReady, PinnacleBus, PinnacleError};

pub const FW_ID: u8 = 0x00;
pub const STATUS1: u8 = 0x02;
pub const SYS_CFG: u8 = 0x03;
pub const FEED_CFG1: u8 = 0x04;
pub const FEED_CFG2: u8 = 0x05;
pub const CAL_CFG: u8 = 0x07;
pub const Z_IDLE: u8 = 0x0A;
pub const SLEEP_INTERVAL: u8 = 0x0C;
pub const PACKET0: u8 = 0x12;
pub const ERA_VALUE: u8 = 0x1B;
pub const ERA_HIGH_BYTE: u8 = 0x1C;
pub const ERA_LOW_BYTE: u8 = 0x1D;
pub const ERA_CONTROL: u8 = 0x1E;

const SW_DR: u8 = 0x04;

/// Everything that happened on the bus and on the interrupt line, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read(u8),
    Write(u8, u8),
    Interrupt(bool),
}

pub struct SensorState {
    pub regs: [u8; 0x20],
    pub era: Vec<u8>,
    /// Reads of ERA_CONTROL which still report busy after an access is started
    pub era_busy_polls: u32,
    era_busy_left: u32,
    /// Writes to this register fail
    pub fail_write: Option<u8>,
    /// Reads of this register fail
    pub fail_read: Option<u8>,
    /// The calibrate bit of CAL_CFG never clears
    pub calibration_stuck: bool,
    pub frames: VecDeque<[u8; 3]>,
    pub interrupt_enabled: bool,
    pub log: Vec<Access>,
}

impl SensorState {
    fn new() -> Self {
        let mut regs = [0u8; 0x20];
        regs[FW_ID as usize] = 0x07;
        regs[FW_ID as usize + 1] = 0x3A;
        regs[SLEEP_INTERVAL as usize] = 0x49;
        Self {
            regs,
            era: vec![0; 0x1_0000],
            era_busy_polls: 0,
            era_busy_left: 0,
            fail_write: None,
            fail_read: None,
            calibration_stuck: false,
            frames: VecDeque::new(),
            interrupt_enabled: false,
            log: Vec::new(),
        }
    }

    fn has_frame(&self) -> bool {
        self.regs[STATUS1 as usize] & SW_DR != 0 || !self.frames.is_empty()
    }

    fn era_address(&self) -> usize {
        u16::from_be_bytes([self.regs[ERA_HIGH_BYTE as usize], self.regs[ERA_LOW_BYTE as usize]]) as usize
    }

    fn read(&mut self, reg: u8) -> u8 {
        match reg {
            STATUS1 if self.regs[STATUS1 as usize] & SW_DR == 0 => {
                if let Some(frame) = self.frames.pop_front() {
                    let packet = PACKET0 as usize;
                    self.regs[packet..packet + 3].copy_from_slice(&frame);
                    self.regs[STATUS1 as usize] |= SW_DR;
                }
            }
            ERA_CONTROL => {
                if self.era_busy_left > 0 {
                    self.era_busy_left -= 1;
                } else {
                    self.regs[ERA_CONTROL as usize] = 0;
                }
            }
            CAL_CFG => {
                // Calibration takes one poll
                let value = self.regs[CAL_CFG as usize];
                if !self.calibration_stuck {
                    self.regs[CAL_CFG as usize] &= !0x01;
                }
                return value;
            }
            _ => {}
        }
        self.regs[reg as usize]
    }

    fn write(&mut self, reg: u8, value: u8) {
        match reg {
            SYS_CFG if value & 0x01 != 0 => {
                // Reset
                self.regs[SYS_CFG as usize] = 0;
                return;
            }
            ERA_CONTROL => {
                let address = self.era_address();
                if value & 0x01 != 0 {
                    self.regs[ERA_VALUE as usize] = self.era[address];
                }
                if value & 0x02 != 0 {
                    self.era[address] = self.regs[ERA_VALUE as usize];
                }
                self.era_busy_left = self.era_busy_polls;
            }
            _ => {}
        }
        self.regs[reg as usize] = value;
    }
}

/// Shared handle to the emulated sensor
#[derive(Clone)]
pub struct FakeSensor(Rc<RefCell<SensorState>>);

impl FakeSensor {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(SensorState::new())))
    }

    pub fn state(&self) -> std::cell::RefMut<'_, SensorState> {
        self.0.borrow_mut()
    }

    pub fn bus(&self) -> FakeBus {
        FakeBus(self.0.clone())
    }

    pub fn data_ready(&self) -> FakeDataReady {
        FakeDataReady(self.0.clone())
    }

    pub fn push_frame(&self, frame: [u8; 3]) {
        self.state().frames.push_back(frame);
    }

    pub fn take_log(&self) -> Vec<Access> {
        core::mem::take(&mut self.state().log)
    }

    pub fn reg(&self, reg: u8) -> u8 {
        self.state().regs[reg as usize]
    }

    pub fn era(&self, address: u16) -> u8 {
        self.state().era[address as usize]
    }
}

pub struct FakeBus(Rc<RefCell<SensorState>>);

impl PinnacleBus for FakeBus {
    async fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), PinnacleError> {
        let mut state = self.0.borrow_mut();
        state.log.push(Access::Read(reg));
        if state.fail_read == Some(reg) {
            return Err(PinnacleError::Transport);
        }
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = state.read(reg + i as u8);
        }
        Ok(())
    }

    async fn write(&mut self, reg: u8, value: u8) -> Result<(), PinnacleError> {
        let mut state = self.0.borrow_mut();
        state.log.push(Access::Write(reg, value));
        if state.fail_write == Some(reg) {
            return Err(PinnacleError::Transport);
        }
        state.write(reg, value);
        Ok(())
    }
}

/// HW_DR of the emulated sensor, asserted while a frame is pending
pub struct FakeDataReady(Rc<RefCell<SensorState>>);

impl DataReady for FakeDataReady {
    async fn wait(&mut self) {
        let ready = {
            let state = self.0.borrow();
            state.interrupt_enabled && state.has_frame()
        };
        if !ready {
            pending::<()>().await;
        }
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), PinnacleError> {
        let mut state = self.0.borrow_mut();
        state.interrupt_enabled = enabled;
        state.log.push(Access::Interrupt(enabled));
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.0.borrow().interrupt_enabled
    }
}
