//! Pinnacle trackpad as an input device
use core::future::pending;

use embassy_time::{Duration, Instant, Timer};

use super::{InitState, InputDevice};
use crate::config::PinnacleConfig;
use crate::data_ready::DataReady;
use crate::driver::Pinnacle;
use crate::engine::MotionEngine;
use crate::error::PinnacleError;
use crate::event::{EventQueue, PinnacleEvent};
use crate::transport::PinnacleBus;

/// Events of one sample fit into the queue
pub const EVENT_QUEUE_SIZE: usize = 8;

const INIT_RETRY_DELAY: Duration = Duration::from_millis(100);
/// Wait after a data-ready notification which didn't yield a packet
pub const SKIPPED_PACKET_BACKOFF: Duration = Duration::from_millis(1);

/// PinnacleDevice an InputDevice which returns [`PinnacleEvent`]s
///
/// The sensor is initialized lazily by the first `read_event`. Each data-ready notification results
/// in one read of the motion packet, the decoded events are then returned one by one.
pub struct PinnacleDevice<B: PinnacleBus, D: DataReady> {
    pub sensor: Pinnacle<B, D>,
    pub engine: MotionEngine,
    pub init_state: InitState,
    pub id: u8,
    events: EventQueue<EVENT_QUEUE_SIZE>,
    last_init_error: Option<PinnacleError>,
}

impl<B: PinnacleBus, D: DataReady> PinnacleDevice<B, D> {
    pub const MAX_INIT_RETRIES: u8 = 3;

    pub fn new(bus: B, data_ready: D, config: PinnacleConfig, id: u8) -> Self {
        Self {
            engine: MotionEngine::new(&config),
            sensor: Pinnacle::new(bus, data_ready, config),
            init_state: InitState::Pending,
            id,
            events: EventQueue::new(),
            last_init_error: None,
        }
    }

    /// Why the last init attempt failed
    pub fn last_init_error(&self) -> Option<PinnacleError> {
        self.last_init_error
    }

    /// Run one init attempt, returns whether the sensor is ready
    pub async fn try_init(&mut self) -> bool {
        let attempt = match self.init_state {
            InitState::Ready => return true,
            InitState::Failed => return false,
            InitState::Pending => 0,
            InitState::Initializing(attempt) => attempt,
        };

        info!("Pinnacle {}: Initializing sensor (attempt {})", self.id, attempt + 1);
        let Err(e) = self.sensor.init().await else {
            info!("Pinnacle {}: Sensor ready", self.id);
            self.last_init_error = None;
            self.init_state = InitState::Ready;
            return true;
        };

        match e {
            PinnacleError::InvalidProductId(id) => {
                error!("Pinnacle {}: Firmware id {:#04x} is not a Pinnacle ASIC", self.id, id)
            }
            PinnacleError::ProtocolTimeout => {
                error!("Pinnacle {}: Sensor stayed busy during configuration", self.id)
            }
            PinnacleError::Transport => error!("Pinnacle {}: No response on the bus", self.id),
        }
        self.last_init_error = Some(e);

        let attempt = attempt + 1;
        if attempt >= Self::MAX_INIT_RETRIES {
            error!("Pinnacle {}: Giving up after {} attempts", self.id, attempt);
            self.init_state = InitState::Failed;
            return false;
        }
        self.init_state = InitState::Initializing(attempt);
        Timer::after(INIT_RETRY_DELAY).await;
        false
    }

    /// Read and process one motion packet, returns whether a packet was read
    pub async fn poll_once(&mut self) -> bool {
        match self.sensor.read_sample().await {
            Ok(Some(sample)) => {
                self.engine.process(sample, Instant::now(), &mut self.events);
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!("Pinnacle {}: Read motion error: {:?}", self.id, e);
                false
            }
        }
    }
}

impl<B: PinnacleBus, D: DataReady> InputDevice for PinnacleDevice<B, D> {
    type Event = PinnacleEvent;

    async fn read_event(&mut self) -> PinnacleEvent {
        loop {
            if let Some(event) = self.events.pop() {
                return event;
            }

            if self.init_state != InitState::Ready && !self.try_init().await {
                if self.init_state == InitState::Failed {
                    // The sensor is gone, never produce events
                    pending::<()>().await;
                }
                continue;
            }

            self.sensor.wait_data_ready().await;
            if !self.poll_once().await {
                // HW_DR stays asserted until a packet is acknowledged
                Timer::after(SKIPPED_PACKET_BACKOFF).await;
            }
        }
    }
}
