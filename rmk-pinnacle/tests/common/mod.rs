#![allow(dead_code)]

pub mod fake_sensor;

use core::future::Future;

use embassy_futures::select::{Either, select};
use embassy_futures::yield_now;
use embassy_time::{Duration, Instant, MockDriver};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Mock time advanced between two polls of the future under test
const CLOCK_STEP: Duration = Duration::from_micros(20);
/// A future which doesn't finish within this mock time is considered stuck
const MAX_TEST_DURATION: Duration = Duration::from_secs(10);

/// Run `fut` to completion, advancing the mock clock whenever it is pending.
///
/// Panics if `fut` doesn't finish within [`MAX_TEST_DURATION`] of mock time.
pub fn block_on<F: Future>(fut: F) -> F::Output {
    let clock = async {
        let start = Instant::now();
        loop {
            assert!(
                start.elapsed() < MAX_TEST_DURATION,
                "future didn't finish within {}ms",
                MAX_TEST_DURATION.as_millis()
            );
            MockDriver::get().advance(CLOCK_STEP);
            yield_now().await;
        }
    };

    match embassy_futures::block_on(select(fut, clock)) {
        Either::First(output) => output,
        Either::Second(_) => unreachable!(),
    }
}

/// Encode a relative motion packet the way the sensor sends it
pub fn frame(buttons: u8, dx: i8, dy: i8) -> [u8; 3] {
    let mut status = 0x08 | (buttons & 0x07);
    if dx < 0 {
        status |= 0x10;
    }
    if dy < 0 {
        status |= 0x20;
    }
    [status, dx as u8, dy as u8]
}
