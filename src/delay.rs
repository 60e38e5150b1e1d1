//! Blocking delays.
//!
//! All timed waits go through [`embedded_hal::delay::DelayNs`]. On the chip the
//! binaries pass `esp_idf_hal::delay::FreeRtos` (long waits) or
//! `esp_idf_hal::delay::Ets` (sub-tick waits); on the host they pass
//! [`StdDelay`].

use embedded_hal::delay::DelayNs;
use std::time::Duration;

/// Delay backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(ns.into()));
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(Duration::from_micros(us.into()));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms.into()));
    }
}

/// Delay that returns immediately and remembers every requested wait.
#[cfg(any(test, feature = "tap-tests"))]
#[derive(Debug, Default)]
pub struct RecordingDelay {
    waits: Vec<Duration>,
}

#[cfg(any(test, feature = "tap-tests"))]
impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every wait requested so far, in order.
    pub fn waits(&self) -> &[Duration] {
        &self.waits
    }

    /// Sum of all requested waits.
    pub fn total(&self) -> Duration {
        self.waits.iter().sum()
    }
}

#[cfg(any(test, feature = "tap-tests"))]
impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waits.push(Duration::from_nanos(ns.into()));
    }

    fn delay_us(&mut self, us: u32) {
        self.waits.push(Duration::from_micros(us.into()));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.waits.push(Duration::from_millis(ms.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_std_delay_waits_at_least_requested() {
        let start = Instant::now();
        StdDelay.delay_ms(5);
        assert!(start.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn test_recording_delay_keeps_order() {
        let mut delay = RecordingDelay::new();
        delay.delay_ms(2000);
        delay.delay_us(1000);
        assert_eq!(
            delay.waits(),
            &[Duration::from_secs(2), Duration::from_millis(1)]
        );
        assert_eq!(delay.total(), Duration::from_millis(2001));
    }
}
