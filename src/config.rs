//! Compile-time firmware configuration.
//!
//! Neither program reads configuration at runtime: no NVS keys, no files, no
//! environment. Everything that can be tuned lives here.

use std::time::Duration;

// ==================== Power-cycle loop ====================

/// How long each power-management preset stays applied before the next one.
pub const PM_DWELL: Duration = Duration::from_secs(2);

// ==================== Boot-time pin toggle ====================

/// GPIO driving the external load switch.
///
/// The ESP32 build opens this pin as `pins.gpio18`; `boot-pin` asserts at
/// compile time that the two agree.
pub const BOOT_PIN_GPIO: u8 = 18;

/// Time the load switch gets to settle between the pin going low and the
/// chip powering down.
pub const PIN_SETTLE: Duration = Duration::from_millis(1);

/// Deep-sleep duration requested after a deep-sleep wake.
pub const DEEP_SLEEP_DURATION: Duration = Duration::from_millis(1000);

/// Convert a duration to whole milliseconds for `DelayNs::delay_ms`,
/// saturating at `u32::MAX`.
pub fn duration_to_ms(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

/// Convert a duration to whole microseconds, saturating at `u64::MAX`.
pub fn duration_to_us(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dwell_is_two_seconds() {
        assert_eq!(PM_DWELL, Duration::from_millis(2000));
    }

    #[test]
    fn test_boot_timings() {
        assert_eq!(BOOT_PIN_GPIO, 18);
        assert_eq!(duration_to_ms(PIN_SETTLE), 1);
        assert_eq!(duration_to_ms(DEEP_SLEEP_DURATION), 1000);
        assert_eq!(duration_to_us(DEEP_SLEEP_DURATION), 1_000_000);
    }

    #[test]
    fn test_duration_conversion_saturates() {
        assert_eq!(duration_to_ms(Duration::from_secs(u64::MAX)), u32::MAX);
        assert_eq!(duration_to_us(Duration::MAX), u64::MAX);
    }
}
