//! ESP-IDF reset cause and deep sleep.

use super::ResetCause;
use crate::config::duration_to_us;
use log::info;
use std::time::Duration;

/// Read the reason for the current boot.
pub fn reset_cause() -> ResetCause {
    let raw = unsafe { esp_idf_sys::esp_reset_reason() };
    ResetCause::from_raw(raw as u32)
}

/// Power down into timer-woken deep sleep.
///
/// Never returns: the chip reboots once `duration` has elapsed and the
/// firmware starts again from `main`.
#[allow(unreachable_code)]
pub fn enter_deep_sleep(duration: Duration) -> ! {
    info!("Entering deep sleep for {} ms", duration.as_millis());
    unsafe { esp_idf_sys::esp_deep_sleep(duration_to_us(duration)) };
    unreachable!("esp_deep_sleep returned");
}

#[cfg(feature = "tap-tests")]
mod tap_tests {
    use super::*;
    use esp32_lowpower_macros::tap_test;

    #[tap_test]
    fn reset_codes_match_idf() {
        use esp_idf_sys as sys;

        let cases = [
            (sys::esp_reset_reason_t_ESP_RST_UNKNOWN, ResetCause::Unknown(0)),
            (sys::esp_reset_reason_t_ESP_RST_POWERON, ResetCause::PowerOn),
            (sys::esp_reset_reason_t_ESP_RST_EXT, ResetCause::External),
            (sys::esp_reset_reason_t_ESP_RST_SW, ResetCause::Software),
            (sys::esp_reset_reason_t_ESP_RST_PANIC, ResetCause::Panic),
            (sys::esp_reset_reason_t_ESP_RST_INT_WDT, ResetCause::InterruptWatchdog),
            (sys::esp_reset_reason_t_ESP_RST_TASK_WDT, ResetCause::TaskWatchdog),
            (sys::esp_reset_reason_t_ESP_RST_WDT, ResetCause::OtherWatchdog),
            (sys::esp_reset_reason_t_ESP_RST_DEEPSLEEP, ResetCause::DeepSleepWake),
            (sys::esp_reset_reason_t_ESP_RST_BROWNOUT, ResetCause::Brownout),
            (sys::esp_reset_reason_t_ESP_RST_SDIO, ResetCause::Sdio),
            (sys::esp_reset_reason_t_ESP_RST_USB, ResetCause::Usb),
            (sys::esp_reset_reason_t_ESP_RST_JTAG, ResetCause::Jtag),
            (sys::esp_reset_reason_t_ESP_RST_EFUSE, ResetCause::Efuse),
            (sys::esp_reset_reason_t_ESP_RST_PWR_GLITCH, ResetCause::PowerGlitch),
            (sys::esp_reset_reason_t_ESP_RST_CPU_LOCKUP, ResetCause::CpuLockup),
        ];

        for (raw, expected) in cases {
            assert_eq!(ResetCause::from_raw(raw as u32), expected);
        }
    }

    #[tap_test]
    fn load_switch_pin_matches_config() {
        use crate::config::BOOT_PIN_GPIO;
        use esp_idf_hal::gpio::{Gpio18, Pin};

        let pin = unsafe { Gpio18::new() };
        assert_eq!(pin.pin() as i64, i64::from(BOOT_PIN_GPIO));
    }

    #[tap_test]
    fn reset_cause_is_readable() {
        let cause = reset_cause();
        log::info!("Current reset cause: {:?}", cause);
    }
}
