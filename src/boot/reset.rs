//! Platform reset causes.

/// Why the chip started executing.
///
/// Mirrors ESP-IDF's `esp_reset_reason_t`. Codes this firmware does not know
/// about are kept as [`ResetCause::Unknown`] rather than folded into a known
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResetCause {
    /// Power-on reset.
    PowerOn,
    /// Reset by an external pin.
    External,
    /// Software reset (`esp_restart`).
    Software,
    /// Reset after a panic or exception.
    Panic,
    /// Interrupt watchdog.
    InterruptWatchdog,
    /// Task watchdog.
    TaskWatchdog,
    /// Any other watchdog.
    OtherWatchdog,
    /// Wake from deep sleep.
    DeepSleepWake,
    /// Brownout reset.
    Brownout,
    /// Reset over SDIO.
    Sdio,
    /// Reset by the USB peripheral.
    Usb,
    /// Reset by JTAG.
    Jtag,
    /// eFuse error.
    Efuse,
    /// Power glitch detected.
    PowerGlitch,
    /// CPU lockup.
    CpuLockup,
    /// Unrecognized or unreported reason, with its raw code.
    Unknown(u32),
}

impl ResetCause {
    /// Map a raw `esp_reset_reason_t` value.
    pub fn from_raw(code: u32) -> Self {
        match code {
            1 => Self::PowerOn,
            2 => Self::External,
            3 => Self::Software,
            4 => Self::Panic,
            5 => Self::InterruptWatchdog,
            6 => Self::TaskWatchdog,
            7 => Self::OtherWatchdog,
            8 => Self::DeepSleepWake,
            9 => Self::Brownout,
            10 => Self::Sdio,
            11 => Self::Usb,
            12 => Self::Jtag,
            13 => Self::Efuse,
            14 => Self::PowerGlitch,
            15 => Self::CpuLockup,
            other => Self::Unknown(other),
        }
    }

    /// Whether the chip is running because a deep-sleep timer (or other wake
    /// source) fired.
    pub fn is_deep_sleep_wake(&self) -> bool {
        matches!(self, Self::DeepSleepWake)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(ResetCause::from_raw(1), ResetCause::PowerOn);
        assert_eq!(ResetCause::from_raw(3), ResetCause::Software);
        assert_eq!(ResetCause::from_raw(7), ResetCause::OtherWatchdog);
        assert_eq!(ResetCause::from_raw(8), ResetCause::DeepSleepWake);
        assert_eq!(ResetCause::from_raw(15), ResetCause::CpuLockup);
    }

    #[test]
    fn test_unknown_codes_are_preserved() {
        assert_eq!(ResetCause::from_raw(0), ResetCause::Unknown(0));
        assert_eq!(ResetCause::from_raw(16), ResetCause::Unknown(16));
        assert_eq!(ResetCause::from_raw(u32::MAX), ResetCause::Unknown(u32::MAX));
    }

    #[test]
    fn test_only_deep_sleep_code_is_wake() {
        let wakes: Vec<u32> = (0..=256)
            .chain([u32::MAX])
            .filter(|&code| ResetCause::from_raw(code).is_deep_sleep_wake())
            .collect();
        assert_eq!(wakes, vec![8]);
    }
}
