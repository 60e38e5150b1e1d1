//! ESP-NOW radio driver wrapper.
//!
//! Brings up the Wi-Fi station interface (started but never associated) and
//! ESP-NOW on top of it, then exposes ESP-NOW power saving through
//! [`PowerManagement`].

use super::{PmPreset, PowerManagement, RadioError};
use esp_idf_hal::modem::Modem;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::espnow::EspNow;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use esp_idf_sys::esp;
use log::{debug, info};

/// Owned handle to the station interface and the ESP-NOW interface.
pub struct EspNowRadio<'a> {
    // Dropped first: ESP-NOW must be deinitialized while Wi-Fi is still running.
    _espnow: EspNow<'static>,
    wifi: BlockingWifi<EspWifi<'a>>,
}

impl<'a> EspNowRadio<'a> {
    /// Activate the station interface, then ESP-NOW.
    ///
    /// # Arguments
    ///
    /// * `modem` - The WiFi/BT modem peripheral
    /// * `sysloop` - The ESP-IDF system event loop
    /// * `nvs` - Default NVS partition for the Wi-Fi driver's calibration data
    pub fn new(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
    ) -> Result<Self, RadioError> {
        let esp_wifi = EspWifi::new(modem, sysloop.clone(), nvs)?;
        let mut wifi = BlockingWifi::wrap(esp_wifi, sysloop)?;

        wifi.set_configuration(&Configuration::Client(ClientConfiguration::default()))?;
        wifi.start()?;
        info!("Wi-Fi station interface active");

        let espnow = EspNow::take()?;
        info!("ESP-NOW interface active");

        Ok(Self {
            _espnow: espnow,
            wifi,
        })
    }

    /// Check if the station interface is running.
    pub fn is_active(&self) -> Result<bool, RadioError> {
        Ok(self.wifi.is_started()?)
    }
}

impl PowerManagement for EspNowRadio<'_> {
    fn apply_preset(&mut self, preset: PmPreset) -> Result<(), RadioError> {
        if !self.is_active()? {
            return Err(RadioError::Inactive);
        }

        esp!(unsafe { esp_idf_sys::esp_now_set_wake_window(preset.wake_window_ms) })?;
        esp!(unsafe {
            esp_idf_sys::esp_wifi_connectionless_module_set_wake_interval(preset.wake_interval_ms)
        })?;

        debug!("ESP-NOW power management set: {}", preset);
        Ok(())
    }
}

#[cfg(feature = "tap-tests")]
mod tap_tests {
    use super::*;
    use crate::power::PM_PRESETS;
    use crate::testing::TestResult;
    use esp32_lowpower_macros::tap_test;

    fn activate() -> Result<EspNowRadio<'static>, RadioError> {
        // The test binary never takes `Peripherals`, so the modem is free here.
        let modem = unsafe { Modem::new() };
        let sysloop = EspSystemEventLoop::take()?;
        let nvs = EspDefaultNvsPartition::take()?;
        EspNowRadio::new(modem, sysloop, Some(nvs))
    }

    #[tap_test]
    fn radio_accepts_every_preset() -> TestResult {
        let mut radio = activate()?;
        assert!(radio.is_active()?);

        for preset in PM_PRESETS {
            radio.apply_preset(preset)?;
        }
        Ok(())
    }

    #[tap_test]
    fn radio_reactivates_after_drop() -> TestResult {
        let mut radio = activate()?;
        radio.apply_preset(PM_PRESETS[0])?;
        drop(radio);

        let mut radio = activate()?;
        radio.apply_preset(PM_PRESETS[4])?;
        Ok(())
    }
}
