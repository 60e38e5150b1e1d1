//! ESP-NOW radio power management.
//!
//! This module contains:
//! - [`preset`]: power-management presets and the fixed preset sequence
//! - [`cycle`]: the round-robin loop applying presets forever
//! - [`host`]: in-process radio stand-in for host runs and tests
//! - [`espnow`]: Wi-Fi station + ESP-NOW driver wrapper (ESP32 only)
//!
//! # Example
//!
//! ```ignore
//! use esp32_lowpower::power::{PowerCycle, PM_PRESETS};
//!
//! #[cfg(feature = "esp32")]
//! let mut radio = power::EspNowRadio::new(modem, sysloop, nvs)?;
//!
//! #[cfg(not(feature = "esp32"))]
//! let mut radio = power::HostRadio::new();
//!
//! // Same loop on both platforms
//! let mut cycle = PowerCycle::new(&PM_PRESETS, config::PM_DWELL);
//! cycle.run(&mut radio, &mut delay)?;
//! ```

mod cycle;
mod host;
mod preset;

#[cfg(feature = "esp32")]
mod espnow;

pub use cycle::PowerCycle;
pub use host::HostRadio;
pub use preset::{PmPreset, PM_PRESETS};

#[cfg(feature = "esp32")]
pub use espnow::EspNowRadio;

/// A peer-to-peer radio whose power saving can be reconfigured.
///
/// Implemented by the ESP-NOW driver on the chip and by [`HostRadio`] on the
/// host, so [`PowerCycle`] runs unchanged on both.
pub trait PowerManagement {
    /// Apply a power-management preset to the radio.
    fn apply_preset(&mut self, preset: PmPreset) -> Result<(), RadioError>;
}

impl<T: PowerManagement + ?Sized> PowerManagement for &mut T {
    fn apply_preset(&mut self, preset: PmPreset) -> Result<(), RadioError> {
        (**self).apply_preset(preset)
    }
}

/// Radio errors.
#[derive(Debug)]
pub enum RadioError {
    /// The radio interface is not active.
    Inactive,
    /// The radio refused the preset.
    Rejected(PmPreset),
    /// ESP-IDF driver error.
    #[cfg(feature = "esp32")]
    Esp(esp_idf_sys::EspError),
}

impl std::fmt::Display for RadioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inactive => write!(f, "radio interface not active"),
            Self::Rejected(preset) => write!(f, "radio rejected preset ({})", preset),
            #[cfg(feature = "esp32")]
            Self::Esp(e) => write!(f, "ESP error: {:?}", e),
        }
    }
}

impl std::error::Error for RadioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "esp32")]
            Self::Esp(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "esp32")]
impl From<esp_idf_sys::EspError> for RadioError {
    fn from(e: esp_idf_sys::EspError) -> Self {
        Self::Esp(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(RadioError::Inactive.to_string(), "radio interface not active");
        assert_eq!(
            RadioError::Rejected(PM_PRESETS[0]).to_string(),
            "radio rejected preset (window=75ms interval=200ms)"
        );
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn apply_third<R: PowerManagement>(mut radio: R) -> Result<(), RadioError> {
            radio.apply_preset(PM_PRESETS[2])
        }

        let mut radio = HostRadio::new();
        apply_third(&mut radio).unwrap();
        assert_eq!(radio.applied(), &[PM_PRESETS[2]]);
    }
}
