//! Boot-time load-switch control.
//!
//! This module contains:
//! - [`reset`]: platform reset causes
//! - [`sequence`]: the once-per-boot pin sequence and deep-sleep decision
//! - [`host`]: pin and reset-cause stand-ins for host runs and tests
//! - [`esp`]: reset cause, GPIO and deep sleep on ESP-IDF (ESP32 only)

pub mod host;
mod reset;
mod sequence;

#[cfg(feature = "esp32")]
pub mod esp;

pub use host::HostPin;
pub use reset::ResetCause;
pub use sequence::{run_boot_sequence, BootAction, BootConfig};

/// Boot sequence errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootError {
    /// Driving the load-switch pin failed.
    Pin(embedded_hal::digital::ErrorKind),
}

impl std::fmt::Display for BootError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pin(kind) => write!(f, "load-switch pin error: {}", kind),
        }
    }
}

impl std::error::Error for BootError {}
