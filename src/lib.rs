//! ESP32 low-power firmware library.
//!
//! Two independent programs share this crate:
//! - [`power`]: cycles the ESP-NOW radio through fixed power-management presets
//! - [`boot`]: drives the load-switch pin at boot and re-enters deep sleep
//!   after a deep-sleep wake
//!
//! The decision logic is platform-independent and tested on the host. ESP-IDF
//! backends are compiled with the `esp32` feature.

// Allow the crate to reference itself by name (needed for proc-macro generated code)
extern crate self as esp32_lowpower;

pub mod boot;
pub mod config;
pub mod delay;
pub mod power;
#[cfg(feature = "tap-tests")]
pub mod testing;

// Re-export commonly used items
pub use boot::{run_boot_sequence, BootAction, BootConfig, BootError, HostPin, ResetCause};
pub use delay::StdDelay;
pub use power::{PmPreset, PowerCycle, PowerManagement, RadioError, PM_PRESETS};

#[cfg(feature = "tap-tests")]
pub use testing::TestRunner;
