//! ESP-NOW power-management cycle.
//!
//! Activates the Wi-Fi station and ESP-NOW interfaces, then cycles the radio
//! through the fixed power-management presets forever, holding each for two
//! seconds. Put a power meter on the supply to watch the draw change.
//!
//! - **Host**: `cargo run --bin espnow-pm-cycle`
//! - **ESP32**: `cargo espflash flash --bin espnow-pm-cycle --features esp32 --release --monitor`
//!
//! Any radio error is fatal: the binary panics and ESP-IDF resets the chip.

use esp32_lowpower::config::PM_DWELL;
use esp32_lowpower::power::{PowerCycle, PM_PRESETS};
use log::info;

// ESP32: Initialize ESP-IDF before anything else
#[cfg(feature = "esp32")]
fn platform_init() {
    esp_idf_sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    info!("ESP-IDF initialized");
}

// Host: Just initialize env_logger
#[cfg(not(feature = "esp32"))]
fn platform_init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn main() {
    platform_init();

    info!("=== ESP-NOW power-management cycle starting ===");

    #[cfg(feature = "esp32")]
    let (mut radio, mut delay) = {
        use esp_idf_hal::peripherals::Peripherals;
        use esp_idf_svc::eventloop::EspSystemEventLoop;
        use esp_idf_svc::nvs::EspDefaultNvsPartition;

        let peripherals = Peripherals::take().expect("Failed to take peripherals");
        let sysloop = EspSystemEventLoop::take().expect("Failed to take system event loop");
        let nvs = EspDefaultNvsPartition::take().expect("Failed to take NVS partition");

        let radio = esp32_lowpower::power::EspNowRadio::new(peripherals.modem, sysloop, Some(nvs))
            .expect("Failed to activate Wi-Fi station and ESP-NOW");
        (radio, esp_idf_hal::delay::FreeRtos)
    };

    #[cfg(not(feature = "esp32"))]
    let (mut radio, mut delay) = (
        esp32_lowpower::power::HostRadio::new(),
        esp32_lowpower::StdDelay,
    );

    let mut cycle = PowerCycle::new(&PM_PRESETS, PM_DWELL);
    info!(
        "Cycling {} presets, {} s each",
        PM_PRESETS.len(),
        cycle.dwell().as_secs()
    );

    match cycle.run(&mut radio, &mut delay) {
        Ok(never) => match never {},
        Err(e) => panic!("Power-management cycle failed: {}", e),
    }
}
