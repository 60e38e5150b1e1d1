//! Boot-time load-switch toggle.
//!
//! Drives GPIO18 high on every boot. After a deep-sleep wake it waits 1 ms,
//! drives the pin low and goes straight back into deep sleep for 1000 ms;
//! any other boot leaves the pin high and returns.
//!
//! - **Host**: `cargo run --bin boot-pin` (always a cold start)
//! - **ESP32**: `cargo espflash flash --bin boot-pin --features esp32 --release --monitor`

use esp32_lowpower::boot::{run_boot_sequence, BootAction, BootConfig};
use log::info;

// ESP32: Initialize ESP-IDF before anything else
#[cfg(feature = "esp32")]
fn platform_init() {
    esp_idf_sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
}

// Host: Just initialize env_logger
#[cfg(not(feature = "esp32"))]
fn platform_init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

// The driver below is opened on `pins.gpio18`.
#[cfg(feature = "esp32")]
const _: () = assert!(esp32_lowpower::config::BOOT_PIN_GPIO == 18);

#[cfg(feature = "esp32")]
fn main() {
    use esp32_lowpower::boot::esp;
    use esp_idf_hal::delay::Ets;
    use esp_idf_hal::gpio::PinDriver;
    use esp_idf_hal::peripherals::Peripherals;

    platform_init();

    let peripherals = Peripherals::take().expect("Failed to take peripherals");
    let mut pin = PinDriver::output(peripherals.pins.gpio18).expect("Failed to configure GPIO18");
    let cause = esp::reset_cause();

    let action = run_boot_sequence(&mut pin, &mut Ets, cause, &BootConfig::default())
        .expect("Boot sequence failed");

    match action {
        BootAction::DeepSleep(duration) => esp::enter_deep_sleep(duration),
        BootAction::Continue => {
            // Dropping the driver resets GPIO18; the pin must stay high after main returns.
            std::mem::forget(pin);
            info!("Boot sequence done, GPIO18 held high");
        }
    }
}

#[cfg(not(feature = "esp32"))]
fn main() {
    use esp32_lowpower::boot::host;
    use esp32_lowpower::config::BOOT_PIN_GPIO;
    use esp32_lowpower::{HostPin, StdDelay};

    platform_init();

    let mut pin = HostPin::new(BOOT_PIN_GPIO);
    let cause = host::reset_cause();

    let action = run_boot_sequence(&mut pin, &mut StdDelay, cause, &BootConfig::default())
        .expect("Boot sequence failed");

    match action {
        BootAction::DeepSleep(duration) => {
            info!("Host: would deep sleep for {} ms", duration.as_millis());
        }
        BootAction::Continue => {
            info!("Boot sequence done, GPIO{} at {:?}", pin.gpio(), pin.level());
        }
    }
}
