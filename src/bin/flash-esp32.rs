//! Build a firmware binary for ESP32-S3 and flash it.
//!
//! Usage: cargo run --bin flash-esp32 -- <espnow-pm-cycle|boot-pin|device-tests>

use std::process::{exit, Command};

const TARGET: &str = "xtensa-esp32s3-espidf";

const FIRMWARE_BINS: [(&str, &str); 3] = [
    ("espnow-pm-cycle", "esp32"),
    ("boot-pin", "esp32"),
    ("device-tests", "esp32,tap-tests"),
];

fn main() {
    let Some(bin) = std::env::args().nth(1) else {
        eprintln!("Usage: flash-esp32 <espnow-pm-cycle|boot-pin|device-tests>");
        exit(2);
    };

    let Some(&(bin, features)) = FIRMWARE_BINS.iter().find(|(name, _)| *name == bin) else {
        eprintln!("Unknown firmware binary '{}'", bin);
        exit(2);
    };

    println!("=== Building {} for ESP32-S3 ===\n", bin);

    let status = Command::new("cargo")
        .args([
            "build",
            "--bin",
            bin,
            "--release",
            "--target",
            TARGET,
            "--features",
            features,
        ])
        .status();

    if !matches!(status, Ok(s) if s.success()) {
        eprintln!("\nBuild failed!");
        exit(1);
    }

    println!("\n=== Flashing to device ===\n");

    let image = format!("target/{}/release/{}", TARGET, bin);
    let status = Command::new("espflash")
        .args(["flash", "--monitor", image.as_str()])
        .status();

    if !matches!(status, Ok(s) if s.success()) {
        eprintln!("\nFlash failed!");
        exit(1);
    }
}
