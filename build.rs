fn main() {
    // The ESP-IDF environment is only needed when cross-compiling for the chip.
    // Host builds (tests, host stand-ins) skip it entirely.
    if let Ok(target) = std::env::var("TARGET") {
        if target.contains("espidf") {
            embuild::espidf::sysenv::output();
        }
    }
}
