//! Host stand-ins for the boot sequence.
//!
//! On the host there is no GPIO and no reset controller. [`HostPin`] logs and
//! records levels; [`reset_cause`] reports a cold start.

use super::ResetCause;
use embedded_hal::digital::{ErrorType, OutputPin, PinState, StatefulOutputPin};
use log::info;
use std::convert::Infallible;

/// Output pin that records every level it is driven to.
#[derive(Debug)]
pub struct HostPin {
    gpio: u8,
    history: Vec<PinState>,
}

impl HostPin {
    /// Create a pin for the given GPIO number. It starts undriven.
    pub fn new(gpio: u8) -> Self {
        Self {
            gpio,
            history: Vec::new(),
        }
    }

    /// GPIO number this pin stands in for.
    pub fn gpio(&self) -> u8 {
        self.gpio
    }

    /// Levels driven so far, oldest first.
    pub fn history(&self) -> &[PinState] {
        &self.history
    }

    /// Current level, if the pin has been driven.
    pub fn level(&self) -> Option<PinState> {
        self.history.last().copied()
    }

    fn drive(&mut self, state: PinState) {
        info!("Host GPIO{}: {:?}", self.gpio, state);
        self.history.push(state);
    }
}

impl ErrorType for HostPin {
    type Error = Infallible;
}

impl OutputPin for HostPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(PinState::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(PinState::High);
        Ok(())
    }
}

impl StatefulOutputPin for HostPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level() == Some(PinState::High))
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level() == Some(PinState::Low))
    }
}

/// A host process always starts cold.
pub fn reset_cause() -> ResetCause {
    ResetCause::PowerOn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boot::{run_boot_sequence, BootAction, BootConfig};
    use crate::delay::RecordingDelay;

    #[test]
    fn test_host_pin_records_levels() {
        let mut pin = HostPin::new(18);
        assert_eq!(pin.gpio(), 18);
        assert_eq!(pin.level(), None);
        assert!(!pin.is_set_high().unwrap());

        pin.set_high().unwrap();
        pin.set_low().unwrap();

        assert_eq!(pin.history(), &[PinState::High, PinState::Low]);
        assert!(pin.is_set_low().unwrap());
    }

    #[test]
    fn test_host_boot_stays_awake_with_pin_high() {
        let mut pin = HostPin::new(18);
        let mut delay = RecordingDelay::new();

        let action =
            run_boot_sequence(&mut pin, &mut delay, reset_cause(), &BootConfig::default())
                .unwrap();

        assert_eq!(action, BootAction::Continue);
        assert!(pin.is_set_high().unwrap());
        assert!(delay.waits().is_empty());
    }
}
