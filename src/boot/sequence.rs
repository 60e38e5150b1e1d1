//! Boot-time load-switch sequence.
//!
//! Runs once per boot, top to bottom:
//! 1. drive the load-switch pin high;
//! 2. if the boot was a deep-sleep wake, wait for the switch to settle, drive
//!    the pin low and ask the caller to power down again.
//!
//! Entering deep sleep is left to the caller because it never returns; the
//! sequence itself only decides.

use super::{BootError, ResetCause};
use crate::config::{duration_to_ms, DEEP_SLEEP_DURATION, PIN_SETTLE};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::{debug, error, info};
use std::time::Duration;

/// Timings of the boot sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootConfig {
    /// Wait between the pin going low and the power-down request.
    pub settle: Duration,
    /// Deep-sleep duration requested after a deep-sleep wake.
    pub deep_sleep: Duration,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            settle: PIN_SETTLE,
            deep_sleep: DEEP_SLEEP_DURATION,
        }
    }
}

/// What the caller must do once the sequence has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootAction {
    /// Normal boot: leave the pin high and carry on.
    Continue,
    /// Power down into deep sleep for the given duration.
    DeepSleep(Duration),
}

/// Run the boot sequence against `pin` for the given reset cause.
pub fn run_boot_sequence<P, D>(
    pin: &mut P,
    delay: &mut D,
    cause: ResetCause,
    config: &BootConfig,
) -> Result<BootAction, BootError>
where
    P: OutputPin + ?Sized,
    D: DelayNs + ?Sized,
{
    pin.set_high().map_err(pin_error)?;
    debug!("Load-switch pin high");

    if !cause.is_deep_sleep_wake() {
        info!("Reset cause {:?}, continuing boot", cause);
        return Ok(BootAction::Continue);
    }

    info!(
        "Woke from deep sleep, powering down again for {} ms",
        config.deep_sleep.as_millis()
    );
    delay.delay_ms(duration_to_ms(config.settle));
    pin.set_low().map_err(pin_error)?;
    debug!("Load-switch pin low");

    Ok(BootAction::DeepSleep(config.deep_sleep))
}

fn pin_error<E: embedded_hal::digital::Error>(e: E) -> BootError {
    error!("Load-switch pin error: {:?}", e);
    BootError::Pin(e.kind())
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::{ErrorKind, ErrorType, PinState};
    use std::cell::RefCell;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Pin(PinState),
        Wait(Duration),
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    struct LogPin(Log);

    impl ErrorType for LogPin {
        type Error = Infallible;
    }

    impl OutputPin for LogPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.0.borrow_mut().push(Event::Pin(PinState::Low));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.0.borrow_mut().push(Event::Pin(PinState::High));
            Ok(())
        }
    }

    struct LogDelay(Log);

    impl DelayNs for LogDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.0
                .borrow_mut()
                .push(Event::Wait(Duration::from_nanos(ns.into())));
        }

        fn delay_ms(&mut self, ms: u32) {
            self.0
                .borrow_mut()
                .push(Event::Wait(Duration::from_millis(ms.into())));
        }
    }

    struct BrokenPin;

    impl ErrorType for BrokenPin {
        type Error = ErrorKind;
    }

    impl OutputPin for BrokenPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Err(ErrorKind::Other)
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            Err(ErrorKind::Other)
        }
    }

    fn run(cause: ResetCause) -> (BootAction, Vec<Event>) {
        let log = Log::default();
        let mut pin = LogPin(log.clone());
        let mut delay = LogDelay(log.clone());
        let action =
            run_boot_sequence(&mut pin, &mut delay, cause, &BootConfig::default()).unwrap();
        let events = log.borrow().clone();
        (action, events)
    }

    #[test]
    fn test_deep_sleep_wake_sequence() {
        let (action, events) = run(ResetCause::DeepSleepWake);

        assert_eq!(
            events,
            vec![
                Event::Pin(PinState::High),
                Event::Wait(Duration::from_millis(1)),
                Event::Pin(PinState::Low),
            ]
        );
        assert_eq!(action, BootAction::DeepSleep(Duration::from_millis(1000)));
    }

    #[test]
    fn test_power_on_leaves_pin_high() {
        let (action, events) = run(ResetCause::PowerOn);

        assert_eq!(events, vec![Event::Pin(PinState::High)]);
        assert_eq!(action, BootAction::Continue);
    }

    #[test]
    fn test_repeated_normal_boots_are_identical() {
        let first = run(ResetCause::External);
        let second = run(ResetCause::External);
        assert_eq!(first, second);
        assert_eq!(first.0, BootAction::Continue);
    }

    #[test]
    fn test_no_other_cause_sleeps() {
        let causes = (0..=64)
            .chain([1000, u32::MAX])
            .map(ResetCause::from_raw)
            .filter(|cause| *cause != ResetCause::DeepSleepWake);

        for cause in causes {
            let (action, events) = run(cause);
            assert_eq!(action, BootAction::Continue, "cause {:?}", cause);
            assert_eq!(events, vec![Event::Pin(PinState::High)], "cause {:?}", cause);
        }
    }

    #[test]
    fn test_custom_timings() {
        let log = Log::default();
        let config = BootConfig {
            settle: Duration::from_millis(5),
            deep_sleep: Duration::from_secs(30),
        };

        let action = run_boot_sequence(
            &mut LogPin(log.clone()),
            &mut LogDelay(log.clone()),
            ResetCause::DeepSleepWake,
            &config,
        )
        .unwrap();

        assert_eq!(action, BootAction::DeepSleep(Duration::from_secs(30)));
        assert_eq!(log.borrow()[1], Event::Wait(Duration::from_millis(5)));
    }

    #[test]
    fn test_pin_error_is_reported() {
        let log = Log::default();
        let result = run_boot_sequence(
            &mut BrokenPin,
            &mut LogDelay(log.clone()),
            ResetCause::DeepSleepWake,
            &BootConfig::default(),
        );

        assert_eq!(result, Err(BootError::Pin(ErrorKind::Other)));
        assert!(log.borrow().is_empty());
    }
}

#[cfg(feature = "tap-tests")]
mod tap_tests {
    use super::*;
    use crate::boot::HostPin;
    use crate::delay::RecordingDelay;
    use embedded_hal::digital::PinState;
    use esp32_lowpower_macros::tap_test;

    #[tap_test]
    fn deep_sleep_wake_drops_pin_and_sleeps() {
        let mut pin = HostPin::new(18);
        let mut delay = RecordingDelay::new();

        let action = run_boot_sequence(
            &mut pin,
            &mut delay,
            ResetCause::DeepSleepWake,
            &BootConfig::default(),
        )
        .unwrap();

        assert_eq!(pin.history(), &[PinState::High, PinState::Low]);
        assert_eq!(delay.total(), Duration::from_millis(1));
        assert_eq!(action, BootAction::DeepSleep(Duration::from_millis(1000)));
    }

    #[tap_test]
    fn brownout_does_not_sleep() {
        let mut pin = HostPin::new(18);
        let mut delay = RecordingDelay::new();

        let action = run_boot_sequence(
            &mut pin,
            &mut delay,
            ResetCause::Brownout,
            &BootConfig::default(),
        )
        .unwrap();

        assert_eq!(action, BootAction::Continue);
        assert_eq!(pin.history(), &[PinState::High]);
    }
}
