//! Round-robin power-management cycle.
//!
//! Applies each preset in order, holds it for a fixed dwell, and wraps
//! around after the last one. The loop has no exit condition: the only way
//! out of [`PowerCycle::run`] is a radio error, which callers treat as fatal.
//!
//! # Example
//!
//! ```
//! use esp32_lowpower::delay::StdDelay;
//! use esp32_lowpower::power::{HostRadio, PowerCycle, PM_PRESETS};
//! use std::time::Duration;
//!
//! let mut radio = HostRadio::new();
//! let mut cycle = PowerCycle::new(&PM_PRESETS, Duration::from_millis(1));
//!
//! let applied = cycle.step(&mut radio, &mut StdDelay).unwrap();
//! assert_eq!(applied, PM_PRESETS[0]);
//! ```

use super::{PmPreset, PowerManagement, RadioError};
use crate::config::duration_to_ms;
use embedded_hal::delay::DelayNs;
use log::info;
use std::convert::Infallible;
use std::time::Duration;

/// Cursor over a fixed preset sequence.
#[derive(Debug, Clone)]
pub struct PowerCycle<'a> {
    presets: &'a [PmPreset],
    dwell: Duration,
    next: usize,
}

impl<'a> PowerCycle<'a> {
    /// Create a cycle starting at the first preset.
    ///
    /// # Panics
    ///
    /// Panics if `presets` is empty.
    pub fn new(presets: &'a [PmPreset], dwell: Duration) -> Self {
        assert!(!presets.is_empty(), "preset sequence must not be empty");
        Self {
            presets,
            dwell,
            next: 0,
        }
    }

    /// Time each preset is held.
    pub fn dwell(&self) -> Duration {
        self.dwell
    }

    /// Index of the preset the next step will apply.
    pub fn position(&self) -> usize {
        self.next
    }

    /// Take the preset at the cursor and advance, wrapping after the last.
    pub fn next_preset(&mut self) -> PmPreset {
        let preset = self.presets[self.next];
        self.next = (self.next + 1) % self.presets.len();
        preset
    }

    /// Apply the next preset, then block for the dwell time.
    ///
    /// Returns the preset that was applied. On error the cursor has already
    /// advanced past the failed preset and no dwell happened.
    pub fn step<R, D>(&mut self, radio: &mut R, delay: &mut D) -> Result<PmPreset, RadioError>
    where
        R: PowerManagement + ?Sized,
        D: DelayNs + ?Sized,
    {
        let index = self.next;
        let preset = self.next_preset();
        radio.apply_preset(preset)?;
        info!(
            "PM preset {}/{}: {}{}",
            index + 1,
            self.presets.len(),
            preset,
            if preset.is_always_awake() { " (always awake)" } else { "" }
        );

        delay.delay_ms(duration_to_ms(self.dwell));
        Ok(preset)
    }

    /// Cycle through the presets forever.
    ///
    /// Never returns `Ok`. An error from the radio ends the loop and is
    /// handed back to the caller.
    pub fn run<R, D>(&mut self, radio: &mut R, delay: &mut D) -> Result<Infallible, RadioError>
    where
        R: PowerManagement + ?Sized,
        D: DelayNs + ?Sized,
    {
        loop {
            self.step(radio, delay)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PM_DWELL;
    use crate::delay::RecordingDelay;
    use crate::power::{HostRadio, PM_PRESETS};

    #[test]
    fn test_steps_follow_sequence_and_wrap() {
        let mut radio = HostRadio::new();
        let mut delay = RecordingDelay::new();
        let mut cycle = PowerCycle::new(&PM_PRESETS, PM_DWELL);

        for _ in 0..12 {
            cycle.step(&mut radio, &mut delay).unwrap();
        }

        let expected: Vec<PmPreset> = PM_PRESETS.iter().copied().cycle().take(12).collect();
        assert_eq!(radio.applied(), expected.as_slice());
    }

    #[test]
    fn test_successor_is_next_modulo_len() {
        let mut cycle = PowerCycle::new(&PM_PRESETS, PM_DWELL);
        for i in 0..(PM_PRESETS.len() * 3) {
            assert_eq!(cycle.position(), i % PM_PRESETS.len());
            assert_eq!(cycle.next_preset(), PM_PRESETS[i % PM_PRESETS.len()]);
        }
    }

    #[test]
    fn test_each_preset_followed_by_full_dwell() {
        let mut radio = HostRadio::new();
        let mut delay = RecordingDelay::new();
        let mut cycle = PowerCycle::new(&PM_PRESETS, PM_DWELL);

        for _ in 0..PM_PRESETS.len() {
            cycle.step(&mut radio, &mut delay).unwrap();
        }

        assert_eq!(delay.waits(), vec![Duration::from_secs(2); 5].as_slice());
    }

    #[test]
    fn test_run_only_ends_on_radio_error() {
        // Radio fails on its 13th application: the loop must have wrapped
        // twice and kept going until then.
        let mut radio = HostRadio::failing_after(12);
        let mut delay = RecordingDelay::new();
        let mut cycle = PowerCycle::new(&PM_PRESETS, PM_DWELL);

        let err = match cycle.run(&mut radio, &mut delay) {
            Ok(never) => match never {},
            Err(e) => e,
        };

        assert!(matches!(err, RadioError::Rejected(p) if p == PM_PRESETS[2]));
        assert_eq!(radio.applied().len(), 12);
        assert_eq!(delay.waits().len(), 12);
    }

    #[test]
    fn test_failed_step_skips_dwell() {
        let mut radio = HostRadio::failing_after(0);
        let mut delay = RecordingDelay::new();
        let mut cycle = PowerCycle::new(&PM_PRESETS, PM_DWELL);

        assert!(cycle.step(&mut radio, &mut delay).is_err());
        assert!(delay.waits().is_empty());
        assert_eq!(cycle.position(), 1);
    }

    #[test]
    fn test_single_preset_repeats() {
        let only = [PmPreset::new(20, 100)];
        let mut cycle = PowerCycle::new(&only, PM_DWELL);
        assert_eq!(cycle.next_preset(), only[0]);
        assert_eq!(cycle.next_preset(), only[0]);
        assert_eq!(cycle.position(), 0);
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn test_empty_sequence_panics() {
        PowerCycle::new(&[], PM_DWELL);
    }
}

#[cfg(feature = "tap-tests")]
mod tap_tests {
    use super::*;
    use crate::config::PM_DWELL;
    use crate::delay::RecordingDelay;
    use crate::power::{HostRadio, PM_PRESETS};
    use esp32_lowpower_macros::tap_test;

    #[tap_test]
    fn cycle_wraps_after_fifth_preset() {
        let mut radio = HostRadio::new();
        let mut delay = RecordingDelay::new();
        let mut cycle = PowerCycle::new(&PM_PRESETS, PM_DWELL);

        for _ in 0..6 {
            cycle.step(&mut radio, &mut delay).unwrap();
        }
        assert_eq!(radio.applied()[5], PM_PRESETS[0]);
        assert_eq!(delay.total(), Duration::from_secs(12));
    }

    #[tap_test(should_panic = "must not be empty")]
    fn empty_cycle_panics() {
        PowerCycle::new(&[], PM_DWELL);
    }
}
