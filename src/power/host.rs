//! Host radio stand-in.
//!
//! A host has no ESP-NOW radio. This stand-in logs what the chip would do and
//! keeps the applied presets so the cycle can be observed and tested.

use super::{PmPreset, PowerManagement, RadioError};
use log::info;

/// In-process radio that records every applied preset.
#[derive(Debug, Default)]
pub struct HostRadio {
    applied: Vec<PmPreset>,
    fail_after: Option<usize>,
}

impl HostRadio {
    /// Create an active host radio.
    pub fn new() -> Self {
        info!("Host radio: station and peer-to-peer interfaces active (simulated)");
        Self::default()
    }

    /// Create a radio that accepts `count` presets and rejects every one after.
    pub fn failing_after(count: usize) -> Self {
        Self {
            applied: Vec::new(),
            fail_after: Some(count),
        }
    }

    /// Presets applied so far, oldest first.
    pub fn applied(&self) -> &[PmPreset] {
        &self.applied
    }
}

impl PowerManagement for HostRadio {
    fn apply_preset(&mut self, preset: PmPreset) -> Result<(), RadioError> {
        if self.fail_after.is_some_and(|limit| self.applied.len() >= limit) {
            return Err(RadioError::Rejected(preset));
        }

        info!(
            "Host radio: wake window {} ms, wake interval {} ms",
            preset.wake_window_ms, preset.wake_interval_ms
        );
        self.applied.push(preset);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::power::PM_PRESETS;

    #[test]
    fn test_host_radio_records_presets() {
        let mut radio = HostRadio::new();
        assert!(radio.applied().is_empty());

        radio.apply_preset(PM_PRESETS[0]).unwrap();
        radio.apply_preset(PM_PRESETS[1]).unwrap();

        assert_eq!(radio.applied(), &PM_PRESETS[..2]);
    }

    #[test]
    fn test_failing_radio_rejects_after_limit() {
        let mut radio = HostRadio::failing_after(1);
        assert!(radio.apply_preset(PM_PRESETS[0]).is_ok());

        let err = radio.apply_preset(PM_PRESETS[1]).unwrap_err();
        assert!(matches!(err, RadioError::Rejected(p) if p == PM_PRESETS[1]));
        assert_eq!(radio.applied().len(), 1);
    }
}
