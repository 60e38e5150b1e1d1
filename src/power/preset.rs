//! Power-management presets.
//!
//! ESP-NOW power saving is controlled by two numbers: the wake window (how
//! long the radio listens after waking) and the wake interval (how often it
//! wakes). Both are in milliseconds. A window at least as long as the
//! interval keeps the radio permanently awake.

use std::fmt;

/// One power-management setting for the ESP-NOW radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PmPreset {
    /// Time the radio stays awake in each wake period, in milliseconds.
    pub wake_window_ms: u16,
    /// Period between wake-ups, in milliseconds.
    pub wake_interval_ms: u16,
}

impl PmPreset {
    pub const fn new(wake_window_ms: u16, wake_interval_ms: u16) -> Self {
        Self {
            wake_window_ms,
            wake_interval_ms,
        }
    }

    /// Whether the radio never gets a chance to sleep under this preset.
    pub fn is_always_awake(&self) -> bool {
        self.wake_window_ms >= self.wake_interval_ms
    }
}

impl fmt::Display for PmPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "window={}ms interval={}ms",
            self.wake_window_ms, self.wake_interval_ms
        )
    }
}

/// The presets cycled by the power-cycle loop, in order.
///
/// Goes from light to deep power saving, then ends on a fully awake setting
/// so the current draw of each stands out on a power meter.
pub const PM_PRESETS: [PmPreset; 5] = [
    PmPreset::new(75, 200),
    PmPreset::new(75, 300),
    PmPreset::new(50, 500),
    PmPreset::new(10, 500),
    PmPreset::new(1000, 500),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_sequence() {
        let pairs: Vec<(u16, u16)> = PM_PRESETS
            .iter()
            .map(|p| (p.wake_window_ms, p.wake_interval_ms))
            .collect();
        assert_eq!(
            pairs,
            vec![(75, 200), (75, 300), (50, 500), (10, 500), (1000, 500)]
        );
    }

    #[test]
    fn test_only_last_preset_is_always_awake() {
        let awake: Vec<bool> = PM_PRESETS.iter().map(PmPreset::is_always_awake).collect();
        assert_eq!(awake, vec![false, false, false, false, true]);
    }

    #[test]
    fn test_window_equal_to_interval_is_awake() {
        assert!(PmPreset::new(500, 500).is_always_awake());
    }

    #[test]
    fn test_display() {
        assert_eq!(PM_PRESETS[3].to_string(), "window=10ms interval=500ms");
    }
}

#[cfg(feature = "tap-tests")]
mod tap_tests {
    use super::*;
    use esp32_lowpower_macros::tap_test;

    #[tap_test]
    fn preset_table_has_five_entries() {
        assert_eq!(PM_PRESETS.len(), 5);
        assert_eq!(PM_PRESETS[0], PmPreset::new(75, 200));
        assert_eq!(PM_PRESETS[4], PmPreset::new(1000, 500));
    }
}
