//! Clock-Domain Bridge
//!
//! Reconciles the host's variable audio sample clock with the chip's fixed
//! instruction clock. The bridge is a two-state machine (unconfigured /
//! configured) keyed on the observed sample rate: a cheap equality check
//! once per sample decides whether the chip core and all register sets need
//! a full reconfiguration.

use serde::{Deserialize, Serialize};

/// PAL chip clock frequency (Hz)
pub const CLOCK_HZ_PAL: f32 = 985_248.0;

/// NTSC chip clock frequency (Hz)
pub const CLOCK_HZ_NTSC: f32 = 1_022_727.0;

/// The two hardware-historical chip clock frequencies.
///
/// The panel carries a PAL/NTSC selector, but the active clock is pinned to
/// NTSC regardless of its position, reproducing the source hardware
/// surface. Switching the selector does not currently change behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChipClock {
    /// 985 248 Hz (European C64)
    Pal,
    /// 1 022 727 Hz (North American C64)
    #[default]
    Ntsc,
}

impl ChipClock {
    /// Clock frequency in Hz.
    pub fn hz(self) -> f32 {
        match self {
            ChipClock::Pal => CLOCK_HZ_PAL,
            ChipClock::Ntsc => CLOCK_HZ_NTSC,
        }
    }
}

/// Bridge between the host sample clock and the chip instruction clock.
///
/// Starts unconfigured; [`ClockBridge::needs_reconfigure`] reports true for
/// the first observed sample rate and for every subsequent change, and
/// [`ClockBridge::reconfigure`] derives the integer number of chip cycles
/// to advance per audio sample. The ratio is recomputed exactly once per
/// rate change, never mid-stream.
#[derive(Debug, Clone, Copy)]
pub struct ClockBridge {
    clock: ChipClock,
    /// Last configured sample rate; 0.0 means unconfigured
    cfg_sample_rate: f32,
    cycles_per_sample: u32,
}

impl ClockBridge {
    /// Create an unconfigured bridge running at the fixed NTSC clock.
    pub fn new() -> Self {
        ClockBridge {
            clock: ChipClock::default(),
            cfg_sample_rate: 0.0,
            cycles_per_sample: 0,
        }
    }

    /// Check whether the observed sample rate differs from the configured
    /// one (always true while unconfigured).
    pub fn needs_reconfigure(&self, sample_rate: f32) -> bool {
        self.cfg_sample_rate != sample_rate
    }

    /// Adopt a new host sample rate and recompute the cycle ratio.
    pub fn reconfigure(&mut self, sample_rate: f32) {
        self.cfg_sample_rate = sample_rate;
        self.cycles_per_sample = (self.clock.hz() / sample_rate).round() as u32;
    }

    /// Chip cycles to advance per audio sample.
    pub fn cycles_per_sample(&self) -> u32 {
        self.cycles_per_sample
    }

    /// The active chip clock.
    pub fn clock(&self) -> ChipClock {
        self.clock
    }

    /// Active chip clock frequency in Hz.
    pub fn clock_hz(&self) -> f32 {
        self.clock.hz()
    }

    /// Last configured sample rate, or 0.0 while unconfigured.
    pub fn sample_rate(&self) -> f32 {
        self.cfg_sample_rate
    }
}

impl Default for ClockBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unconfigured() {
        let bridge = ClockBridge::new();
        assert!(bridge.needs_reconfigure(44_100.0));
        assert_eq!(bridge.cycles_per_sample(), 0);
    }

    #[test]
    fn test_cycle_ratio_ntsc_44100() {
        let mut bridge = ClockBridge::new();
        bridge.reconfigure(44_100.0);
        // round(1_022_727 / 44_100) = 23
        assert_eq!(bridge.cycles_per_sample(), 23);
        assert!(!bridge.needs_reconfigure(44_100.0));
    }

    #[test]
    fn test_cycle_ratio_ntsc_48000() {
        let mut bridge = ClockBridge::new();
        bridge.reconfigure(48_000.0);
        // round(1_022_727 / 48_000) = round(21.3) = 21
        assert_eq!(bridge.cycles_per_sample(), 21);
    }

    #[test]
    fn test_rate_change_detected_once() {
        let mut bridge = ClockBridge::new();
        bridge.reconfigure(44_100.0);
        assert!(bridge.needs_reconfigure(96_000.0));
        bridge.reconfigure(96_000.0);
        assert!(!bridge.needs_reconfigure(96_000.0));
        assert_eq!(bridge.cycles_per_sample(), 11);
    }

    #[test]
    fn test_active_clock_is_ntsc() {
        let bridge = ClockBridge::new();
        assert_eq!(bridge.clock(), ChipClock::Ntsc);
        assert_eq!(bridge.clock_hz(), CLOCK_HZ_NTSC);
    }

    #[test]
    fn test_clock_constants() {
        assert_eq!(ChipClock::Pal.hz(), 985_248.0);
        assert_eq!(ChipClock::Ntsc.hz(), 1_022_727.0);
    }
}
