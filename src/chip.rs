//! SID Backend Contract
//!
//! The chip core is an external collaborator: this crate never models the
//! SID's internal waveform, envelope, or filter simulation. Everything it
//! needs from an emulation core is captured by the [`SidBackend`] trait, so
//! an alternate or higher-fidelity core can be substituted without touching
//! the synchronization layer.
//!
//! The register address map of the MOS 6581 is laid out as three identical
//! seven-register voice blocks followed by the shared filter/mixer block;
//! the constants in [`reg`] name every address this crate writes.

use serde::{Deserialize, Serialize};

/// Sampling quality hint passed to the chip core's resampling machinery.
///
/// Mirrors the sampling methods offered by common SID emulation cores. The
/// orchestrator always requests [`SamplingQuality::Fast`], matching the
/// real-time use case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SamplingQuality {
    /// Nearest-sample decimation, cheapest
    #[default]
    Fast,
    /// Linear interpolation between chip samples
    Interpolate,
    /// Full resampling with interpolation, highest quality
    ResampleInterpolate,
    /// Full resampling without interpolation
    ResampleFast,
}

/// Narrow capability interface over a SID emulation core.
///
/// The surface drives the core exclusively through these five operations:
/// a full reset, sampling (re)configuration, cycle stepping, sample
/// retrieval, and addressed single-byte register writes. The core is owned
/// and mutated by exactly one [`crate::SidSurface`]; there is no sharing.
pub trait SidBackend {
    /// Reset the core to its power-on state (all registers zero).
    fn reset(&mut self);

    /// Configure the core's internal sampling machinery.
    ///
    /// # Arguments
    ///
    /// * `clock_hz` - Chip instruction clock frequency in Hz
    /// * `quality` - Resampling quality hint
    /// * `sample_rate` - Host audio sample rate in Hz
    fn set_sampling_parameters(
        &mut self,
        clock_hz: f32,
        quality: SamplingQuality,
        sample_rate: f32,
    );

    /// Advance the core's internal clock by `cycles` instruction cycles.
    fn clock(&mut self, cycles: u32);

    /// Retrieve the current output sample (signed 16-bit).
    fn output(&self) -> i16;

    /// Write one byte to an addressed chip register.
    fn write_register(&mut self, addr: u8, value: u8);
}

/// SID register address map.
pub mod reg {
    /// Number of registers per voice block
    pub const VOICE_STRIDE: u8 = 7;

    /// Frequency, low byte (voice-relative)
    pub const FREQ_LO: u8 = 0x00;
    /// Frequency, high byte (voice-relative)
    pub const FREQ_HI: u8 = 0x01;
    /// Pulse width, low byte (voice-relative)
    pub const PW_LO: u8 = 0x02;
    /// Pulse width, high nibble (voice-relative)
    pub const PW_HI: u8 = 0x03;
    /// Control register: waveform, test, ring-mod, sync, gate (voice-relative)
    pub const CONTROL: u8 = 0x04;
    /// Attack/decay nibble pair (voice-relative)
    pub const ATTACK_DECAY: u8 = 0x05;
    /// Sustain/release nibble pair (voice-relative)
    pub const SUSTAIN_RELEASE: u8 = 0x06;

    /// Filter cutoff, low 3 bits
    pub const FC_LO: u8 = 0x15;
    /// Filter cutoff, high 8 bits
    pub const FC_HI: u8 = 0x16;
    /// Resonance (high nibble) and per-voice filter routing (low nibble)
    pub const RES_FILT: u8 = 0x17;
    /// Filter mode flags (high nibble) and master volume (low nibble)
    pub const MODE_VOL: u8 = 0x18;

    /// Absolute address of a voice-relative register.
    #[inline]
    pub const fn voice(voice: usize, offset: u8) -> u8 {
        (voice as u8) * VOICE_STRIDE + offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_register_addresses() {
        assert_eq!(reg::voice(0, reg::FREQ_LO), 0x00);
        assert_eq!(reg::voice(1, reg::FREQ_LO), 0x07);
        assert_eq!(reg::voice(2, reg::SUSTAIN_RELEASE), 0x14);
    }

    #[test]
    fn test_filter_block_follows_voices() {
        // The filter block starts right after voice 3's last register
        assert_eq!(reg::voice(2, reg::SUSTAIN_RELEASE) + 1, reg::FC_LO);
    }
}
