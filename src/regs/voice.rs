//! Voice Register Set
//!
//! Logical state of one voice's seven chip registers plus a dirty mask.
//! The control register packs the four waveform bits together with the
//! gate/sync/ring-mod/test flags into one byte; the byte is atomic, so any
//! single flag change forces a full control-register rewrite.

use bitflags::bitflags;

use crate::chip::{reg, SidBackend};

bitflags! {
    /// Voice control register bits (waveform selector plus mode flags)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ControlFlags: u8 {
        /// Envelope gate
        const GATE = 0x01;
        /// Hard sync with the preceding voice's oscillator
        const SYNC = 0x02;
        /// Ring modulation with the preceding voice
        const RING_MOD = 0x04;
        /// Test bit (locks and resets the oscillator)
        const TEST = 0x08;
        /// Triangle waveform
        const WAVE_TRIANGLE = 0x10;
        /// Sawtooth waveform
        const WAVE_SAW = 0x20;
        /// Pulse waveform
        const WAVE_PULSE = 0x40;
        /// Noise waveform
        const WAVE_NOISE = 0x80;
    }
}

bitflags! {
    /// Dirty mask over the voice's chip registers, one bit per register
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct VoiceDirty: u8 {
        /// Frequency low byte changed
        const FREQ_LO = 0x01;
        /// Frequency high byte changed
        const FREQ_HI = 0x02;
        /// Pulse width low byte changed
        const PW_LO = 0x04;
        /// Pulse width high nibble changed
        const PW_HI = 0x08;
        /// Control byte changed
        const CONTROL = 0x10;
        /// Attack/decay byte changed
        const ATTACK_DECAY = 0x20;
        /// Sustain/release byte changed
        const SUSTAIN_RELEASE = 0x40;
    }
}

/// Maximum value of the 4-bit sustain field
pub const SUSTAIN_MAX: u8 = 15;

/// Dirty-masked register cache for one synthesis voice.
///
/// Constructed once at module initialization, fully reset whenever the
/// clock domain is reconfigured, mutated every sample by the orchestrator,
/// and realized (committed to the chip core) every sample.
#[derive(Debug, Clone, Default)]
pub struct VoiceRegs {
    freq: u16,
    pulse_width: u16,
    control: ControlFlags,
    attack_decay: u8,
    sustain_release: u8,
    dirty: VoiceDirty,
}

impl VoiceRegs {
    /// Create a voice register set at power-on defaults (all zero, clean).
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore hardware power-on defaults and clear the dirty mask.
    ///
    /// Matches a chip-core `reset()`: with both sides zeroed the logical
    /// cache and the chip agree without any writes.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Set the 16-bit oscillator frequency register.
    pub fn set_freq(&mut self, freq: u16) {
        if (freq & 0xFF) != (self.freq & 0xFF) {
            self.dirty |= VoiceDirty::FREQ_LO;
        }
        if (freq >> 8) != (self.freq >> 8) {
            self.dirty |= VoiceDirty::FREQ_HI;
        }
        self.freq = freq;
    }

    /// Set the 12-bit pulse width register.
    pub fn set_pulse_width(&mut self, pw: u16) {
        let pw = pw & 0x0FFF;
        if (pw & 0xFF) != (self.pulse_width & 0xFF) {
            self.dirty |= VoiceDirty::PW_LO;
        }
        if (pw >> 8) != (self.pulse_width >> 8) {
            self.dirty |= VoiceDirty::PW_HI;
        }
        self.pulse_width = pw;
    }

    /// Set or clear one control flag.
    fn set_control_flag(&mut self, flag: ControlFlags, on: bool) {
        let mut control = self.control;
        control.set(flag, on);
        if control != self.control {
            self.control = control;
            self.dirty |= VoiceDirty::CONTROL;
        }
    }

    /// Set the envelope gate.
    pub fn set_gate(&mut self, on: bool) {
        self.set_control_flag(ControlFlags::GATE, on);
    }

    /// Set hard sync.
    pub fn set_sync(&mut self, on: bool) {
        self.set_control_flag(ControlFlags::SYNC, on);
    }

    /// Set ring modulation.
    pub fn set_ring_mod(&mut self, on: bool) {
        self.set_control_flag(ControlFlags::RING_MOD, on);
    }

    /// Set the test bit.
    pub fn set_test(&mut self, on: bool) {
        self.set_control_flag(ControlFlags::TEST, on);
    }

    /// Replace the waveform selector bits, leaving the mode flags alone.
    pub fn set_waveform(&mut self, waveform: ControlFlags) {
        let wave_bits = ControlFlags::WAVE_TRIANGLE
            | ControlFlags::WAVE_SAW
            | ControlFlags::WAVE_PULSE
            | ControlFlags::WAVE_NOISE;
        let control = (self.control - wave_bits) | (waveform & wave_bits);
        if control != self.control {
            self.control = control;
            self.dirty |= VoiceDirty::CONTROL;
        }
    }

    /// Set the 4-bit attack rate.
    pub fn set_attack(&mut self, attack: u8) {
        let byte = (attack << 4) | (self.attack_decay & 0x0F);
        if byte != self.attack_decay {
            self.attack_decay = byte;
            self.dirty |= VoiceDirty::ATTACK_DECAY;
        }
    }

    /// Set the 4-bit decay rate.
    pub fn set_decay(&mut self, decay: u8) {
        let byte = (self.attack_decay & 0xF0) | (decay & 0x0F);
        if byte != self.attack_decay {
            self.attack_decay = byte;
            self.dirty |= VoiceDirty::ATTACK_DECAY;
        }
    }

    /// Set the 4-bit sustain level.
    pub fn set_sustain(&mut self, sustain: u8) {
        let byte = (sustain << 4) | (self.sustain_release & 0x0F);
        if byte != self.sustain_release {
            self.sustain_release = byte;
            self.dirty |= VoiceDirty::SUSTAIN_RELEASE;
        }
    }

    /// Set the 4-bit release rate.
    pub fn set_release(&mut self, release: u8) {
        let byte = (self.sustain_release & 0xF0) | (release & 0x0F);
        if byte != self.sustain_release {
            self.sustain_release = byte;
            self.dirty |= VoiceDirty::SUSTAIN_RELEASE;
        }
    }

    /// Get the gate flag (for host-side indicators).
    pub fn get_gate(&self) -> bool {
        self.control.contains(ControlFlags::GATE)
    }

    /// Get the sync flag.
    pub fn get_sync(&self) -> bool {
        self.control.contains(ControlFlags::SYNC)
    }

    /// Get the ring-mod flag.
    pub fn get_ring_mod(&self) -> bool {
        self.control.contains(ControlFlags::RING_MOD)
    }

    /// Get the test flag.
    pub fn get_test(&self) -> bool {
        self.control.contains(ControlFlags::TEST)
    }

    /// Get the full control byte.
    pub fn get_control(&self) -> u8 {
        self.control.bits()
    }

    /// Get the frequency register value.
    pub fn get_freq(&self) -> u16 {
        self.freq
    }

    /// Get the pulse width register value.
    pub fn get_pulse_width(&self) -> u16 {
        self.pulse_width
    }

    /// Get the packed attack/decay byte.
    pub fn get_attack_decay(&self) -> u8 {
        self.attack_decay
    }

    /// Get the packed sustain/release byte.
    pub fn get_sustain_release(&self) -> u8 {
        self.sustain_release
    }

    /// Check whether any register is pending commit.
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Commit all dirty registers for voice `voice` to the chip core.
    ///
    /// Writes follow the hardware register order: frequency low/high, pulse
    /// width low/high, control, attack/decay, sustain/release. Clears the
    /// dirty mask afterwards, so an immediate second call writes nothing.
    pub fn realize<C: SidBackend>(&mut self, chip: &mut C, voice: usize) {
        if self.dirty.is_empty() {
            return;
        }
        if self.dirty.contains(VoiceDirty::FREQ_LO) {
            chip.write_register(reg::voice(voice, reg::FREQ_LO), (self.freq & 0xFF) as u8);
        }
        if self.dirty.contains(VoiceDirty::FREQ_HI) {
            chip.write_register(reg::voice(voice, reg::FREQ_HI), (self.freq >> 8) as u8);
        }
        if self.dirty.contains(VoiceDirty::PW_LO) {
            chip.write_register(reg::voice(voice, reg::PW_LO), (self.pulse_width & 0xFF) as u8);
        }
        if self.dirty.contains(VoiceDirty::PW_HI) {
            chip.write_register(reg::voice(voice, reg::PW_HI), (self.pulse_width >> 8) as u8);
        }
        if self.dirty.contains(VoiceDirty::CONTROL) {
            chip.write_register(reg::voice(voice, reg::CONTROL), self.control.bits());
        }
        if self.dirty.contains(VoiceDirty::ATTACK_DECAY) {
            chip.write_register(reg::voice(voice, reg::ATTACK_DECAY), self.attack_decay);
        }
        if self.dirty.contains(VoiceDirty::SUSTAIN_RELEASE) {
            chip.write_register(reg::voice(voice, reg::SUSTAIN_RELEASE), self.sustain_release);
        }
        self.dirty = VoiceDirty::empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct WriteLog {
        writes: Vec<(u8, u8)>,
    }

    impl SidBackend for WriteLog {
        fn reset(&mut self) {}
        fn set_sampling_parameters(
            &mut self,
            _clock_hz: f32,
            _quality: crate::chip::SamplingQuality,
            _sample_rate: f32,
        ) {
        }
        fn clock(&mut self, _cycles: u32) {}
        fn output(&self) -> i16 {
            0
        }
        fn write_register(&mut self, addr: u8, value: u8) {
            self.writes.push((addr, value));
        }
    }

    #[test]
    fn test_realize_writes_only_changed_registers() {
        let mut regs = VoiceRegs::new();
        let mut chip = WriteLog::default();

        regs.set_freq(0x1CD6);
        regs.realize(&mut chip, 0);
        assert_eq!(chip.writes, vec![(0x00, 0xD6), (0x01, 0x1C)]);

        // Same value again: nothing to commit
        chip.writes.clear();
        regs.set_freq(0x1CD6);
        regs.realize(&mut chip, 0);
        assert!(chip.writes.is_empty());

        // Only the low byte changes
        regs.set_freq(0x1CD7);
        regs.realize(&mut chip, 0);
        assert_eq!(chip.writes, vec![(0x00, 0xD7)]);
    }

    #[test]
    fn test_realize_order_matches_register_map() {
        let mut regs = VoiceRegs::new();
        let mut chip = WriteLog::default();

        regs.set_release(3);
        regs.set_attack(2);
        regs.set_gate(true);
        regs.set_pulse_width(0x801);
        regs.set_freq(0x0101);
        regs.realize(&mut chip, 1);

        let addrs: Vec<u8> = chip.writes.iter().map(|w| w.0).collect();
        assert_eq!(addrs, vec![0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D]);
    }

    #[test]
    fn test_control_byte_is_atomic() {
        let mut regs = VoiceRegs::new();
        let mut chip = WriteLog::default();

        regs.set_waveform(ControlFlags::WAVE_PULSE);
        regs.set_gate(true);
        regs.realize(&mut chip, 0);
        // One write carrying both the waveform and the gate bit
        assert_eq!(chip.writes, vec![(0x04, 0x41)]);

        // Flipping a single flag rewrites the whole byte
        chip.writes.clear();
        regs.set_sync(true);
        regs.realize(&mut chip, 0);
        assert_eq!(chip.writes, vec![(0x04, 0x43)]);
    }

    #[test]
    fn test_waveform_preserves_mode_flags() {
        let mut regs = VoiceRegs::new();
        regs.set_gate(true);
        regs.set_test(true);
        regs.set_waveform(ControlFlags::WAVE_NOISE);
        assert_eq!(regs.get_control(), 0x89);
        regs.set_waveform(ControlFlags::WAVE_TRIANGLE | ControlFlags::WAVE_SAW);
        assert_eq!(regs.get_control(), 0x39);
    }

    #[test]
    fn test_idempotent_setters_keep_clean_state() {
        let mut regs = VoiceRegs::new();
        let mut chip = WriteLog::default();
        regs.set_sustain(12);
        regs.set_decay(4);
        regs.realize(&mut chip, 0);

        chip.writes.clear();
        regs.set_sustain(12);
        regs.set_decay(4);
        assert!(!regs.is_dirty());
        regs.realize(&mut chip, 0);
        assert!(chip.writes.is_empty());
    }

    #[test]
    fn test_reset_restores_power_on_defaults() {
        let mut regs = VoiceRegs::new();
        regs.set_freq(100);
        regs.set_gate(true);
        regs.set_attack(9);
        regs.reset();
        assert_eq!(regs.get_freq(), 0);
        assert_eq!(regs.get_control(), 0);
        assert_eq!(regs.get_attack_decay(), 0);
        assert!(!regs.is_dirty());
    }
}
