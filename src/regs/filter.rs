//! Filter Register Set
//!
//! Logical state of the shared filter/mixer registers plus a dirty mask.
//! Two registers pack unrelated concerns into shared bytes: 0x17 carries
//! resonance next to the per-voice routing bits, and 0x18 carries the
//! filter-mode flags next to the master volume. Each shared byte is rebuilt
//! from the full logical state on every change, so concurrent updates in
//! one tick always land in a single coherent write.

use bitflags::bitflags;

use crate::chip::{reg, SidBackend};

bitflags! {
    /// Per-voice filter routing bits (low nibble of register 0x17)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RoutingFlags: u8 {
        /// Route voice 1 through the filter
        const VOICE1 = 0x01;
        /// Route voice 2 through the filter
        const VOICE2 = 0x02;
        /// Route voice 3 through the filter
        const VOICE3 = 0x04;
        /// Route the external input through the filter
        const EXTERNAL = 0x08;
    }
}

bitflags! {
    /// Filter mode and voice-3 mute bits (high nibble of register 0x18)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FilterModeFlags: u8 {
        /// Low-pass output
        const LOW_PASS = 0x10;
        /// Band-pass output
        const BAND_PASS = 0x20;
        /// High-pass output
        const HIGH_PASS = 0x40;
        /// Mute voice 3 (keeps it usable as a modulation source)
        const VOICE3_OFF = 0x80;
    }
}

bitflags! {
    /// Dirty mask over the filter/mixer chip registers
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FilterDirty: u8 {
        /// Cutoff low bits changed
        const FC_LO = 0x01;
        /// Cutoff high byte changed
        const FC_HI = 0x02;
        /// Resonance/routing byte changed
        const RES_FILT = 0x04;
        /// Mode/volume byte changed
        const MODE_VOL = 0x08;
    }
}

/// Maximum value of the 4-bit master volume field
pub const VOLUME_MAX: u8 = 15;

/// Dirty-masked register cache for the shared filter/mixer stage.
///
/// One instance serves all voices; lifecycle matches [`crate::VoiceRegs`].
#[derive(Debug, Clone, Default)]
pub struct FilterRegs {
    cutoff: u16,
    resonance: u8,
    routing: RoutingFlags,
    mode: FilterModeFlags,
    volume: u8,
    dirty: FilterDirty,
}

impl FilterRegs {
    /// Create a filter register set at power-on defaults (all zero, clean).
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore hardware power-on defaults and clear the dirty mask.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Set the 11-bit filter cutoff register.
    ///
    /// No panel control drives this in the stock surface; it exists so an
    /// embedding host can program the full register map.
    pub fn set_cutoff(&mut self, cutoff: u16) {
        let cutoff = cutoff & 0x07FF;
        if (cutoff & 0x07) != (self.cutoff & 0x07) {
            self.dirty |= FilterDirty::FC_LO;
        }
        if (cutoff >> 3) != (self.cutoff >> 3) {
            self.dirty |= FilterDirty::FC_HI;
        }
        self.cutoff = cutoff;
    }

    /// Set the 4-bit filter resonance.
    pub fn set_resonance(&mut self, resonance: u8) {
        let resonance = resonance & 0x0F;
        if resonance != self.resonance {
            self.resonance = resonance;
            self.dirty |= FilterDirty::RES_FILT;
        }
    }

    /// Route one voice (0-2) through or around the filter.
    pub fn set_voice_filtered(&mut self, voice: usize, on: bool) {
        let flag = match voice {
            0 => RoutingFlags::VOICE1,
            1 => RoutingFlags::VOICE2,
            _ => RoutingFlags::VOICE3,
        };
        let mut routing = self.routing;
        routing.set(flag, on);
        if routing != self.routing {
            self.routing = routing;
            self.dirty |= FilterDirty::RES_FILT;
        }
    }

    /// Set or clear one filter-mode / voice-3-off flag.
    pub fn set_mode_flag(&mut self, flag: FilterModeFlags, on: bool) {
        let mut mode = self.mode;
        mode.set(flag, on);
        if mode != self.mode {
            self.mode = mode;
            self.dirty |= FilterDirty::MODE_VOL;
        }
    }

    /// Set the 4-bit master volume.
    ///
    /// Shares its byte with the mode flags; the commit always rebuilds the
    /// byte from both halves of the logical state.
    pub fn set_volume(&mut self, volume: u8) {
        let volume = volume.min(VOLUME_MAX);
        if volume != self.volume {
            self.volume = volume;
            self.dirty |= FilterDirty::MODE_VOL;
        }
    }

    /// Get the resonance value.
    pub fn get_resonance(&self) -> u8 {
        self.resonance
    }

    /// Get the routing flags.
    pub fn get_routing(&self) -> RoutingFlags {
        self.routing
    }

    /// Get the mode flags.
    pub fn get_mode(&self) -> FilterModeFlags {
        self.mode
    }

    /// Get the master volume.
    pub fn get_volume(&self) -> u8 {
        self.volume
    }

    /// Get the cutoff register value.
    pub fn get_cutoff(&self) -> u16 {
        self.cutoff
    }

    /// Check whether any register is pending commit.
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Packed resonance/routing byte as the chip expects it.
    fn res_filt_byte(&self) -> u8 {
        (self.resonance << 4) | self.routing.bits()
    }

    /// Packed mode/volume byte as the chip expects it.
    fn mode_vol_byte(&self) -> u8 {
        self.mode.bits() | self.volume
    }

    /// Commit all dirty filter registers to the chip core.
    ///
    /// Order follows the register map: cutoff low/high, resonance/routing,
    /// mode/volume. Clears the dirty mask afterwards.
    pub fn realize<C: SidBackend>(&mut self, chip: &mut C) {
        if self.dirty.is_empty() {
            return;
        }
        if self.dirty.contains(FilterDirty::FC_LO) {
            chip.write_register(reg::FC_LO, (self.cutoff & 0x07) as u8);
        }
        if self.dirty.contains(FilterDirty::FC_HI) {
            chip.write_register(reg::FC_HI, (self.cutoff >> 3) as u8);
        }
        if self.dirty.contains(FilterDirty::RES_FILT) {
            chip.write_register(reg::RES_FILT, self.res_filt_byte());
        }
        if self.dirty.contains(FilterDirty::MODE_VOL) {
            chip.write_register(reg::MODE_VOL, self.mode_vol_byte());
        }
        self.dirty = FilterDirty::empty();
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
    fn test_volume_and_mode_share_one_write() {
        let mut regs = FilterRegs::new();
        let mut chip = WriteLog::default();

        regs.set_volume(12);
        regs.set_mode_flag(FilterModeFlags::LOW_PASS, true);
        regs.realize(&mut chip);
        assert_eq!(chip.writes, vec![(0x18, 0x1C)]);

        // Changing only the volume keeps the mode bits in the same byte
        chip.writes.clear();
        regs.set_volume(5);
        regs.realize(&mut chip);
        assert_eq!(chip.writes, vec![(0x18, 0x15)]);
    }

    #[test]
    fn test_resonance_and_routing_share_one_write() {
        let mut regs = FilterRegs::new();
        let mut chip = WriteLog::default();

        regs.set_resonance(9);
        regs.set_voice_filtered(0, true);
        regs.set_voice_filtered(2, true);
        regs.realize(&mut chip);
        assert_eq!(chip.writes, vec![(0x17, 0x95)]);
    }

    #[test]
    fn test_realize_is_idempotent() {
        let mut regs = FilterRegs::new();
        let mut chip = WriteLog::default();

        regs.set_volume(VOLUME_MAX);
        regs.realize(&mut chip);
        assert_eq!(chip.writes.len(), 1);
        regs.realize(&mut chip);
        assert_eq!(chip.writes.len(), 1);
    }

    #[test]
    fn test_cutoff_split_across_registers() {
        let mut regs = FilterRegs::new();
        let mut chip = WriteLog::default();

        regs.set_cutoff(0x07FF);
        regs.realize(&mut chip);
        assert_eq!(chip.writes, vec![(0x15, 0x07), (0x16, 0xFF)]);

        // Changing only the low bits writes only FC_LO
        chip.writes.clear();
        regs.set_cutoff(0x07FC);
        regs.realize(&mut chip);
        assert_eq!(chip.writes, vec![(0x15, 0x04)]);
    }

    #[test]
    fn test_reset_clears_state_and_dirty() {
        let mut regs = FilterRegs::new();
        regs.set_volume(7);
        regs.set_resonance(3);
        regs.reset();
        assert_eq!(regs.get_volume(), 0);
        assert_eq!(regs.get_resonance(), 0);
        assert!(!regs.is_dirty());
    }
}
