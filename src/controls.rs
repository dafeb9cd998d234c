//! Control Input Data Model
//!
//! A control input is a named (knob value, optional connected CV) pair. The
//! CV contribution is only applied when the corresponding jack is connected
//! (`cv` is `Some`); otherwise it is treated as zero. The structs here
//! mirror the panel layout: one block per voice, one filter/mixer block,
//! and the clock section.
//!
//! All types derive `serde` traits so a host can persist and restore a
//! complete control snapshot.

use serde::{Deserialize, Serialize};

use crate::regs::NUM_VOICES;

/// One knob with an optional control-voltage input.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ControlInput {
    /// Knob position, in the control's own bounded range
    pub knob: f32,
    /// Connected CV in volts, or `None` when the jack is unpatched
    pub cv: Option<f32>,
}

impl ControlInput {
    /// A knob-only control at the given position.
    pub fn knob(value: f32) -> Self {
        ControlInput {
            knob: value,
            cv: None,
        }
    }
}

/// Control inputs of one voice panel section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VoiceControls {
    /// Pitch in semitones (-54..54), CV at 1V/octave
    pub pitch: ControlInput,
    /// Bipolar pulse width (-1..1)
    pub pulse_width: ControlInput,
    /// Triangle waveform switch
    pub wave_triangle: ControlInput,
    /// Sawtooth waveform switch
    pub wave_saw: ControlInput,
    /// Pulse waveform switch
    pub wave_pulse: ControlInput,
    /// Noise waveform switch
    pub wave_noise: ControlInput,
    /// Envelope gate switch
    pub gate: ControlInput,
    /// Hard sync switch
    pub sync: ControlInput,
    /// Ring modulation switch
    pub ring_mod: ControlInput,
    /// Test bit switch
    pub test: ControlInput,
    /// Attack rate (0..1)
    pub attack: ControlInput,
    /// Decay rate (0..1)
    pub decay: ControlInput,
    /// Sustain level (0..1)
    pub sustain: ControlInput,
    /// Release rate (0..1)
    pub release: ControlInput,
}

impl Default for VoiceControls {
    /// Panel defaults: everything off and zeroed, sustain at full.
    fn default() -> Self {
        VoiceControls {
            pitch: ControlInput::default(),
            pulse_width: ControlInput::default(),
            wave_triangle: ControlInput::default(),
            wave_saw: ControlInput::default(),
            wave_pulse: ControlInput::default(),
            wave_noise: ControlInput::default(),
            gate: ControlInput::default(),
            sync: ControlInput::default(),
            ring_mod: ControlInput::default(),
            test: ControlInput::default(),
            attack: ControlInput::default(),
            decay: ControlInput::default(),
            sustain: ControlInput::knob(1.0),
            release: ControlInput::default(),
        }
    }
}

/// Control inputs of the filter/mixer panel section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FilterControls {
    /// Per-voice filter routing switches
    pub filter_voice: [ControlInput; NUM_VOICES],
    /// Low-pass mode switch
    pub low_pass: ControlInput,
    /// Band-pass mode switch
    pub band_pass: ControlInput,
    /// High-pass mode switch
    pub high_pass: ControlInput,
    /// Filter resonance (0..15)
    pub resonance: ControlInput,
    /// Voice 3 mute switch
    pub voice3_off: ControlInput,
    /// Master volume (0..15)
    pub volume: ControlInput,
}

impl Default for FilterControls {
    /// Panel defaults: filter bypassed, volume at full.
    fn default() -> Self {
        FilterControls {
            filter_voice: [ControlInput::default(); NUM_VOICES],
            low_pass: ControlInput::default(),
            band_pass: ControlInput::default(),
            high_pass: ControlInput::default(),
            resonance: ControlInput::default(),
            voice3_off: ControlInput::default(),
            volume: ControlInput::knob(15.0),
        }
    }
}

/// Complete control state observed by one processing tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ControlFrame {
    /// Per-voice panel sections
    pub voices: [VoiceControls; NUM_VOICES],
    /// Filter/mixer panel section
    pub filter: FilterControls,
    /// PAL/NTSC clock selector. Wired on the panel but currently inert:
    /// the clock bridge is pinned to NTSC.
    pub pal_ntsc: ControlInput,
    /// External clock input. Present on the panel, not consumed by the
    /// core logic.
    pub external_clock: ControlInput,
}
