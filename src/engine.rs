//! Per-Sample Orchestrator
//!
//! [`SidSurface`] owns the chip core, the three voice register sets, the
//! filter register set, the clock bridge and the sync pulse source, and
//! drives them once per audio sample. The tick order is fixed: reconfigure
//! check, control ingestion, register realization, chip clocking, output
//! conversion, sync pulse. Register realization must happen strictly before
//! the clock advance so the chip sees the new state before producing each
//! sample.

use crate::chip::{SamplingQuality, SidBackend};
use crate::clock::ClockBridge;
use crate::controls::{ControlFrame, FilterControls, VoiceControls};
use crate::encode;
use crate::regs::{ControlFlags, FilterModeFlags, FilterRegs, VoiceRegs, NUM_VOICES};
use crate::sync_pulse::SyncPulse;

/// Audio output scale: full-scale chip sample maps to +-10V
const AUDIO_VOLTS: f32 = 10.0;

/// Sync pulse output level when high (volts)
const PULSE_VOLTS: f32 = 10.0;

/// Baseline register state applied after every clock reconfiguration.
///
/// The chip powers on silent; this preset seeds voice 1 with an audible
/// waveform and opens the master volume so audio resumes immediately after
/// a reset instead of waiting for control changes. It is applied outside
/// of any control input, right after the register sets are reset; fields
/// that controls cover are overwritten by the next processed frame.
#[derive(Debug, Clone, Copy)]
pub struct BaselinePreset {
    /// Waveform seeded on voice 1
    pub waveform: ControlFlags,
    /// Frequency register seeded on voice 1
    pub freq: u16,
    /// Sustain level seeded on voice 1
    pub sustain: u8,
    /// Master volume
    pub volume: u8,
}

impl Default for BaselinePreset {
    fn default() -> Self {
        BaselinePreset {
            waveform: ControlFlags::WAVE_TRIANGLE,
            freq: 0x1CD6,
            sustain: crate::regs::SUSTAIN_MAX,
            volume: crate::regs::VOLUME_MAX,
        }
    }
}

impl BaselinePreset {
    /// Apply the preset to freshly reset register sets.
    pub fn apply(&self, voices: &mut [VoiceRegs; NUM_VOICES], filter: &mut FilterRegs) {
        filter.set_volume(self.volume);
        voices[0].set_waveform(self.waveform);
        voices[0].set_freq(self.freq);
        voices[0].set_sustain(self.sustain);
    }
}

/// Output of one processing tick, in volts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOutput {
    /// Audio-rate output (+-10V range)
    pub audio: f32,
    /// Sync trigger output (0V or 10V)
    pub clock: f32,
}

/// The per-sample orchestrator: control surface over one SID core.
///
/// Exclusively owns all register sets and the clock configuration; the
/// chip core is an opaque resource it drives but whose internals it never
/// touches. Single-threaded by contract: exactly one `process` call per
/// audio sample, no internal concurrency.
#[derive(Debug)]
pub struct SidSurface<C: SidBackend> {
    chip: C,
    voice_regs: [VoiceRegs; NUM_VOICES],
    filter_regs: FilterRegs,
    bridge: ClockBridge,
    sync: SyncPulse,
    baseline: BaselinePreset,
}

impl<C: SidBackend> SidSurface<C> {
    /// Create a surface over a chip core, initially unconfigured.
    ///
    /// The first `process` call observes the sample rate and performs the
    /// initial configuration.
    pub fn new(chip: C) -> Self {
        SidSurface {
            chip,
            voice_regs: Default::default(),
            filter_regs: FilterRegs::new(),
            bridge: ClockBridge::new(),
            sync: SyncPulse::new(),
            baseline: BaselinePreset::default(),
        }
    }

    /// Replace the baseline preset applied after reconfiguration.
    pub fn set_baseline(&mut self, baseline: BaselinePreset) {
        self.baseline = baseline;
    }

    /// The clock bridge (cycle ratio, active clock, configured rate).
    pub fn bridge(&self) -> &ClockBridge {
        &self.bridge
    }

    /// Logical register state of one voice (for host-side indicators).
    pub fn voice_regs(&self, voice: usize) -> &VoiceRegs {
        &self.voice_regs[voice]
    }

    /// Logical register state of the filter stage.
    pub fn filter_regs(&self) -> &FilterRegs {
        &self.filter_regs
    }

    /// Borrow the chip core.
    pub fn chip(&self) -> &C {
        &self.chip
    }

    /// Full reconfiguration on a sample-rate change: reset the chip core,
    /// recompute the cycle ratio, reset every register set to power-on
    /// defaults and reapply the baseline preset.
    fn reconfigure(&mut self, sample_rate: f32) {
        self.bridge.reconfigure(sample_rate);
        self.chip.reset();
        self.chip.set_sampling_parameters(
            self.bridge.clock_hz(),
            SamplingQuality::Fast,
            sample_rate,
        );
        for regs in self.voice_regs.iter_mut() {
            regs.reset();
        }
        self.filter_regs.reset();
        self.baseline
            .apply(&mut self.voice_regs, &mut self.filter_regs);
    }

    /// Encode one voice's controls into its register set.
    fn update_voice(&mut self, voice: usize, controls: &VoiceControls) {
        let regs = &mut self.voice_regs[voice];

        let freq = encode::pitch_to_freq(controls.pitch.knob, controls.pitch.cv);
        regs.set_freq(encode::freq_to_reg(freq, self.bridge.clock_hz()));

        regs.set_pulse_width(encode::pulse_width(
            controls.pulse_width.knob,
            controls.pulse_width.cv,
        ));

        let mut waveform = ControlFlags::empty();
        if encode::switch_value(controls.wave_triangle.knob, controls.wave_triangle.cv) {
            waveform |= ControlFlags::WAVE_TRIANGLE;
        }
        if encode::switch_value(controls.wave_saw.knob, controls.wave_saw.cv) {
            waveform |= ControlFlags::WAVE_SAW;
        }
        if encode::switch_value(controls.wave_pulse.knob, controls.wave_pulse.cv) {
            waveform |= ControlFlags::WAVE_PULSE;
        }
        if encode::switch_value(controls.wave_noise.knob, controls.wave_noise.cv) {
            waveform |= ControlFlags::WAVE_NOISE;
        }
        regs.set_waveform(waveform);

        regs.set_gate(encode::switch_value(controls.gate.knob, controls.gate.cv));
        regs.set_sync(encode::switch_value(controls.sync.knob, controls.sync.cv));
        regs.set_ring_mod(encode::switch_value(
            controls.ring_mod.knob,
            controls.ring_mod.cv,
        ));
        regs.set_test(encode::switch_value(controls.test.knob, controls.test.cv));

        regs.set_attack(encode::envelope_rate(
            controls.attack.knob,
            controls.attack.cv,
        ));
        regs.set_decay(encode::envelope_rate(controls.decay.knob, controls.decay.cv));
        regs.set_sustain(encode::envelope_rate(
            controls.sustain.knob,
            controls.sustain.cv,
        ));
        regs.set_release(encode::envelope_rate(
            controls.release.knob,
            controls.release.cv,
        ));
    }

    /// Encode the filter controls into the filter register set.
    fn update_filter(&mut self, controls: &FilterControls) {
        let regs = &mut self.filter_regs;

        for (voice, input) in controls.filter_voice.iter().enumerate() {
            regs.set_voice_filtered(voice, encode::switch_value(input.knob, input.cv));
        }
        regs.set_mode_flag(
            FilterModeFlags::LOW_PASS,
            encode::switch_value(controls.low_pass.knob, controls.low_pass.cv),
        );
        regs.set_mode_flag(
            FilterModeFlags::BAND_PASS,
            encode::switch_value(controls.band_pass.knob, controls.band_pass.cv),
        );
        regs.set_mode_flag(
            FilterModeFlags::HIGH_PASS,
            encode::switch_value(controls.high_pass.knob, controls.high_pass.cv),
        );
        regs.set_mode_flag(
            FilterModeFlags::VOICE3_OFF,
            encode::switch_value(controls.voice3_off.knob, controls.voice3_off.cv),
        );
        regs.set_resonance(encode::nibble_value(
            controls.resonance.knob,
            controls.resonance.cv,
        ));
        regs.set_volume(encode::nibble_value(controls.volume.knob, controls.volume.cv));
    }

    /// Process one audio sample.
    ///
    /// Steps, in order: (1) reconfigure on sample-rate change; (2) encode
    /// all voice controls; (3) encode the filter controls; (4) realize the
    /// voice register sets, then the filter register set; (5) advance the
    /// chip by the bridged cycle count and read its sample; (6) convert to
    /// volts; (7) tick the sync pulse. No step may be skipped or
    /// reordered.
    pub fn process(&mut self, frame: &ControlFrame, sample_rate: f32) -> ProcessOutput {
        if self.bridge.needs_reconfigure(sample_rate) {
            self.reconfigure(sample_rate);
        }

        for voice in 0..NUM_VOICES {
            self.update_voice(voice, &frame.voices[voice]);
        }
        self.update_filter(&frame.filter);

        for voice in 0..NUM_VOICES {
            self.voice_regs[voice].realize(&mut self.chip, voice);
        }
        self.filter_regs.realize(&mut self.chip);

        self.chip.clock(self.bridge.cycles_per_sample());
        let sample = self.chip.output();
        let audio = sample as f32 * AUDIO_VOLTS / 32_768.0;

        let clock = self.sync.tick(sample_rate) * PULSE_VOLTS;

        ProcessOutput { audio, clock }
    }
}
