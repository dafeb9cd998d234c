//! SID Control Surface for MOS 6581 emulation cores
//!
//! A register-state synchronization and clock-domain bridging layer that sits
//! between continuous per-sample control signals (knob positions plus control
//! voltages) and a cycle-stepped SID emulation core. The chip core itself is
//! an external collaborator consumed through the narrow [`SidBackend`] trait;
//! this crate guarantees correct, minimal, and consistently ordered register
//! programming on top of it.
//!
//! # Features
//! - Pure control-to-register-field encoders (switch threshold, 1V/octave
//!   pitch, envelope rates, pulse width)
//! - Dirty-masked voice and filter register sets that commit only changed
//!   registers, in the hardware-mandated order
//! - Clock-domain bridge reconciling the host sample rate with the chip's
//!   fixed instruction clock
//! - 50Hz sync pulse generator decoupled from the chip clock
//! - Per-sample orchestration with a named baseline preset applied after
//!   every reconfiguration
//!
//! # Crate feature flags
//! - `wav-export` (default): offline WAV rendering helper (enables optional
//!   `hound` dep)
//!
//! # Quick start
//! ```no_run
//! use sid_surface::{ControlFrame, SidBackend, SidSurface};
//!
//! fn run<C: SidBackend>(chip: C) {
//!     let mut surface = SidSurface::new(chip);
//!     let mut frame = ControlFrame::default();
//!     frame.voices[0].gate.knob = 1.0;
//!     frame.voices[0].wave_pulse.knob = 1.0;
//!     let out = surface.process(&frame, 44_100.0);
//!     let _audio_volts = out.audio;
//!     let _clock_volts = out.clock;
//! }
//! ```

#![warn(missing_docs)]

pub mod chip; // SID backend contract and register map
pub mod clock; // Clock-Domain Bridge
pub mod controls; // Control input data model
pub mod encode; // Register Field Encoders
pub mod engine; // Per-Sample Orchestrator
pub mod regs; // Voice/Filter Register Sets
pub mod sync_pulse; // 50Hz Sync Pulse Generator
#[cfg(feature = "wav-export")]
pub mod wav; // Offline WAV rendering

/// Error types for control surface operations
#[derive(thiserror::Error, Debug)]
pub enum SidSurfaceError {
    /// Invalid configuration (e.g. non-positive sample rate)
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Error writing audio file
    #[error("Audio file write error: {0}")]
    AudioFileError(String),

    /// IO error from filesystem or device
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for control surface operations
pub type Result<T> = std::result::Result<T, SidSurfaceError>;

// Public API exports
pub use chip::{SamplingQuality, SidBackend};
pub use clock::{ChipClock, ClockBridge};
pub use controls::{ControlFrame, ControlInput, FilterControls, VoiceControls};
pub use engine::{BaselinePreset, ProcessOutput, SidSurface};
pub use regs::{ControlFlags, FilterRegs, VoiceRegs, NUM_VOICES};
pub use sync_pulse::{PulseGenerator, SyncPulse};
#[cfg(feature = "wav-export")]
pub use wav::render_wav;
