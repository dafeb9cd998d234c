//! Voice and Filter Register Sets
//!
//! Dirty-masked caches of the SID's logical register state. Setters compare
//! the new value against the stored one and mark the owning chip register
//! dirty on change; `realize` commits only the dirty registers to the
//! backend, in the hardware-mandated order, then clears the mask.
//!
//! Dirty tracking keeps the emulated chip core (the most expensive part of
//! the hot path) from seeing redundant register churn that on real hardware
//! could restart envelope or waveform state.

mod filter;
mod voice;

pub use filter::{FilterDirty, FilterModeFlags, FilterRegs, RoutingFlags, VOLUME_MAX};
pub use voice::{ControlFlags, VoiceDirty, VoiceRegs, SUSTAIN_MAX};

/// Number of synthesis voices on the chip
pub const NUM_VOICES: usize = 3;
