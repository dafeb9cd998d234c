//! Sync Pulse Generator
//!
//! A retriggerable pulse source emulating a 50Hz vertical-sync timing
//! reference, fully decoupled from the chip clock. The period is derived
//! from the elapsed sample count, never wall time: a fractional counter is
//! incremented once per sample and, on overflow, the period is subtracted
//! rather than reset, so phase error stays bounded by one sample across
//! non-integer period lengths.

/// Emulated vertical-sync frequency (Hz)
pub const PLAY_HZ: f32 = 50.0;

/// Width of one trigger pulse (seconds)
pub const TRIGGER_TIME: f32 = 1e-4;

/// Retriggerable fixed-width pulse.
///
/// `trigger` arms the pulse for a duration; `process` advances it by one
/// sample interval and reports the instantaneous output level, independent
/// of whether the pulse fired this sample or is still active from a
/// previous one.
#[derive(Debug, Clone, Copy, Default)]
pub struct PulseGenerator {
    remaining: f32,
}

impl PulseGenerator {
    /// Create an idle pulse generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the pulse for `duration` seconds. Retriggering extends a shorter
    /// remaining pulse, never shortens a longer one.
    pub fn trigger(&mut self, duration: f32) {
        if duration > self.remaining {
            self.remaining = duration;
        }
    }

    /// Advance by `delta_time` seconds and return the output level
    /// (1.0 while the pulse is active, 0.0 otherwise).
    pub fn process(&mut self, delta_time: f32) -> f32 {
        if self.remaining > 0.0 {
            self.remaining -= delta_time;
            1.0
        } else {
            0.0
        }
    }

    /// Cancel any active pulse.
    pub fn reset(&mut self) {
        self.remaining = 0.0;
    }
}

/// 50Hz sync pulse source driven by the host sample clock.
#[derive(Debug, Clone, Copy)]
pub struct SyncPulse {
    counter: f32,
    play_hz: f32,
    pulse: PulseGenerator,
    /// Total triggers fired (for position tracking)
    pulse_count: u64,
}

impl SyncPulse {
    /// Create a sync pulse source at the default 50Hz rate.
    pub fn new() -> Self {
        Self::with_frequency(PLAY_HZ)
    }

    /// Create a sync pulse source at a custom low frequency.
    pub fn with_frequency(play_hz: f32) -> Self {
        SyncPulse {
            counter: 0.0,
            play_hz,
            pulse: PulseGenerator::new(),
            pulse_count: 0,
        }
    }

    /// Advance by one sample and return the instantaneous output level
    /// (0.0 or 1.0).
    ///
    /// The period follows the current sample rate, so a rate change simply
    /// stretches or shrinks subsequent periods without a reset.
    pub fn tick(&mut self, sample_rate: f32) -> f32 {
        let period = sample_rate / self.play_hz;
        if self.counter > period {
            self.pulse.trigger(TRIGGER_TIME);
            self.counter -= period;
            self.pulse_count += 1;
        }
        self.counter += 1.0;
        self.pulse.process(1.0 / sample_rate)
    }

    /// Total triggers fired since creation or reset.
    pub fn get_pulse_count(&self) -> u64 {
        self.pulse_count
    }

    /// Reset counter, pulse state and trigger count.
    pub fn reset(&mut self) {
        self.counter = 0.0;
        self.pulse.reset();
        self.pulse_count = 0;
    }
}

impl Default for SyncPulse {
    fn default() -> Self {
        Self::new()
    }
}
