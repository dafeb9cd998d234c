//! Register Field Encoders
//!
//! Pure functions mapping a knob position plus an optional control voltage
//! into a clamped, discretized chip register field. All inputs are
//! pre-clamped by range, so encoding cannot fail.
//!
//! The CV combination rules reproduce the historical panel behavior:
//! switches treat one volt as logic high, envelope rates keep the original
//! two-stage scaling, and pitch follows the 1V/octave convention.

/// Reference frequency for pitch 0 semitones (middle C, Hz)
pub const FREQ_C4: f32 = 261.6256;

/// Logic-high threshold for switch CV inputs (one volt equals logic high)
pub const SWITCH_THRESHOLD: f32 = 1.0;

#[inline]
fn clamp(val: f32, lo: f32, hi: f32) -> f32 {
    val.max(lo).min(hi)
}

/// Combine a switch knob with its CV and threshold to a boolean.
///
/// `cv` is `None` when the input jack is disconnected, in which case the
/// voltage contribution is zero. The threshold is inclusive: exactly one
/// volt reads as high. No hysteresis; the value is recomputed fresh every
/// sample.
#[inline]
pub fn switch_value(knob: f32, cv: Option<f32>) -> bool {
    knob + cv.unwrap_or(0.0) >= SWITCH_THRESHOLD
}

/// Encode an envelope-rate knob (0..1) plus CV into a 4-bit rate (0-15).
///
/// Preserves the original two-stage scaling: the knob is scaled by 15, the
/// CV divided by 10 is added, and the sum is scaled by 15 again before
/// clamping to [0, 15] and truncating. The effective curve is therefore
/// `knob * 225 + cv * 1.5`, saturating almost immediately for knob values
/// above 1/15. Downstream calibration depends on this curve; do not
/// "correct" it.
#[inline]
pub fn envelope_rate(knob: f32, cv: Option<f32>) -> u8 {
    let mut val = knob * 15.0;
    if let Some(voltage) = cv {
        val += voltage / 10.0;
    }
    clamp(val * 15.0, 0.0, 15.0) as u8
}

/// Convert a pitch knob (semitones) plus 1V/octave CV into a frequency in Hz.
///
/// Twelve semitones per volt, referenced to [`FREQ_C4`] at zero.
#[inline]
pub fn pitch_to_freq(semitones: f32, cv: Option<f32>) -> f32 {
    let semis = semitones + 12.0 * cv.unwrap_or(0.0);
    FREQ_C4 * (semis / 12.0).exp2()
}

/// Convert a frequency in Hz into the SID's 16-bit frequency register.
///
/// The chip derives its oscillator frequency as `reg * clock / 2^24`, so the
/// inverse is `round(freq * 2^24 / clock)`, saturating at the register
/// width.
#[inline]
pub fn freq_to_reg(freq: f32, clock_hz: f32) -> u16 {
    let reg = (freq * 16_777_216.0 / clock_hz).round();
    clamp(reg, 0.0, u16::MAX as f32) as u16
}

/// Encode a bipolar pulse-width knob (-1..1) plus CV into the 12-bit
/// pulse-width register (0-4095).
///
/// CV is scaled so a full-swing +-5V signal spans the whole range.
#[inline]
pub fn pulse_width(knob: f32, cv: Option<f32>) -> u16 {
    let val = clamp(knob + cv.unwrap_or(0.0) / 5.0, -1.0, 1.0);
    ((val + 1.0) * 0.5 * 4095.0).round() as u16
}

/// Encode a nibble knob (0..15) plus CV into a 4-bit value (0-15).
///
/// Used for filter resonance and master volume. CV follows the 10V
/// full-scale convention (10V adds the full range).
#[inline]
pub fn nibble_value(knob: f32, cv: Option<f32>) -> u8 {
    let val = knob + cv.unwrap_or(0.0) * 1.5;
    clamp(val, 0.0, 15.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_switch_threshold_inclusive() {
        assert!(switch_value(0.0, Some(1.0)));
        assert!(!switch_value(0.0, Some(0.999)));
        assert!(switch_value(1.0, None));
        assert!(!switch_value(0.5, None));
    }

    #[test]
    fn test_switch_disconnected_cv_is_zero() {
        assert!(!switch_value(0.9, None));
        assert!(switch_value(0.9, Some(0.2)));
    }

    #[test]
    fn test_envelope_rate_double_scaling() {
        // knob 1.0 saturates: 1.0 * 15 * 15 clamps to 15
        assert_eq!(envelope_rate(1.0, None), 15);
        // knob 0 with no CV stays at the floor
        assert_eq!(envelope_rate(0.0, None), 0);
        // the second *15 stage makes small knob values jump quickly:
        // 0.03 * 15 * 15 = 6.75, truncated to 6
        assert_eq!(envelope_rate(0.03, None), 6);
        // CV path: (0 * 15 + 5/10) * 15 = 7.5, truncated to 7
        assert_eq!(envelope_rate(0.0, Some(5.0)), 7);
    }

    #[test]
    fn test_envelope_rate_clamps_negative() {
        assert_eq!(envelope_rate(0.0, Some(-10.0)), 0);
    }

    #[test]
    fn test_pitch_to_freq_octaves() {
        assert_relative_eq!(pitch_to_freq(0.0, None), FREQ_C4);
        assert_relative_eq!(pitch_to_freq(12.0, None), FREQ_C4 * 2.0, epsilon = 1e-3);
        // 1V/octave: 1V of CV equals 12 semitones
        assert_relative_eq!(
            pitch_to_freq(0.0, Some(1.0)),
            pitch_to_freq(12.0, None),
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_freq_to_reg_reference() {
        // round(261.6256 * 2^24 / 1_022_727) = 4292
        let reg = freq_to_reg(FREQ_C4, crate::clock::CLOCK_HZ_NTSC);
        assert_eq!(reg, 4292);
    }

    #[test]
    fn test_freq_to_reg_saturates() {
        assert_eq!(freq_to_reg(1.0e9, crate::clock::CLOCK_HZ_NTSC), u16::MAX);
        assert_eq!(freq_to_reg(0.0, crate::clock::CLOCK_HZ_NTSC), 0);
    }

    #[test]
    fn test_pulse_width_range() {
        assert_eq!(pulse_width(-1.0, None), 0);
        assert_eq!(pulse_width(1.0, None), 4095);
        assert_eq!(pulse_width(0.0, None), 2048);
        // +5V CV pushes a centered knob to full scale
        assert_eq!(pulse_width(0.0, Some(5.0)), 4095);
    }

    #[test]
    fn test_nibble_value() {
        assert_eq!(nibble_value(15.0, None), 15);
        assert_eq!(nibble_value(0.0, Some(10.0)), 15);
        assert_eq!(nibble_value(7.9, None), 7);
        assert_eq!(nibble_value(-3.0, None), 0);
    }
}
