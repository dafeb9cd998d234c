//! Offline WAV Rendering
//!
//! Drives a [`SidSurface`] for a fixed number of samples with a constant
//! control frame and writes the audio output to a mono 16-bit WAV file.
//! Useful for regression captures and for auditioning control snapshots
//! without a host graph.

use std::path::Path;

use crate::chip::SidBackend;
use crate::controls::ControlFrame;
use crate::engine::SidSurface;
use crate::{Result, SidSurfaceError};

/// Render `num_samples` ticks of a constant control frame to a WAV file.
///
/// The audio output voltage (+-10V) is mapped back to full-scale 16-bit
/// samples. Fails on a non-positive sample rate or on file I/O problems.
pub fn render_wav<C: SidBackend, P: AsRef<Path>>(
    surface: &mut SidSurface<C>,
    frame: &ControlFrame,
    sample_rate: f32,
    num_samples: usize,
    path: P,
) -> Result<()> {
    if sample_rate <= 0.0 {
        return Err(SidSurfaceError::ConfigError(format!(
            "sample rate must be positive, got {sample_rate}"
        )));
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: sample_rate as u32,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| SidSurfaceError::AudioFileError(e.to_string()))?;

    for _ in 0..num_samples {
        let out = surface.process(frame, sample_rate);
        let sample = (out.audio / 10.0 * 32_767.0).clamp(-32_768.0, 32_767.0) as i16;
        writer
            .write_sample(sample)
            .map_err(|e| SidSurfaceError::AudioFileError(e.to_string()))?;
    }

    writer
        .finalize()
        .map_err(|e| SidSurfaceError::AudioFileError(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::SamplingQuality;

    /// Minimal backend producing a constant output level.
    struct FlatChip;

    impl SidBackend for FlatChip {
        fn reset(&mut self) {}
        fn set_sampling_parameters(&mut self, _: f32, _: SamplingQuality, _: f32) {}
        fn clock(&mut self, _: u32) {}
        fn output(&self) -> i16 {
            8_192
        }
        fn write_register(&mut self, _: u8, _: u8) {}
    }

    #[test]
    fn test_render_rejects_bad_sample_rate() {
        let mut surface = SidSurface::new(FlatChip);
        let frame = ControlFrame::default();
        let err = render_wav(&mut surface, &frame, 0.0, 10, "/tmp/unused.wav");
        assert!(matches!(err, Err(SidSurfaceError::ConfigError(_))));
    }

    #[test]
    fn test_render_writes_expected_length() {
        let dir = std::env::temp_dir().join("sid_surface_wav_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("flat.wav");

        let mut surface = SidSurface::new(FlatChip);
        let frame = ControlFrame::default();
        render_wav(&mut surface, &frame, 44_100.0, 441, &path).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.spec().sample_rate, 44_100);
        assert_eq!(reader.len(), 441);
    }
}
