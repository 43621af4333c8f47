//! Shared test audio generation.
//!
//! Synthetic "recordings" are melodies: sine tones stepping every quarter
//! second. Two renderings of the same step sequence (at different sample
//! rates, gains or with padding) stand in for two encodings of the same
//! recording; different step sequences stand in for different recordings.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::path::Path;

/// Render a step sequence as mono samples.
pub fn melody(steps: &[f32], sample_rate: u32, amplitude: f32) -> Vec<f32> {
    let step_len = (sample_rate as f32 * 0.25) as usize;
    let mut out = Vec::with_capacity(steps.len() * step_len);
    for &freq in steps {
        for i in 0..step_len {
            let t = i as f32 / sample_rate as f32;
            out.push(amplitude * (2.0 * std::f32::consts::PI * freq * t).sin());
        }
    }
    out
}

/// A deterministic step sequence, long enough to fingerprint at 24+ steps.
pub fn scale_steps(n: usize) -> Vec<f32> {
    (0..n).map(|i| 220.0 * 1.12f32.powi((i % 16) as i32)).collect()
}

/// Digital silence of the given duration.
pub fn silence(secs: f32, sample_rate: u32) -> Vec<f32> {
    vec![0.0; (sample_rate as f32 * secs) as usize]
}

/// Write mono samples as a 16-bit PCM WAV file.
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer
            .write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
            .unwrap();
    }
    writer.finalize().unwrap();
}
