//! Leading/trailing silence removal.
//!
//! Silence at the edges of a recording shifts its fingerprint in time, so two
//! otherwise identical files can fail to match when one carries a few seconds
//! of lead-in. Trimming removes low-energy prefixes and suffixes before
//! fingerprinting; the comparison offset search then only has to absorb small
//! residual shifts.
//!
//! The trimmer is a pure function over mono PCM. All tuning lives in fixed
//! internal constants; the only user-facing switch is whether trimming runs
//! at all.

use std::ops::Range;

/// Length of one energy-analysis window, in seconds.
const WINDOW_SECS: f32 = 0.02;

/// RMS level below which a window counts as silent (~-49 dBFS).
const SILENCE_RMS: f32 = 0.0035;

/// Minimum length of a silent run before anything is cut.
///
/// Shorter quiet edges are part of the performance, not packaging, and are
/// left alone.
const MIN_RUN_SECS: f32 = 0.3;

/// Result of trimming one signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Trimmed {
    /// Retained interior of the input, as a sample range.
    pub range: Range<usize>,
    /// Fraction of the input that was removed (0.0 when nothing was cut).
    pub trimmed_ratio: f32,
}

impl Trimmed {
    /// True if trimming removed the entire signal.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Number of samples retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.range.len()
    }
}

/// Remove leading and trailing low-energy regions from `samples`.
///
/// A prefix (or suffix) is cut only when its windows all stay below
/// [`SILENCE_RMS`] and the run lasts at least [`MIN_RUN_SECS`]. A signal that
/// is silent throughout yields an empty range.
#[must_use]
pub fn trim_silence(samples: &[f32], sample_rate: u32) -> Trimmed {
    let window = ((sample_rate as f32 * WINDOW_SECS) as usize).max(1);
    let min_run = (sample_rate as f32 * MIN_RUN_SECS) as usize;

    let leading = silent_prefix_len(samples, window);
    let start = if leading >= min_run { leading } else { 0 };

    // Trailing run, measured over the part that survives the leading cut.
    let rest = &samples[start..];
    let trailing = silent_suffix_len(rest, window);
    let end = if trailing >= min_run {
        start + rest.len() - trailing
    } else {
        samples.len()
    };

    let range = if start >= end { 0..0 } else { start..end };
    let kept = range.len();
    let trimmed_ratio = if samples.is_empty() {
        0.0
    } else {
        1.0 - kept as f32 / samples.len() as f32
    };

    if trimmed_ratio > 0.0 {
        log::debug!(
            "trimmed {:.1}% of {} samples ({}..{})",
            trimmed_ratio * 100.0,
            samples.len(),
            range.start,
            range.end
        );
    }

    Trimmed {
        range,
        trimmed_ratio,
    }
}

/// Length of the silent run at the start of `samples`, in samples.
fn silent_prefix_len(samples: &[f32], window: usize) -> usize {
    let mut len = 0;
    for chunk in samples.chunks(window) {
        if rms(chunk) >= SILENCE_RMS {
            break;
        }
        len += chunk.len();
    }
    len
}

/// Length of the silent run at the end of `samples`, in samples.
fn silent_suffix_len(samples: &[f32], window: usize) -> usize {
    let mut len = 0;
    for chunk in samples.rchunks(window) {
        if rms(chunk) >= SILENCE_RMS {
            break;
        }
        len += chunk.len();
    }
    len
}

fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|&x| x * x).sum();
    (sum_sq / samples.len() as f32).sqrt()
}
