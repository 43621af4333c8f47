//! Acoustic fingerprinting.
//!
//! A fingerprint is a fixed 640-bit summary of a recording's spectral shape
//! over time. It is built so that two encodings of the *same* recording land
//! within a small Hamming distance of each other, while different
//! performances (even of the same piece) do not:
//!
//! 1. the signal is resampled to a fixed analysis rate (11 025 Hz, mono);
//! 2. Hann-windowed FFT frames yield per-frame energies in 17 log-spaced
//!    frequency bands between 50 Hz and 5 kHz;
//! 3. frames are averaged into 41 time slots spread proportionally over the
//!    whole signal, so small duration differences between encodings stretch
//!    rather than shift the grid;
//! 4. each bit is the sign of a second-order difference across time and
//!    band: `(L[t+1][b] - L[t][b]) - (L[t+1][b+1] - L[t][b+1])` on log
//!    energies. Difference signs survive gain changes and the broad spectral
//!    tilt lossy codecs introduce, while absolute levels do not.
//!
//! 40 slot deltas x 16 band pairs = 640 bits, stored as ten 64-bit words.

use rustfft::{num_complex::Complex, FftPlanner};
use thiserror::Error;

/// Width of every fingerprint, in bits.
pub const FINGERPRINT_BITS: usize = 640;

/// Bits per time row (one row per slot delta).
pub(crate) const ROW_BITS: usize = 16;

/// Number of time rows in a fingerprint.
pub(crate) const TIME_ROWS: usize = FINGERPRINT_BITS / ROW_BITS;

const WORDS: usize = FINGERPRINT_BITS / 64;
const TIME_SLOTS: usize = TIME_ROWS + 1;
const BANDS: usize = ROW_BITS + 1;

/// Analysis sample rate. Everything is resampled here first.
const TARGET_RATE: u32 = 11_025;

const FRAME_SIZE: usize = 2048;
const HOP_SIZE: usize = 1024;

/// Band edges are log-spaced across this range.
const BAND_LOW_HZ: f32 = 50.0;
const BAND_HIGH_HZ: f32 = 5_000.0;

/// Floor added before taking log energies.
const ENERGY_FLOOR: f32 = 1e-9;

/// Errors from fingerprinting one signal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FingerprintError {
    /// The signal is too short to fill the analysis grid.
    #[error("not enough audio to fingerprint ({frames} frames, need {needed})")]
    NotEnoughAudio {
        /// FFT frames the signal yielded.
        frames: usize,
        /// Frames required to fill every time slot.
        needed: usize,
    },
}

/// Fixed-width bit-vector fingerprint of one recording.
///
/// Immutable once computed. Fingerprints are only comparable when produced
/// under the same engine configuration (same trim setting).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    words: [u64; WORDS],
}

impl Fingerprint {
    /// Hamming distance to another fingerprint, in bits out of
    /// [`FINGERPRINT_BITS`].
    #[must_use]
    pub fn hamming(&self, other: &Fingerprint) -> u32 {
        self.words
            .iter()
            .zip(other.words.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }

    /// The 16 bits of time row `t` (0..[`TIME_ROWS`]).
    ///
    /// Rows are the unit of the comparison offset search: shifting by one
    /// row shifts the fingerprint by one time slot.
    #[must_use]
    pub(crate) fn row(&self, t: usize) -> u16 {
        debug_assert!(t < TIME_ROWS);
        // Four 16-bit rows per 64-bit word.
        ((self.words[t / 4] >> ((t % 4) * 16)) & 0xffff) as u16
    }

    /// Assemble a fingerprint from raw time rows. Test and bench scaffolding.
    #[must_use]
    pub(crate) fn from_rows(rows: &[u16; TIME_ROWS]) -> Self {
        let mut words = [0u64; WORDS];
        for (t, &row) in rows.iter().enumerate() {
            words[t / 4] |= (row as u64) << ((t % 4) * 16);
        }
        Self { words }
    }

    fn set_bit(&mut self, idx: usize) {
        self.words[idx / 64] |= 1u64 << (idx % 64);
    }
}

/// Fingerprint a mono PCM signal.
///
/// Deterministic: identical input always produces identical bits.
///
/// # Errors
///
/// [`FingerprintError::NotEnoughAudio`] when the signal (after any trimming
/// the caller applied) yields fewer FFT frames than time slots — at the
/// analysis rate that is roughly four seconds of audio.
pub fn fingerprint(samples: &[f32], sample_rate: u32) -> Result<Fingerprint, FingerprintError> {
    let samples = resample(samples, sample_rate, TARGET_RATE);
    let energies = band_energies(&samples);

    if energies.len() < TIME_SLOTS {
        return Err(FingerprintError::NotEnoughAudio {
            frames: energies.len(),
            needed: TIME_SLOTS,
        });
    }

    let slots = slot_averages(&energies);
    Ok(encode_bits(&slots))
}

/// Linear-interpolation resampler, mono.
fn resample(x: &[f32], sr_in: u32, sr_out: u32) -> Vec<f32> {
    if x.is_empty() || sr_in == 0 || sr_in == sr_out {
        return x.to_vec();
    }
    let ratio = sr_out as f64 / sr_in as f64;
    let n_out = ((x.len() as f64) * ratio).floor().max(1.0) as usize;
    let mut y = Vec::with_capacity(n_out);
    for i in 0..n_out {
        let pos = i as f64 / ratio;
        let i0 = pos.floor() as usize;
        if i0 + 1 >= x.len() {
            y.push(x[x.len() - 1]);
        } else {
            let t = (pos - i0 as f64) as f32;
            y.push(x[i0] + (x[i0 + 1] - x[i0]) * t);
        }
    }
    y
}

/// Per-frame log band energies at the analysis rate.
fn band_energies(samples: &[f32]) -> Vec<[f32; BANDS]> {
    if samples.len() < FRAME_SIZE {
        return Vec::new();
    }

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(FRAME_SIZE);
    let window = hann_window(FRAME_SIZE);
    let edges = band_edge_bins();

    let n_frames = (samples.len() - FRAME_SIZE) / HOP_SIZE + 1;
    let mut frames = Vec::with_capacity(n_frames);
    let mut buf = vec![Complex::new(0.0f32, 0.0); FRAME_SIZE];

    for f in 0..n_frames {
        let start = f * HOP_SIZE;
        for (i, slot) in buf.iter_mut().enumerate() {
            *slot = Complex::new(samples[start + i] * window[i], 0.0);
        }
        fft.process(&mut buf);

        let mut bands = [0.0f32; BANDS];
        for (b, band) in bands.iter_mut().enumerate() {
            let mut energy = 0.0;
            for bin in edges[b]..edges[b + 1] {
                energy += buf[bin].norm_sqr();
            }
            *band = (energy + ENERGY_FLOOR).ln();
        }
        frames.push(bands);
    }
    frames
}

/// Average the frame grid into [`TIME_SLOTS`] duration-proportional slots.
fn slot_averages(frames: &[[f32; BANDS]]) -> [[f32; BANDS]; TIME_SLOTS] {
    let mut slots = [[0.0f32; BANDS]; TIME_SLOTS];
    let n = frames.len();
    for (s, slot) in slots.iter_mut().enumerate() {
        let start = s * n / TIME_SLOTS;
        let end = ((s + 1) * n / TIME_SLOTS).max(start + 1);
        for frame in &frames[start..end] {
            for (b, v) in frame.iter().enumerate() {
                slot[b] += v;
            }
        }
        let count = (end - start) as f32;
        for v in slot.iter_mut() {
            *v /= count;
        }
    }
    slots
}

/// Difference-sign encoding of the slot grid into the final bit vector.
fn encode_bits(slots: &[[f32; BANDS]; TIME_SLOTS]) -> Fingerprint {
    let mut fp = Fingerprint { words: [0; WORDS] };
    for t in 0..TIME_ROWS {
        for b in 0..ROW_BITS {
            let d = (slots[t + 1][b] - slots[t][b]) - (slots[t + 1][b + 1] - slots[t][b + 1]);
            if d > 0.0 {
                fp.set_bit(t * ROW_BITS + b);
            }
        }
    }
    fp
}

fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos())
        })
        .collect()
}

/// FFT bin index of each band edge (BANDS + 1 edges, strictly increasing).
fn band_edge_bins() -> [usize; BANDS + 1] {
    let mut edges = [0usize; BANDS + 1];
    let ratio = BAND_HIGH_HZ / BAND_LOW_HZ;
    let mut prev = 0usize;
    for (i, edge) in edges.iter_mut().enumerate() {
        let hz = BAND_LOW_HZ * ratio.powf(i as f32 / BANDS as f32);
        let bin = (hz * FRAME_SIZE as f32 / TARGET_RATE as f32).round() as usize;
        // Edges must advance by at least one bin to keep every band non-empty.
        *edge = bin.max(prev + usize::from(i > 0)).min(FRAME_SIZE / 2);
        prev = *edge;
    }
    edges
}
