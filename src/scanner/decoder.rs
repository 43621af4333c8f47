//! Audio decoding via symphonia.
//!
//! Decodes any container/codec the enabled symphonia features cover into a
//! mono f32 sample stream plus its sample rate. Multi-channel audio is
//! averaged down to mono; the fingerprint only cares about spectral shape.
//!
//! Recoverable packet-level decode errors are counted rather than fatal —
//! a damaged frame in an otherwise fine file should not exclude it — and the
//! count is surfaced so the progress stream can mark the file as decoded
//! with reservations.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

/// Decoded audio, mono.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Interleaved-averaged mono samples in [-1, 1].
    pub samples: Vec<f32>,
    /// Native sample rate of the source.
    pub sample_rate: u32,
    /// Packets that failed to decode and were skipped.
    pub corrupt_packets: usize,
}

/// Errors decoding one file.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file could not be opened.
    #[error("cannot open {0}")]
    Open(std::path::PathBuf),

    /// The file is not decodable audio (unknown format, no audio track, or
    /// no decodable content).
    #[error("not audio")]
    NotAudio,
}

/// Decode `path` to mono PCM.
///
/// # Errors
///
/// [`DecodeError::Open`] if the file cannot be opened at all;
/// [`DecodeError::NotAudio`] if symphonia cannot probe a format, find an
/// audio track, or decode a single sample out of it.
pub fn decode_file(path: &Path) -> Result<DecodedAudio, DecodeError> {
    let file = File::open(path).map_err(|_| DecodeError::Open(path.to_path_buf()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|_| DecodeError::NotAudio)?;
    let mut format = probed.format;

    let track = format.default_track().ok_or(DecodeError::NotAudio)?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(DecodeError::NotAudio)?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|_| DecodeError::NotAudio)?;

    let mut samples = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut corrupt_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            // End of stream surfaces as an I/O error in symphonia 0.5.
            Err(SymphoniaError::IoError(_)) => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                log::debug!("{}: stopping on format error: {}", path.display(), e);
                break;
            }
        };
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let buf = sample_buf.get_or_insert_with(|| {
                    SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec())
                });
                let channels = decoded.spec().channels.count().max(1);
                buf.copy_interleaved_ref(decoded);
                for frame in buf.samples().chunks_exact(channels) {
                    let sum: f32 = frame.iter().sum();
                    samples.push(sum / channels as f32);
                }
            }
            Err(SymphoniaError::DecodeError(e)) => {
                // Damaged packet; skip it and keep going.
                log::debug!("{}: skipping corrupt packet: {}", path.display(), e);
                corrupt_packets += 1;
            }
            Err(_) => return Err(DecodeError::NotAudio),
        }
    }

    if samples.is_empty() {
        return Err(DecodeError::NotAudio);
    }

    log::debug!(
        "{}: decoded {} mono samples at {} Hz ({} corrupt packet(s))",
        path.display(),
        samples.len(),
        sample_rate,
        corrupt_packets
    );

    Ok(DecodedAudio {
        samples,
        sample_rate,
        corrupt_packets,
    })
}
