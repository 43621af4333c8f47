//! Source discovery and audio decoding.
//!
//! This module is the I/O boundary of the engine:
//! - [`walker`]: expand input arguments (files or directory trees) into a
//!   flat, deterministically ordered list of [`AudioSource`] candidates
//! - [`decoder`]: decode one file to mono PCM via symphonia
//!
//! Everything past this boundary operates on plain samples and metadata.

pub mod decoder;
pub mod walker;

use std::path::PathBuf;
use std::time::SystemTime;

pub use decoder::{decode_file, DecodeError, DecodedAudio};
pub use walker::discover;

/// One input file, as discovered.
///
/// Created during discovery, consumed once by fingerprinting, never mutated
/// afterward. `size` and `modified` are captured here and used only for
/// reporting.
#[derive(Debug, Clone)]
pub struct AudioSource {
    /// Path to the file; unique per source.
    pub path: PathBuf,
    /// File size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
    /// Index into [`DiscoverySet::roots`] of the input argument this source
    /// was found under.
    pub root: usize,
}

/// The outcome of discovery: input roots plus every candidate source.
#[derive(Debug, Clone)]
pub struct DiscoverySet {
    /// Input arguments in the order given on the command line.
    pub roots: Vec<PathBuf>,
    /// Candidate sources in discovery order (root order, lexical within a
    /// directory).
    pub sources: Vec<AudioSource>,
}

/// Fatal errors during discovery.
///
/// Any of these aborts the run before fingerprinting starts; per-file
/// problems inside a readable directory are soft and handled later.
#[derive(thiserror::Error, Debug)]
pub enum DiscoveryError {
    /// An input argument does not exist or cannot be opened at all.
    #[error("can't read {0}")]
    Unreadable(PathBuf),
}
