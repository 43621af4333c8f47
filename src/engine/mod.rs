//! The duplicate-detection engine.
//!
//! Pure, I/O-free stages plus the orchestrator that sequences them:
//!
//! - [`trim`]: strip leading/trailing silence from a PCM signal
//! - [`fingerprint`]: reduce a signal to a fixed 640-bit acoustic summary
//! - [`compare`]: two-stage classification of fingerprint pairs
//! - [`cluster`]: union-find over confirmed pairs
//! - [`orchestrator`]: decode/trim/fingerprint fan-out, the pair phase, and
//!   report assembly

pub mod cluster;
pub mod compare;
pub mod fingerprint;
pub mod orchestrator;
pub mod trim;

pub use cluster::{build_clusters, Cluster};
pub use compare::{compare, MatchClass, PairResult, CONFIRM_THRESHOLD, POSSIBLE_THRESHOLD};
pub use fingerprint::{fingerprint, Fingerprint, FingerprintError, FINGERPRINT_BITS};
pub use orchestrator::{
    ClusterReport, EngineConfig, FailureKind, FileStatus, FingerprintFailure, Orchestrator,
    RunReport,
};
pub use trim::{trim_silence, Trimmed};
