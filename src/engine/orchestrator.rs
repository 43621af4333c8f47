//! Pipeline orchestration.
//!
//! Drives decode → trim → fingerprint per source, the all-pairs comparison,
//! and clustering, producing a [`RunReport`] for the presentation layer.
//!
//! Both per-file fingerprinting and pairwise comparison are pure functions
//! over immutable inputs, so each phase fans out over a rayon pool. Results
//! are collected back in canonical order (discovery order for files, pair
//! generation order for comparisons), which keeps the report deterministic
//! regardless of scheduling. Clustering waits for the full comparison phase;
//! that barrier is the pipeline's only synchronization point.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use super::cluster::build_clusters;
use super::compare::{compare, PairResult};
use super::fingerprint::{fingerprint, Fingerprint};
use super::trim::trim_silence;
use crate::scanner::{decode_file, AudioSource, DiscoverySet};

/// Engine configuration, threaded explicitly through the run.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    /// Trim leading/trailing silence before fingerprinting.
    pub trim_silence: bool,
    /// Collect per-pair diagnostics for verbose output.
    pub verbose: bool,
}

/// Soft per-file failure kinds.
///
/// Each kind has a stable numeric code used both as the progress marker and
/// in verbose error lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Decode failure, or not enough content left (post-trim) to fingerprint.
    NotAudio,
}

impl FailureKind {
    /// Stable numeric code for this kind.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::NotAudio => 2,
        }
    }

    /// Human-readable description used in verbose error lines.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::NotAudio => "is not audio",
        }
    }
}

/// Per-file outcome of the fingerprint phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Fingerprinted cleanly.
    Fingerprinted,
    /// Fingerprinted, but the decoder skipped corrupt packets on the way.
    FingerprintedWithNote,
    /// Excluded from comparison.
    Failed(FailureKind),
}

impl FileStatus {
    /// One-character progress marker for this outcome.
    #[must_use]
    pub fn marker(self) -> char {
        match self {
            Self::Fingerprinted => '.',
            Self::FingerprintedWithNote => ':',
            Self::Failed(kind) => (b'0' + kind.code()) as char,
        }
    }

    /// True when a fingerprint was produced.
    #[must_use]
    pub fn is_ok(self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// A source that could not be fingerprinted.
#[derive(Debug, Clone)]
pub struct FingerprintFailure {
    /// Path of the failing source.
    pub path: PathBuf,
    /// Why it failed.
    pub kind: FailureKind,
}

/// Results of the fingerprint phase, in discovery order.
#[derive(Debug)]
pub struct FingerprintPhase {
    /// Per-source status, indexed like the source list.
    pub statuses: Vec<FileStatus>,
    /// Per-source fingerprint; `None` where the status is a failure.
    pub fingerprints: Vec<Option<Fingerprint>>,
    /// Failures in discovery order.
    pub failures: Vec<FingerprintFailure>,
    /// Wall time of the phase.
    pub elapsed: Duration,
}

impl FingerprintPhase {
    /// Number of sources that produced a fingerprint.
    #[must_use]
    pub fn fingerprinted(&self) -> usize {
        self.fingerprints.iter().filter(|f| f.is_some()).count()
    }
}

/// Results of the comparison phase, in pair-generation order.
#[derive(Debug)]
pub struct ComparePhase {
    /// Number of unordered pairs classified: C(n, 2) over fingerprinted
    /// sources.
    pub pair_count: usize,
    /// Results for every pair that reached the full check, in generation
    /// order. Empty unless the run is verbose.
    pub diagnostics: Vec<PairResult>,
    /// Confirmed-duplicate edges.
    pub confirmed: Vec<(usize, usize)>,
    /// Wall time of the phase.
    pub elapsed: Duration,
}

/// One cluster, prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterReport {
    /// Member source indices, sorted by descending size (path as tie-break).
    pub members: Vec<usize>,
    /// Distinct root indices the members span, ascending.
    pub roots: Vec<usize>,
}

/// Everything the presentation layer needs about one run.
#[derive(Debug)]
pub struct RunReport {
    /// The discovered inputs the run operated on.
    pub set: DiscoverySet,
    /// Per-source status, discovery order.
    pub statuses: Vec<FileStatus>,
    /// Fingerprint failures, discovery order.
    pub failures: Vec<FingerprintFailure>,
    /// Sources that produced a fingerprint.
    pub fingerprinted: usize,
    /// Pairs classified.
    pub pair_count: usize,
    /// Stage-2 pair diagnostics (verbose runs only), generation order.
    pub diagnostics: Vec<PairResult>,
    /// Duplicate clusters, ordered by first-discovered member.
    pub clusters: Vec<ClusterReport>,
    /// Root indices involved in any cluster (all roots when there are no
    /// clusters), ascending.
    pub involved_roots: Vec<usize>,
    /// Wall time of the fingerprint phase.
    pub fingerprint_elapsed: Duration,
    /// Wall time of the comparison phase.
    pub compare_elapsed: Duration,
}

/// Sequences the pipeline end-to-end.
#[derive(Debug, Clone, Copy)]
pub struct Orchestrator {
    config: EngineConfig,
}

impl Orchestrator {
    /// Create an orchestrator with the given configuration.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Run decode → trim → fingerprint over every source, in parallel.
    #[must_use]
    pub fn fingerprint_phase(&self, sources: &[AudioSource]) -> FingerprintPhase {
        let start = Instant::now();

        let outcomes: Vec<(FileStatus, Option<Fingerprint>)> = sources
            .par_iter()
            .map(|source| self.fingerprint_source(source))
            .collect();

        let mut statuses = Vec::with_capacity(outcomes.len());
        let mut fingerprints = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (source, (status, fp)) in sources.iter().zip(outcomes) {
            if let FileStatus::Failed(kind) = status {
                failures.push(FingerprintFailure {
                    path: source.path.clone(),
                    kind,
                });
            }
            statuses.push(status);
            fingerprints.push(fp);
        }

        FingerprintPhase {
            statuses,
            fingerprints,
            failures,
            elapsed: start.elapsed(),
        }
    }

    /// Classify every unordered pair of fingerprinted sources, in parallel.
    #[must_use]
    pub fn compare_phase(&self, fingerprints: &[Option<Fingerprint>]) -> ComparePhase {
        let start = Instant::now();

        let indexed: Vec<(usize, &Fingerprint)> = fingerprints
            .iter()
            .enumerate()
            .filter_map(|(i, fp)| fp.as_ref().map(|f| (i, f)))
            .collect();

        // Generation order (i, j) with i earlier in discovery; this is the
        // canonical order for verbose diagnostics.
        let mut pairs = Vec::with_capacity(indexed.len() * indexed.len().saturating_sub(1) / 2);
        for (k, &(i, fp_a)) in indexed.iter().enumerate() {
            for &(j, fp_b) in &indexed[k + 1..] {
                pairs.push((i, j, fp_a, fp_b));
            }
        }

        let results: Vec<PairResult> = pairs
            .par_iter()
            .map(|&(i, j, fp_a, fp_b)| compare(i, j, fp_a, fp_b))
            .collect();

        let confirmed: Vec<(usize, usize)> = results
            .iter()
            .filter(|r| r.is_confirmed())
            .map(|r| (r.a, r.b))
            .collect();
        let diagnostics: Vec<PairResult> = if self.config.verbose {
            results
                .iter()
                .filter(|r| r.reached_full_check())
                .copied()
                .collect()
        } else {
            Vec::new()
        };

        log::debug!(
            "{} pair(s): {} reached the full check, {} confirmed",
            pairs.len(),
            results.iter().filter(|r| r.reached_full_check()).count(),
            confirmed.len()
        );

        ComparePhase {
            pair_count: pairs.len(),
            diagnostics,
            confirmed,
            elapsed: start.elapsed(),
        }
    }

    /// Cluster the confirmed edges and assemble the final report.
    #[must_use]
    pub fn build_report(
        &self,
        set: DiscoverySet,
        fp_phase: FingerprintPhase,
        cmp_phase: ComparePhase,
    ) -> RunReport {
        let clusters = build_clusters(set.sources.len(), cmp_phase.confirmed.iter().copied());

        let cluster_reports: Vec<ClusterReport> = clusters
            .iter()
            .map(|cluster| {
                let mut members = cluster.members.clone();
                members.sort_by(|&a, &b| {
                    let (sa, sb) = (&set.sources[a], &set.sources[b]);
                    sb.size.cmp(&sa.size).then_with(|| sa.path.cmp(&sb.path))
                });
                let mut roots: Vec<usize> =
                    cluster.members.iter().map(|&m| set.sources[m].root).collect();
                roots.sort_unstable();
                roots.dedup();
                ClusterReport { members, roots }
            })
            .collect();

        let involved_roots: Vec<usize> = if cluster_reports.is_empty() {
            (0..set.roots.len()).collect()
        } else {
            let mut roots: Vec<usize> = cluster_reports
                .iter()
                .flat_map(|c| c.roots.iter().copied())
                .collect();
            roots.sort_unstable();
            roots.dedup();
            roots
        };

        RunReport {
            fingerprinted: fp_phase.fingerprinted(),
            statuses: fp_phase.statuses,
            failures: fp_phase.failures,
            pair_count: cmp_phase.pair_count,
            diagnostics: cmp_phase.diagnostics,
            clusters: cluster_reports,
            involved_roots,
            fingerprint_elapsed: fp_phase.elapsed,
            compare_elapsed: cmp_phase.elapsed,
            set,
        }
    }

    /// Convenience: run all phases back to back.
    #[must_use]
    pub fn run(&self, set: DiscoverySet) -> RunReport {
        let fp_phase = self.fingerprint_phase(&set.sources);
        let cmp_phase = self.compare_phase(&fp_phase.fingerprints);
        self.build_report(set, fp_phase, cmp_phase)
    }

    /// Decode, optionally trim, and fingerprint a single source.
    fn fingerprint_source(&self, source: &AudioSource) -> (FileStatus, Option<Fingerprint>) {
        let audio = match decode_file(&source.path) {
            Ok(audio) => audio,
            Err(e) => {
                log::debug!("{}: {}", source.path.display(), e);
                return (FileStatus::Failed(FailureKind::NotAudio), None);
            }
        };

        let samples = if self.config.trim_silence {
            let trimmed = trim_silence(&audio.samples, audio.sample_rate);
            &audio.samples[trimmed.range]
        } else {
            &audio.samples[..]
        };

        match fingerprint(samples, audio.sample_rate) {
            Ok(fp) => {
                let status = if audio.corrupt_packets > 0 {
                    FileStatus::FingerprintedWithNote
                } else {
                    FileStatus::Fingerprinted
                };
                (status, Some(fp))
            }
            Err(e) => {
                log::debug!("{}: {}", source.path.display(), e);
                (FileStatus::Failed(FailureKind::NotAudio), None)
            }
        }
    }
}
