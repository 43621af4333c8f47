//! Progress and result presentation.
//!
//! Two output surfaces share the same line formats:
//!
//! - the console, through [`Reporter`], coloured via yansi (honouring the
//!   global colour condition set at startup)
//! - an optional report file, through [`render_summary`], always plain text
//!
//! The progress stream is intentionally terse: a phase announcement, one
//! marker character per file, and a wall-time line per phase. Verbose runs
//! additionally get per-file error lines and per-pair match diagnostics.

use std::time::Duration;

use chrono::{DateTime, Local};
use yansi::Paint;

use crate::engine::{
    FileStatus, FingerprintFailure, PairResult, RunReport, FINGERPRINT_BITS,
};
use crate::scanner::AudioSource;

/// Console progress writer.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    verbose: bool,
}

impl Reporter {
    /// Create a reporter; `verbose` enables error and diagnostic lines.
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Announce the fingerprint phase.
    pub fn fingerprint_start(&self, files: usize) {
        println!("fingerprinting {files} files");
    }

    /// One marker per file, discovery order, on a single line.
    pub fn progress(&self, statuses: &[FileStatus]) {
        if statuses.is_empty() {
            return;
        }
        let markers: String = statuses.iter().map(|s| s.marker()).collect();
        println!("{markers}");
    }

    /// Per-file failure lines (verbose only).
    pub fn failures(&self, failures: &[FingerprintFailure]) {
        if !self.verbose {
            return;
        }
        for failure in failures {
            let line = format!(
                "ERROR {}  {} {}",
                failure.kind.code(),
                failure.path.display(),
                failure.kind.describe()
            );
            println!("{}", line.red());
        }
    }

    /// Wall time of the fingerprint phase.
    pub fn fingerprint_elapsed(&self, elapsed: Duration) {
        println!("fingerprinting took {:.2} seconds", elapsed.as_secs_f64());
    }

    /// Announce the comparison phase.
    pub fn compare_start(&self, pairs: usize) {
        println!("comparing {pairs} pairs");
    }

    /// Per-pair diagnostics for pairs that reached the full check
    /// (verbose only).
    pub fn diagnostics(&self, results: &[PairResult]) {
        if !self.verbose {
            return;
        }
        for result in results {
            println!("{}", diagnostic_line(result).dim());
        }
    }

    /// Wall time of the comparison phase.
    pub fn compare_elapsed(&self, elapsed: Duration) {
        println!("comparisons took {:.2} seconds", elapsed.as_secs_f64());
    }

    /// The final cluster summary, coloured.
    pub fn summary(&self, report: &RunReport) {
        for line in summary_lines(report) {
            if line.starts_with("found ") {
                println!("{}", line.bold());
            } else if line.starts_with("---") {
                println!("{}", line.cyan());
            } else {
                println!("{line}");
            }
        }
    }
}

/// Verbose line for one pair that reached the full check.
fn diagnostic_line(result: &PairResult) -> String {
    format!("possible match: {} / {}", result.distance, FINGERPRINT_BITS)
}

/// Render the cluster summary as plain text, for the report file.
#[must_use]
pub fn render_summary(report: &RunReport) -> String {
    let mut text = summary_lines(report).join("\n");
    text.push('\n');
    text
}

/// The summary, line by line: a blank separator, a header naming the
/// involved roots, then one block per cluster with members largest-first.
fn summary_lines(report: &RunReport) -> Vec<String> {
    // Blank line separating the summary from the timing lines above it.
    let mut lines = vec![String::new()];

    let header = match report.clusters.len() {
        0 => "found no clusters in: ".to_string(),
        1 => "found one cluster in: ".to_string(),
        k => format!("found {k} clusters in: "),
    };
    lines.push(header);
    for &root in &report.involved_roots {
        lines.push(format!("   {}", report.set.roots[root].display()));
    }

    let size_width = report
        .clusters
        .iter()
        .flat_map(|c| c.members.iter())
        .map(|&m| report.set.sources[m].size)
        .max()
        .map_or(1, |max| max.to_string().len());

    for cluster in &report.clusters {
        lines.push(String::new());
        lines.push(format!("--- {} duplicates ---", cluster.members.len()));
        for &member in &cluster.members {
            lines.push(member_line(&report.set.sources[member], size_width));
        }
    }

    lines
}

fn member_line(source: &AudioSource, size_width: usize) -> String {
    let modified: DateTime<Local> = source.modified.into();
    format!(
        "{} {:>size_width$}  {}",
        modified.format("%Y-%m-%d %H:%M"),
        source.size,
        source.path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ClusterReport;
    use crate::scanner::DiscoverySet;
    use std::path::PathBuf;
    use std::time::{Duration as StdDuration, UNIX_EPOCH};

    fn source(path: &str, size: u64, root: usize) -> AudioSource {
        AudioSource {
            path: PathBuf::from(path),
            size,
            modified: UNIX_EPOCH + StdDuration::from_secs(1_700_000_000),
            root,
        }
    }

    fn report_with(clusters: Vec<ClusterReport>, involved_roots: Vec<usize>) -> RunReport {
        let set = DiscoverySet {
            roots: vec![PathBuf::from("/music"), PathBuf::from("/backup")],
            sources: vec![
                source("/music/a.mp3", 4_000_000, 0),
                source("/backup/a.flac", 21_000_000, 1),
                source("/music/b.mp3", 3_000_000, 0),
            ],
        };
        let n = set.sources.len();
        RunReport {
            set,
            statuses: vec![FileStatus::Fingerprinted; n],
            failures: Vec::new(),
            fingerprinted: n,
            pair_count: n * (n - 1) / 2,
            diagnostics: Vec::new(),
            clusters,
            involved_roots,
            fingerprint_elapsed: Duration::from_millis(10),
            compare_elapsed: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_no_clusters_summary_line_sequence() {
        // Exact sequence: a blank separator first, then the header with its
        // trailing space, then one indented line per root.
        let report = report_with(Vec::new(), vec![0, 1]);
        let lines = summary_lines(&report);

        assert_eq!(
            lines,
            vec![
                String::new(),
                "found no clusters in: ".to_string(),
                "   /music".to_string(),
                "   /backup".to_string(),
            ]
        );
    }

    #[test]
    fn test_one_cluster_header_is_singular() {
        let cluster = ClusterReport {
            members: vec![1, 0],
            roots: vec![0, 1],
        };
        let report = report_with(vec![cluster], vec![0, 1]);
        let lines = summary_lines(&report);

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "found one cluster in: ");
        assert!(lines.contains(&"--- 2 duplicates ---".to_string()));
    }

    #[test]
    fn test_member_lines_keep_given_order_and_format() {
        let cluster = ClusterReport {
            members: vec![1, 0],
            roots: vec![0, 1],
        };
        let report = report_with(vec![cluster], vec![0, 1]);
        let rendered = render_summary(&report);
        let member_lines: Vec<&str> = rendered
            .lines()
            .filter(|l| l.ends_with(".mp3") || l.ends_with(".flac"))
            .collect();

        // Larger file first, as provided by the cluster report.
        assert!(member_lines[0].ends_with("/backup/a.flac"));
        assert!(member_lines[1].ends_with("/music/a.mp3"));
        // Timestamp prefix: YYYY-MM-DD HH:MM.
        for line in &member_lines {
            let bytes = line.as_bytes();
            assert_eq!(bytes[4], b'-');
            assert_eq!(bytes[7], b'-');
            assert_eq!(bytes[10], b' ');
            assert_eq!(bytes[13], b':');
        }
        // Sizes right-aligned to a shared width: the path column starts at
        // the same offset on every line.
        let path_col: Vec<usize> = member_lines
            .iter()
            .map(|l| l.find("  /").expect("two-space column separator"))
            .collect();
        assert_eq!(path_col[0], path_col[1]);
    }

    #[test]
    fn test_plural_header_counts_clusters() {
        let clusters = vec![
            ClusterReport {
                members: vec![0, 1],
                roots: vec![0, 1],
            },
            ClusterReport {
                members: vec![1, 2],
                roots: vec![0, 1],
            },
        ];
        let report = report_with(clusters, vec![0, 1]);
        let lines = summary_lines(&report);
        assert_eq!(lines[1], "found 2 clusters in: ");
    }

    #[test]
    fn test_diagnostic_line_format() {
        use crate::engine::MatchClass;

        let result = PairResult {
            a: 0,
            b: 1,
            distance: 42,
            class: MatchClass::PossibleMatch,
        };
        assert_eq!(diagnostic_line(&result), "possible match: 42 / 640");
    }

    #[test]
    fn test_render_summary_is_plain_text() {
        let report = report_with(Vec::new(), vec![0]);
        let rendered = render_summary(&report);
        assert!(!rendered.contains('\u{1b}'), "no ANSI escapes in file output");
        assert!(rendered.ends_with('\n'));
    }
}
