//! audiodupe - acoustic duplicate finder for audio collections.
//!
//! Finds files that *sound* the same regardless of container, codec, bitrate
//! or gain. The pipeline:
//!
//! 1. **discover**: expand arguments into a flat, ordered list of candidates
//! 2. **fingerprint**: decode each file, optionally trim silence, and reduce
//!    it to a 640-bit acoustic fingerprint (in parallel)
//! 3. **compare**: classify every pair of fingerprints with a cheap
//!    preliminary check and a full offset-searching check (in parallel)
//! 4. **cluster**: union-find over confirmed pairs into duplicate clusters
//! 5. **report**: progress markers and a cluster summary, optionally written
//!    to a file

pub mod cli;
pub mod engine;
pub mod error;
pub mod logging;
pub mod report;
pub mod scanner;

use std::fs;

use anyhow::Context;

use crate::cli::Cli;
use crate::engine::{EngineConfig, Orchestrator};
use crate::error::ExitCode;
use crate::report::Reporter;

/// Run the application logic end to end.
///
/// An unreadable input argument prints `can't read <path>` and returns
/// [`ExitCode::UnreadableInput`] without producing any report; everything
/// else (including a run that finds nothing) is a success.
///
/// # Errors
///
/// Only for failures writing the report file; all expected conditions map to
/// an [`ExitCode`].
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let reporter = Reporter::new(cli.verbose);

    let set = match scanner::discover(&cli.paths) {
        Ok(set) => set,
        Err(err) => {
            // Part of the progress stream, so stdout rather than stderr.
            println!("{err}");
            return Ok(ExitCode::UnreadableInput);
        }
    };

    let orchestrator = Orchestrator::new(EngineConfig {
        trim_silence: cli.trim_silence,
        verbose: cli.verbose,
    });

    reporter.fingerprint_start(set.sources.len());
    let fp_phase = orchestrator.fingerprint_phase(&set.sources);
    reporter.progress(&fp_phase.statuses);
    reporter.failures(&fp_phase.failures);
    reporter.fingerprint_elapsed(fp_phase.elapsed);

    let n = fp_phase.fingerprinted();
    reporter.compare_start(n * n.saturating_sub(1) / 2);
    let cmp_phase = orchestrator.compare_phase(&fp_phase.fingerprints);
    reporter.diagnostics(&cmp_phase.diagnostics);
    reporter.compare_elapsed(cmp_phase.elapsed);

    let run_report = orchestrator.build_report(set, fp_phase, cmp_phase);
    reporter.summary(&run_report);

    if let Some(path) = &cli.output {
        fs::write(path, report::render_summary(&run_report))
            .with_context(|| format!("writing report to {}", path.display()))?;
    }

    Ok(ExitCode::Success)
}
