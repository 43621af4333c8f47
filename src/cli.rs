//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Find acoustically duplicate audio files.
///
/// Scans the given files and directory trees, fingerprints every decodable
/// audio file, and reports clusters of files that sound the same even across
/// formats, bitrates and gain changes.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "audiodupe", version, about)]
pub struct Cli {
    /// Files or directories to scan.
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Trim leading and trailing silence before fingerprinting.
    #[arg(short = 't', long = "trim-silence")]
    pub trim_silence: bool,

    /// Print per-file errors and per-pair match diagnostics.
    #[arg(short, long)]
    pub verbose: bool,

    /// When to colour console output.
    #[arg(long = "colour", value_enum, default_value_t = ColourChoice::Auto)]
    pub colour: ColourChoice,

    /// Write the cluster summary to FILE (plain text), on success only.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Console colour policy.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColourChoice {
    /// Colour when stdout is a terminal that supports it.
    Auto,
    /// Always colour.
    Yes,
    /// Never colour.
    No,
}

/// Apply the colour policy globally.
pub fn configure_colour(choice: ColourChoice) {
    match choice {
        ColourChoice::Auto => yansi::whenever(yansi::Condition::TTY_AND_COLOR),
        ColourChoice::Yes => yansi::enable(),
        ColourChoice::No => yansi::disable(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("audiodupe").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["music/"]);
        assert_eq!(cli.paths, vec![PathBuf::from("music/")]);
        assert!(!cli.trim_silence);
        assert!(!cli.verbose);
        assert_eq!(cli.colour, ColourChoice::Auto);
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_requires_at_least_one_path() {
        assert!(Cli::try_parse_from(["audiodupe"]).is_err());
    }

    #[test]
    fn test_multiple_paths_keep_order() {
        let cli = parse(&["a", "b", "c"]);
        let expected: Vec<PathBuf> = ["a", "b", "c"].iter().map(PathBuf::from).collect();
        assert_eq!(cli.paths, expected);
    }

    #[test]
    fn test_flags() {
        let cli = parse(&["-t", "-v", "music"]);
        assert!(cli.trim_silence);
        assert!(cli.verbose);

        let cli = parse(&["--trim-silence", "--verbose", "music"]);
        assert!(cli.trim_silence);
        assert!(cli.verbose);
    }

    #[test]
    fn test_colour_values() {
        assert_eq!(parse(&["--colour=auto", "m"]).colour, ColourChoice::Auto);
        assert_eq!(parse(&["--colour=yes", "m"]).colour, ColourChoice::Yes);
        assert_eq!(parse(&["--colour=no", "m"]).colour, ColourChoice::No);
        assert!(Cli::try_parse_from(["audiodupe", "--colour=maybe", "m"]).is_err());
    }

    #[test]
    fn test_output_file() {
        let cli = parse(&["-o", "report.txt", "music"]);
        assert_eq!(cli.output, Some(PathBuf::from("report.txt")));
    }
}
