//! audiodupe CLI entry point.

use clap::Parser;

use audiodupe::cli::{self, Cli};
use audiodupe::error::ExitCode;
use audiodupe::logging::init_logging;

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    cli::configure_colour(cli.colour);

    match audiodupe::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(ExitCode::UnreadableInput.as_i32());
        }
    }
}
