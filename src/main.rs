use clap::Parser;
use domsig::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
