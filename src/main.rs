use clap::Parser;
use ribbonscan::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
