use std::process::ExitCode;

use clap::Parser;

use atelier_master::cli;

fn main() -> ExitCode {
    env_logger::init();
    let args = cli::CliArgs::parse();
    cli::run(args)
}
