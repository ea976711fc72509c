use clap::Parser;
use folderlib::cli::{Cli, run};
use folderlib::output::{OutputFormatter, init_logger};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.command.verbose());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}
