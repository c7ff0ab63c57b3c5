use std::io;
use std::process::ExitCode;

use clap::Parser;
use wichtel::{logging, run, Cli};

fn main() -> ExitCode {
    logging::init_logging();
    let cli = Cli::parse();
    let mut stdout = io::stdout().lock();
    run(cli, &mut stdout)
}
