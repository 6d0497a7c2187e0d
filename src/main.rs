use clap::Parser;
use riskalloc::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    riskalloc::logging::init(cli.verbose);
    run(cli)
}
