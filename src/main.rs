use std::io::Write;

use anyhow::Result;
use clap::Parser;

use gaze_nn::{run_training, Cli, TrainConfig};

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    )
    .format(|buf, record| writeln!(buf, "{}", record.args()))
    .init();

    if let Err(e) = run(&cli) {
        log::error!("Fatal error: {e}");
        for cause in e.chain().skip(1) {
            log::error!("  caused by: {cause}");
        }
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = TrainConfig::from_cli(cli)?;
    run_training(&config)?;
    Ok(())
}
