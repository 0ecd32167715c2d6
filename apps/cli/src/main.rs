use anyhow::Context;
use clap::Parser;
use folio::domain::config::UiConfig;
use folio::kernel::config::load_config;
use folio_cli::args::Cli;
use folio_logger::Logger;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config: UiConfig =
        load_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    let _log = Logger::from_config(&config.logging).init()?;

    folio_cli::run(cli.command, &config, &mut std::io::stdout().lock())
}
