//! Command-line driver for the blog page behaviors.
//!
//! `folio dismiss` lets the alert timers run and prints the page; `folio submit` fills in
//! a guarded form, submits it and reports whether it went through.

pub mod args;
pub mod handlers;

use crate::args::Commands;
use crate::handlers::dismiss::{Clock, dismiss};
use crate::handlers::submit::submit;
use folio::domain::config::UiConfig;
use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

/// Runs one command and writes its output to `out`.
///
/// # Errors
/// Returns an error if the command fails or `out` cannot be written.
pub fn run(
    command: Commands,
    config: &UiConfig,
    out: &mut impl Write,
) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Dismiss { page, elapse_ms, realtime } => {
            let clock = if realtime {
                Clock::Realtime
            } else {
                Clock::Virtual(elapse_ms.map(Duration::from_millis))
            };
            let report = dismiss(&page, config, clock)?;
            writeln!(out, "{}", report.html)?;
            Ok(ExitCode::SUCCESS)
        },
        Commands::Submit { page, form, set } => {
            let report = submit(&page, config, form, &set)?;
            write!(out, "{report}")?;
            Ok(report.exit_code())
        },
    }
}
