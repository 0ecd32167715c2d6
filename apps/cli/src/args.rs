//! # CLI Argument Definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Runs the blog page behaviors against a rendered HTML page.
#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Check alert dismissal and form guarding on rendered blog pages")]
pub struct Cli {
    /// Config file (TOML, JSON, YAML...). `FOLIO__` environment variables override it.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level for stderr output (error, warn, info, debug, trace, off)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Let the alert timers run, then print the resulting page
    Dismiss {
        /// Rendered HTML page
        page: PathBuf,
        /// Virtual time to let pass (defaults to delay + fade)
        #[arg(long, conflicts_with = "realtime")]
        elapse_ms: Option<u64>,
        /// Wait in real time until every timer has fired
        #[arg(long)]
        realtime: bool,
    },
    /// Fill in fields and submit a guarded form
    Submit {
        /// Rendered HTML page
        page: PathBuf,
        /// Which guarded form to submit, in document order
        #[arg(long, default_value_t = 0)]
        form: usize,
        /// Field value to set before submitting, as NAME=VALUE (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (name, value) =
        raw.split_once('=').ok_or_else(|| format!("expected NAME=VALUE, got `{raw}`"))?;
    if name.trim().is_empty() {
        return Err(format!("missing field name in `{raw}`"));
    }
    Ok((name.to_owned(), value.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn assignments_keep_everything_after_the_first_equals() {
        assert_eq!(parse_assignment("q=a=b").unwrap(), ("q".to_owned(), "a=b".to_owned()));
        assert_eq!(parse_assignment("name=").unwrap(), ("name".to_owned(), String::new()));
        assert!(parse_assignment("name").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::parse_from(["folio", "submit", "page.html", "--set", "a=1", "-l", "debug"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        let Commands::Submit { form, set, .. } = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(form, 0);
        assert_eq!(set, [("a".to_owned(), "1".to_owned())]);
    }
}
