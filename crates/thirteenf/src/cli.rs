use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing.
    ///
    /// Without it, progress bars are shown instead of logs.
    #[arg(short, long, global = true)]
    pub trace: Option<TraceLevel>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the latest 13F-HR holdings of every tracked fund from SEC EDGAR.
    Fetch {
        /// Where the holdings document is written.
        #[arg(short, long, env = "HOLDINGS_PATH", default_value = "data/holdings.json")]
        output: PathBuf,

        /// Where the cross-fund overlap report is written.
        #[arg(long, env = "OVERLAP_PATH", default_value = "data/overlap.json")]
        overlap: PathBuf,
    },

    /// Inject the holdings document into the dashboard template.
    Inject {
        /// Holdings document produced by `fetch`.
        #[arg(short, long, env = "HOLDINGS_PATH", default_value = "data/holdings.json")]
        data: PathBuf,

        /// Template containing the `__HOLDINGS_DATA__` placeholder.
        #[arg(short, long, env = "TEMPLATE_PATH", default_value = "templates/dashboard.html")]
        template: PathBuf,

        /// Published dashboard.
        #[arg(short, long, env = "DASHBOARD_PATH", default_value = "public/index.html")]
        output: PathBuf,
    },
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[clap(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    DEBUG,
    ERROR,
    INFO,
    TRACE,
    WARN,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_needs_no_arguments() {
        let cli = Cli::try_parse_from(["thirteenf", "fetch"]).unwrap();
        assert!(cli.trace.is_none());
        match cli.command {
            Commands::Fetch { output, overlap } => {
                // env overrides aside, the defaults are fixed
                if std::env::var_os("HOLDINGS_PATH").is_none() {
                    assert_eq!(output, PathBuf::from("data/holdings.json"));
                }
                if std::env::var_os("OVERLAP_PATH").is_none() {
                    assert_eq!(overlap, PathBuf::from("data/overlap.json"));
                }
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn inject_with_trace() {
        let cli = Cli::try_parse_from([
            "thirteenf",
            "inject",
            "--template",
            "site/template.html",
            "-t",
            "DEBUG",
        ])
        .unwrap();
        assert_eq!(cli.trace, Some(TraceLevel::DEBUG));
        assert!(matches!(
            cli.command,
            Commands::Inject { template, .. } if template == PathBuf::from("site/template.html")
        ));
    }
}
