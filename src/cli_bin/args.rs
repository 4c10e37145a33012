//! Command-line arguments
//!
//! The output contract takes no flags: every path is a constant relative to
//! the base directory. Flags only pick that directory and the log level.

use clap::Parser;
use std::path::PathBuf;

/// Main CLI application
#[derive(Parser, Debug)]
#[command(
    name = "compatdex",
    version,
    about = "Build the feature index from documentation, compat data and CSS syntax data",
    long_about = "compatdex reads the documentation corpus, resolves each page's \
                  browser-compat path against the compatibility dataset and the CSS \
                  syntax dataset, and writes one JSON index into the package directory."
)]
pub struct Cli {
    /// Directory the fixed input and output paths are relative to
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub base: PathBuf,

    /// Enable verbose output (repeat for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Default log filter when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
