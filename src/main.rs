use anyhow::{Context, Result};
use clap::Parser;

use compatdex::{BuildConfig, Builder};

mod cli_bin;

use cli_bin::args::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    let config = BuildConfig::with_base_dir(&cli.base);
    let report = Builder::new(config)
        .run()
        .with_context(|| format!("build failed in {}", cli.base.display()))?;

    log::debug!("skips by reason: {:?}", report.skipped);
    Ok(())
}
