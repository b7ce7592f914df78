//! tola-rev - revision static assets with content hashes.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use tola_rev::cli::{self, Cli};
use tola_rev::config::RevConfig;
use tola_rev::{error, log, logger};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = RevConfig::load(&cli)?;

    // Only the manifest load is async; a current-thread runtime is enough.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match rt.block_on(cli::run(&cli.input, &config)) {
        Ok(summary) => {
            log!(
                "rev";
                "revisioned {} files ({} sourcemaps) into {}",
                summary.revisioned,
                summary.sourcemaps,
                config.output_dir().display()
            );
            Ok(())
        }
        Err(err) => {
            log!("error"; "{:#}", err);
            std::process::exit(error::exit_code(&err));
        }
    }
}
