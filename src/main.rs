//! The CLI interface for flipscreen
//!
//! Use the `--help` flag to see the available options.
use std::io;

use color_eyre::eyre::Result;
use flipscreen::{
    app::{self, Outcome},
    cli::{self, Opts, Request},
    platforms::mutter::MutterDisplayConfig,
    settings::GSettings,
};
use structopt::StructOpt;

/// Entry point for `flip-screen`.
fn main() -> Result<()> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    let log_level = if opts.verbose {
        log::LevelFilter::Trace
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level.as_str()),
    )
    .init();

    log::debug!("Parsed Opts:\n{:#?}", opts);

    let request = match Request::try_from(&opts) {
        Ok(request) => request,
        Err(err) => {
            cli::write_usage_error(&err, &mut io::stderr())?;
            std::process::exit(1);
        }
    };

    log::debug!("Acquiring display session.");
    let session = MutterDisplayConfig::connect()?;
    let settings = GSettings::default();

    let stdout = io::stdout();
    let outcome = app::run(&request, &session, &settings, &mut stdout.lock())?;

    if let Outcome::Rotated(rotated) = outcome {
        log::debug!(
            "{} is at {}, pixel order {}",
            rotated.output,
            rotated.rotation,
            rotated.pixel_order
        );
    }

    Ok(())
}
