//! Model archiver CLI entrypoint.
//!
//! Thin wrapper around [`model_archiver::archive::packaging::package_model`]:
//! loads configuration, merges it with the command line, runs the pipeline,
//! and reports the archive path and digest.

use clap::Parser;
use log::debug;
use model_archiver::archive::exclusion::ExclusionResolver;
use model_archiver::archive::packaging::package_model;
use model_archiver::cli::{Cli, CliError};
use model_archiver::config::ArchiverConfig;

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = ArchiverConfig::load(cli.config.as_deref())?;
    debug!("effective config: {config:?}");
    let settings = cli.settings(config)?;
    let resolver = ExclusionResolver::with_defaults(&settings.converter);

    let output = package_model(settings.params, &resolver)?;
    println!(
        "Created {} (sha256 {})",
        output.archive_path.display(),
        output.sha256
    );
    Ok(())
}
