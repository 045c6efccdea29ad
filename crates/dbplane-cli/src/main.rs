//! dbplane binary entrypoint.

use std::collections::HashMap;
use std::io;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use dbplane_cli::cli::{Cli, Format};
use dbplane_cli::{App, CliError, OutputFormat};
use dbplane_store::{ConfigFile, Profile, Store};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = match cli.config.clone().or_else(ConfigFile::default_path) {
        Some(path) => ConfigFile::from_file(path)?,
        None => ConfigFile::default(),
    };
    let env: HashMap<String, String> = std::env::vars().collect();
    let profile = config.profile(&cli.profile, &env)?;
    let format = OutputFormat::new(output_format(cli.output, &profile));

    let store = Store::new(profile);
    let app = App::new(&store, &config, format);
    let mut stdout = io::stdout().lock();
    app.run(&mut stdout, &cli.command).await
}

/// The `--output` flag, else the profile's format, else table.
///
/// Profiles are validated on load, so `profile.output` is already a known
/// format name.
fn output_format(flag: Option<Format>, profile: &Profile) -> Format {
    flag.or_else(|| {
        profile
            .output
            .as_deref()
            .and_then(|s| Format::from_str(s, true).ok())
    })
    .unwrap_or_default()
}
