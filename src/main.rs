// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, resolve credentials, hand the
//   file list to the pipeline and report one line per file.
// - Returns `anyhow::Result` so every failure surfaces with context.

use anyhow::{bail, Result};
use clap::Parser;
use dialoguer::Password;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use ncshare_cli::cli::Cli;
use ncshare_cli::config::{self, Config};
use ncshare_cli::dav::DavClient;
use ncshare_cli::ocs::OcsClient;
use ncshare_cli::run::process_files;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let password = resolve_password(&cli)?;
    let config = Config::from_cli(&cli, password)?;

    let dav = DavClient::new(config.base_url.clone(), &config.username, &config.password)?;
    let ocs = OcsClient::new(config.base_url.clone(), &config.username, &config.password)?;

    let reports = process_files(&config, &dav, &ocs, &cli.files);

    // Result lines go to stdout; everything else stays on stderr.
    let mut failures = 0usize;
    for report in &reports {
        match &report.result {
            Ok(Some(url)) => println!("Share URL: {}", url),
            Ok(None) => eprintln!("{}: share has no public URL", report.local.display()),
            Err(err) => {
                failures += 1;
                eprintln!("{}: {:#}", report.local.display(), err);
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} file(s) failed", failures, cli.files.len());
    }
    Ok(())
}

/// Password lookup order: flag or environment, the per-user fallback
/// file, then a hidden interactive prompt.
fn resolve_password(cli: &Cli) -> Result<String> {
    if let Some(p) = &cli.password {
        return Ok(p.clone());
    }
    if let Ok(p) = config::load_password_file() {
        return Ok(p);
    }
    Ok(Password::new().with_prompt("Password").interact()?)
}
