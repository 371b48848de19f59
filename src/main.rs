//! CLI entry point for the classroom downloader.

use std::io::{self, Write};
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use classroom_core::{
    ClassroomClient, CredentialManager, DriveClient, RunConfig, ScopeSet, run_pipeline,
};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    // The output folder is the one piece of input the run cannot proceed
    // without; absent means "operator cancelled".
    let Some(output) = args.output else {
        eprintln!("No output folder chosen.");
        eprintln!("Usage: classroom-downloader <OUTPUT> [--credentials <FILE>]");
        std::process::exit(1);
    };

    let start = Instant::now();
    let config = RunConfig::new(&output, args.credentials);
    std::fs::create_dir_all(config.root())?;
    println!("Saving to: {}", config.root().display());

    let http = reqwest::Client::new();
    let manager = CredentialManager::new(http.clone(), config.clone());

    // One credential per API family, obtained once per run.
    let classroom_credential = manager.obtain(ScopeSet::Classroom).await?;
    let drive_credential = manager.obtain(ScopeSet::Drive).await?;

    let classroom = ClassroomClient::new(http.clone(), &classroom_credential);
    let drive = DriveClient::new(http, &drive_credential);

    let outcomes = run_pipeline(&config, &classroom, &drive, wait_for_blacklist_edit).await?;

    info!(
        downloaded = outcomes.downloaded.len(),
        skipped = outcomes.skipped.len(),
        failed = outcomes.failed.len(),
        "run complete"
    );
    println!(
        "\nCompleted successfully in {}s",
        start.elapsed().as_secs()
    );
    println!("Saved to: {}", config.root().display());

    Ok(())
}

/// The blocking pause between the two listing passes.
fn wait_for_blacklist_edit() -> io::Result<()> {
    print!("\nUpdate courses blacklist and press Enter to continue...");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(())
}
