//! Shutter CLI
//!
//! Template-driven screenshot capture with collision-free file names.
//!
//! # Usage
//!
//! ```bash
//! # Take one screenshot of a region
//! shutter capture --region "0,0 1920x1080"
//!
//! # Capture on Ctrl+Shift+S until interrupted
//! shutter watch
//!
//! # Preview the next names without capturing
//! shutter names -n 3 --template "raid_{count}"
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Shutter - template-driven screenshot capture
#[derive(Parser)]
#[command(name = "shutter")]
#[command(version)]
#[command(about = "Template-driven screenshot capture with collision-free file names", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a single screenshot
    #[command(alias = "shot")]
    Capture(commands::CaptureArgs),

    /// Capture whenever the shortcut is pressed
    Watch(commands::WatchArgs),

    /// Preview generated file names without capturing
    Names(commands::NamesArgs),

    /// Run the capture host that IPC clients forward to
    Host(commands::HostArgs),

    /// Manage the configuration file
    Config(commands::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("shutter_core={}", level).parse()?)
                .add_directive(format!("shutter={}", level).parse()?),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Capture(args) => commands::capture(args).await?,
        Commands::Watch(args) => commands::watch(args).await?,
        Commands::Names(args) => commands::names(args)?,
        Commands::Host(args) => commands::host(args).await?,
        Commands::Config(args) => commands::config(args)?,
    }

    Ok(())
}
