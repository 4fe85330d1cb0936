//! Config command - manage configuration files

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use shutter_core::config::{ConfigFile, sample_config};

/// Arguments for the config command
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the path to the config file
    Path,

    /// Show the effective configuration
    Show,

    /// Generate a default config file
    Init {
        /// Force overwrite if file exists
        #[arg(short, long)]
        force: bool,
    },

    /// Print a sample configuration to stdout
    Sample,
}

/// Run config subcommand
pub fn config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Path => {
            let path = ConfigFile::default_path();
            println!("{}", path.display());
            if !path.exists() {
                println!("(file does not exist)");
            }
        }
        ConfigCommand::Show => {
            let path = ConfigFile::default_path();
            let file = ConfigFile::load_from(path.clone())?;
            let session = file.session_config()?;

            if path.exists() {
                println!("Configuration file: {}\n", path.display());
            } else {
                println!("No configuration file, using defaults\n");
            }

            println!("  Template:   {}", session.effective_template());
            println!("  Timestamp:  {}", session.include_timestamp);
            println!("  Directory:  {}", session.directory.display());
            match session.region {
                Some(region) => println!("  Region:     {}", region),
                None => println!("  Region:     whole output"),
            }
            println!("  Shortcut:   {}", file.hotkeys.capture);
            println!("  Backend:    {}", file.backend.kind);

            for warning in session.validate() {
                println!("\nwarning: {}", warning);
            }
        }
        ConfigCommand::Init { force } => {
            let path = ConfigFile::default_path();

            if path.exists() && !force {
                println!("Configuration file already exists: {}", path.display());
                println!();
                println!("Use --force to overwrite, or edit the existing file.");
                return Ok(());
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).context("Failed to create config directory")?;
            }

            std::fs::write(&path, sample_config()).context("Failed to write config file")?;

            println!("Created configuration file: {}", path.display());
        }
        ConfigCommand::Sample => {
            print!("{}", sample_config());
        }
    }

    Ok(())
}
