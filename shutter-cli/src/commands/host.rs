//! Host command - serve capture requests over IPC

use anyhow::{Context, Result, bail};
use clap::Args;
use shutter_core::backend::CommandBackend;
use shutter_core::config::ConfigFile;
use shutter_core::ipc::{IpcServer, host_running, socket_path};
use std::path::PathBuf;
use tokio::signal;

/// Arguments for the host command
#[derive(Args)]
pub struct HostArgs {
    /// Socket to listen on (default: $XDG_RUNTIME_DIR/shutter.sock)
    #[arg(short, long)]
    socket: Option<PathBuf>,

    /// Screenshot program to run for each request (default: from config)
    #[arg(short, long)]
    program: Option<String>,

    /// Config file to use instead of ~/.config/shutter/config.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Run the capture host until Ctrl+C or a shutdown request
pub async fn host(args: HostArgs) -> Result<()> {
    let file = match &args.config {
        Some(path) => ConfigFile::load_from(path.clone())?,
        None => ConfigFile::load_or_default(),
    };

    let mut settings = file.backend.clone();
    if let Some(program) = args.program {
        settings.program = program;
    }

    let path = args
        .socket
        .or_else(|| settings.socket_path())
        .unwrap_or_else(socket_path);

    if host_running(&path).await {
        bail!("A capture host is already listening on {}", path.display());
    }

    let backend = CommandBackend::from_settings(&settings);
    backend.check().context("Capture program is misconfigured")?;
    let program = backend.program().to_string();
    let mut server = IpcServer::with_socket(&path, backend);
    server.start().await.context("Failed to start capture host")?;

    println!("Shutter - Capture host");
    println!("  Socket:  {}", path.display());
    println!("  Program: {}", program);
    println!();
    println!("Press Ctrl+C to stop...\n");

    tokio::select! {
        _ = signal::ctrl_c() => {
            println!("\nReceived interrupt signal...");
        }
        result = server.run() => {
            result?;
        }
    }

    server.cleanup();
    println!("Capture host stopped.");

    Ok(())
}
