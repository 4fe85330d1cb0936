//! Watch command - capture whenever the shortcut is pressed

use anyhow::{Context, Result};
use clap::Args;
use shutter_core::error::ShutterError;
use shutter_core::hotkeys::{HotkeyAction, HotkeyListener};
use shutter_core::{AnyBackend, CaptureSession};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

use super::{SessionArgs, TerminalNotifier};

/// Arguments for the watch command
#[derive(Args)]
pub struct WatchArgs {
    /// Shortcut that triggers a capture (default: from config)
    #[arg(short = 'k', long)]
    hotkey: Option<String>,

    #[command(flatten)]
    session: SessionArgs,
}

/// Listen for the capture shortcut until Ctrl+C
pub async fn watch(args: WatchArgs) -> Result<()> {
    let (file, config) = args.session.load()?;
    let shortcut = args.hotkey.unwrap_or_else(|| file.hotkeys.capture.clone());

    let (mut listener, mut actions) =
        HotkeyListener::for_capture(&shortcut).context("Invalid capture shortcut")?;
    listener.start().context("Failed to start shortcut listener")?;

    let backend = AnyBackend::from_settings(&file.backend);
    backend.check().context("Capture backend is misconfigured")?;
    let directory = config.directory.clone();
    let session = Arc::new(CaptureSession::new(config, backend, TerminalNotifier));

    println!("Shutter - Watching for {}", shortcut);
    println!("  Directory: {}", directory.display());
    println!("  Backend:   {}", file.backend.kind);
    println!();
    println!("Press Ctrl+C to stop...\n");

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                println!("\nReceived interrupt signal...");
                break;
            }
            action = actions.recv() => {
                let Some(HotkeyAction::Capture) = action else {
                    warn!("Shortcut listener exited");
                    break;
                };

                // Run in the background so a slow backend doesn't hold up
                // the shortcut channel; overlapping presses are rejected by
                // the session.
                let session = session.clone();
                tokio::spawn(async move {
                    match session.capture_default().await {
                        Ok(saved) => info!("Capture #{} done", saved.sequence),
                        Err(ShutterError::CaptureInProgress) => {}
                        Err(e) => warn!("Capture failed: {}", e),
                    }
                });
            }
        }
    }

    listener.stop();
    println!(
        "Stopped after {} screenshot(s).",
        session.captures_taken()
    );

    Ok(())
}
