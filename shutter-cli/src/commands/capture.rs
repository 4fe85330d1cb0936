//! Capture command - take a single screenshot

use anyhow::{Context, Result};
use clap::Args;
use shutter_core::{AnyBackend, CaptureSession, Region};
use tracing::debug;

use super::{SessionArgs, TerminalNotifier};

/// Arguments for the capture command
#[derive(Args)]
pub struct CaptureArgs {
    /// Region to capture as "X,Y WxH[@SCALE]" (default: config or whole output)
    #[arg(short, long)]
    region: Option<Region>,

    #[command(flatten)]
    session: SessionArgs,
}

/// Take one screenshot and report where it went
pub async fn capture(args: CaptureArgs) -> Result<()> {
    let (file, config) = args.session.load()?;
    let region = args.region.or(config.region);

    let backend = AnyBackend::from_settings(&file.backend);
    backend.check().context("Capture backend is misconfigured")?;
    debug!("Using {} backend", backend.kind());

    let session = CaptureSession::new(config, backend, TerminalNotifier);
    let saved = session.capture(region).await.context("Screenshot failed")?;

    debug!("Saved capture #{} at {:?}", saved.sequence, saved.path);
    println!("{}", saved.path.display());

    Ok(())
}
