//! Names command - preview generated file names

use anyhow::Result;
use clap::Args;
use shutter_core::FilenameGenerator;

use super::SessionArgs;

/// Arguments for the names command
#[derive(Args)]
pub struct NamesArgs {
    /// How many names to generate
    #[arg(short = 'n', long, default_value = "1")]
    count: u64,

    /// Capture counter to start from
    #[arg(long, default_value = "0")]
    start: u64,

    #[command(flatten)]
    session: SessionArgs,
}

/// Print the names the next captures would get
///
/// Each name is generated as if the previous capture had succeeded.
pub fn names(args: NamesArgs) -> Result<()> {
    let (_, config) = args.session.load()?;

    for warning in config.validate() {
        eprintln!("warning: {}", warning);
    }

    let mut generator = FilenameGenerator::new();
    for captures in args.start..args.start.saturating_add(args.count) {
        let name = generator.generate(
            config.template.as_deref(),
            captures,
            config.include_timestamp,
        );
        println!("{}", config.directory.join(name).display());
    }

    Ok(())
}
