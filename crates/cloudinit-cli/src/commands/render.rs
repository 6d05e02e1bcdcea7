//! Render command
//!
//! Usage: cloudinit render --config <FILE> [--objects <FILE>] [--output <FILE>] [--timeout-ms <MS>]

use super::{io_error, load_config, objects::load_objects, CommandResult};
use clap::Args;
use cloudinit_core::{render_with_cancellation, Cancellation, ExError};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Configuration file (YAML, or JSON by extension)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Objects file backing key references
    #[arg(long)]
    pub objects: Option<PathBuf>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Abort if references are still being resolved after this many milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

/// Execute render command
pub fn execute(args: RenderArgs) -> CommandResult {
    let params = load_config(&args.config)?;
    let lookup = load_objects(args.objects.as_deref())?;

    let cancel = match args.timeout_ms {
        Some(ms) => Cancellation::none().with_timeout(Duration::from_millis(ms)),
        None => Cancellation::none(),
    };
    let parts = params.part_specs().map_err(ExError::from)?;
    let document = render_with_cancellation(&parts, &lookup, &params.encoding(), &cancel)
        .map_err(ExError::from)?;

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, document.as_str())
            .map_err(|e| io_error("write_output", &output_path, e))?;
        println!("✓ Rendered to {}", output_path.display());
    } else {
        print!("{}", document);
    }

    Ok(0)
}
