//! Check command
//!
//! Usage: cloudinit check --config <FILE> [--objects <FILE>] --stored <FILE>
//!
//! Exits 0 when the stored document matches a fresh rendering, 1 otherwise.

use super::{io_error, load_config, objects::load_objects, CommandResult};
use clap::Args;
use cloudinit_core::{compare, render_config, ExError};
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Configuration file (YAML, or JSON by extension)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Objects file backing key references
    #[arg(long)]
    pub objects: Option<PathBuf>,

    /// Previously stored document; a missing file counts as drift
    #[arg(short, long)]
    pub stored: PathBuf,
}

/// Execute check command
pub fn execute(args: CheckArgs) -> CommandResult {
    let params = load_config(&args.config)?;
    let lookup = load_objects(args.objects.as_deref())?;
    let document = render_config(&params, &lookup).map_err(ExError::from)?;

    let stored = match std::fs::read_to_string(&args.stored) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => return Err(io_error("read_stored", &args.stored, e).into()),
    };

    let drift = compare(document.as_str(), stored.as_deref());
    if drift.is_up_to_date() {
        println!("✓ Up to date");
        Ok(0)
    } else {
        println!("✗ Drift: {}", drift);
        Ok(1)
    }
}
