//! cloudinit CLI
//!
//! Command-line interface for rendering cloud-init multipart documents

use clap::{Parser, Subcommand};
use cloudinit_core::logging_facility::init::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "cloudinit")]
#[command(about = "cloudinit - Deterministic cloud-init MIME rendering", long_about = None)]
struct Cli {
    /// Log to stderr in the given format (text or json)
    #[arg(long, global = true)]
    log_format: Option<Profile>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render a configuration to a multipart document
    Render(commands::render::RenderArgs),
    /// Check a stored document against a fresh rendering
    Check(commands::check::CheckArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Some(profile) = cli.log_format {
        init(profile);
    }

    let result = match cli.command {
        Commands::Render(args) => commands::render::execute(args),
        Commands::Check(args) => commands::check::execute(args),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
