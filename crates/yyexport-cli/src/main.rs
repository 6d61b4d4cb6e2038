//! yyexport CLI - Command-line interface for sprite conversion
//!
//! This binary converts extracted sprite data into normalized sprite records
//! and frame images, and can classify single collision masks.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use yyexport_cli::commands;
use yyexport_cli::commands::convert::ConvertArgs;

/// yyexport - Sprite Conversion Tool
#[derive(Parser)]
#[command(name = "yyexport")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every sprite and background listed in a manifest
    Convert(ConvertArgs),

    /// Infer the collision shape of a single mask image
    Classify {
        /// Path to the mask image (bright opaque pixels are solid)
        #[arg(short, long)]
        mask: PathBuf,

        /// Bounding box in mask pixels as L,R,T,B (inclusive)
        #[arg(short, long)]
        bbox: String,

        /// Minimum similarity in [0, 1] for shape detection
        #[arg(short, long, default_value_t = 0.98)]
        precision: f64,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert(args) => commands::convert::run(&args),
        Commands::Classify {
            mask,
            bbox,
            precision,
            json,
        } => commands::classify::run(&mask, &bbox, precision, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
