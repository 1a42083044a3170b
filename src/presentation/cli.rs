//! CLI Argument Parsing
//!
//! Global flags (--json, --verbose, --config) are inherited by all subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Stratus - layered configuration and binding compliance engine
#[derive(Parser, Debug)]
#[command(name = "stratus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI (NDJSON events)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Engine configuration file (defaults to ./stratus.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve, look up and enforce every component and binding in a manifest
    Plan {
        /// Manifest file (.yaml, .yml or .toml)
        manifest: PathBuf,
    },

    /// Show one component's resolved configuration with provenance
    Resolve {
        /// Manifest file (.yaml, .yml or .toml)
        manifest: PathBuf,

        /// Component instance name
        component: String,
    },

    /// List or validate the binder compatibility matrix
    Matrix {
        /// Only entries whose source is this component type
        #[arg(long, value_name = "TYPE")]
        source: Option<String>,

        /// Check the matrix for incomplete and duplicate entries
        #[arg(long)]
        validate: bool,
    },
}
