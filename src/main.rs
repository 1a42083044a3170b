//! Stratus CLI
//!
//! Usage: stratus <COMMAND>
//!
//! Commands:
//!   plan     Resolve, look up and enforce every component and binding in a manifest
//!   resolve  Show one component's resolved configuration with provenance
//!   matrix   List or validate the binder compatibility matrix
//!
//! Exit codes: 0 success, 1 provisioning blocked or matrix invalid, 2 error.

mod commands;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stratus::presentation::json::{emit_event, CompleteEvent, ErrorEvent};
use stratus::presentation::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    let (name, result) = match &cli.command {
        Commands::Plan { manifest } => ("plan", commands::plan::cmd_plan(manifest, config, cli.json)),
        Commands::Resolve {
            manifest,
            component,
        } => (
            "resolve",
            commands::resolve::cmd_resolve(manifest, component, config, cli.json),
        ),
        Commands::Matrix { source, validate } => (
            "matrix",
            commands::matrix::cmd_matrix(source.as_deref(), *validate, cli.json),
        ),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            if cli.json {
                let _ = emit_event(&ErrorEvent::new(name, format!("{:#}", err)));
                let _ = emit_event(&CompleteEvent::failure(name));
            } else {
                eprintln!("Error: {:#}", err);
            }
            std::process::exit(2);
        }
    }
}

/// `STRATUS_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_env("STRATUS_LOG").unwrap_or_else(|_| filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}
