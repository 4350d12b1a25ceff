//! berth CLI

use anyhow::Result;
use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;

use berth::core::OptionError;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::Session;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        if let Some(help) = e.downcast_ref::<OptionError>().and_then(|d| d.help()) {
            eprintln!("help: {}", help);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("berth=debug")
    } else if cli.quiet {
        EnvFilter::new("berth=error")
    } else {
        EnvFilter::new("berth=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let session = Session::new(&cli)?;

    match cli.command {
        Commands::Create(args) => commands::create::execute(args, &session),
        Commands::Inspect(args) => commands::inspect::execute(args),
        Commands::Toolchain(args) => commands::toolchain::execute(args, &session),
        Commands::List(args) => commands::list::execute(args, &session),
        Commands::Clean(args) => commands::clean::execute(args, &session),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
