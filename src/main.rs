mod analysis;
mod cli;
mod error;
mod fmt;
mod importer;
mod models;
mod prompt;
mod render;
mod settings;

use clap::Parser;
use tracing_subscriber::{fmt as log_fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands, ConfigCommands};

fn main() {
    let cli = Cli::parse();

    // RUST_LOG > --verbose > warn
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            log_fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    let result = match cli.command {
        Commands::Analyze {
            file,
            top_n,
            format,
            output,
        } => cli::analyze::run(&file, top_n, format, output.as_deref()),
        Commands::Prompt {
            file,
            top_n,
            output,
        } => cli::analyze::prompt(&file, top_n, output.as_deref()),
        Commands::Verdict { file } => cli::verdict::run(&file),
        Commands::Config { command } => match command {
            ConfigCommands::Show => cli::config::show(),
            ConfigCommands::Set {
                top_n,
                date_format,
                clear_date_format,
            } => cli::config::set(top_n, date_format, clear_date_format),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
