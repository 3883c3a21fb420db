//! Pagewise CLI Binary
//!
//! Command-line interface for browsing filtered, paginated collections.

use clap::Parser;
use pagewise::logging::init_logging;
use pagewise::tooling::cli::{Cli, CliContext};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let context = match CliContext::new(cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    // CLI flags override the configured logging settings
    let mut logging = context.config().logging.clone();
    if let Some(level) = &cli.log_level {
        logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        logging.format = format.clone();
    }
    if let Some(output) = &cli.log_output {
        logging.output = output.clone();
    }
    if cli.log_file.is_some() {
        logging.file = cli.log_file.clone();
    }
    if let Err(e) = init_logging(Some(&logging)) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    match context.execute(&cli.command).await {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
