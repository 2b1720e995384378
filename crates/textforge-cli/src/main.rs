//! Textforge CLI - command-line interface for named text transformations
//!
//! This is the main entry point for the Textforge CLI application, providing
//! commands for transforming text, listing the vocabulary, serving the HTTP
//! API and managing configuration.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Configuration feeds logging, so it is loaded first
    let config = match Config::load_with_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", error::format_error(&e, cli.use_color()));
            process::exit(e.exit_code());
        }
    };

    let use_color = cli.use_color() && config.output.color;
    control::set_override(use_color);

    if let Err(e) = init_logging(&cli, &config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(cli, config, use_color).await {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}", error::format_error(&e, use_color));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
async fn run(cli: Cli, config: Config, use_color: bool) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let format = cli.output.unwrap_or(config.output.format);
    let mut output = OutputWriter::new(format, use_color, cli.quiet);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        format = ?format,
        "Executing command"
    );

    match cli.command {
        Commands::Transform(args) => handlers::handle_transform(args, &config, &mut output),
        Commands::List => handlers::handle_list(&mut output),
        Commands::Serve(args) => handlers::handle_serve(args, &config, &mut output).await,
        Commands::Config(args) => handlers::handle_config(args, &config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args, &mut output),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);

    // Config file first, then environment overrides
    logging_config.merge_with_settings(&config.logging, verbosity);
    logging_config.merge_with_env();

    if cli.quiet {
        logging_config.quiet();
    }

    logging::init_logging(logging_config)
}
