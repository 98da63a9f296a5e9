//! Beliefscope CLI entry point.

use clap::Parser;

use beliefscope::cli::{Cli, Commands};
use beliefscope::infrastructure::config::ConfigLoader;
use beliefscope::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load_with(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => beliefscope::cli::handle_error(err, cli.json),
    };

    let _logger = match LoggerImpl::init(&config.logging) {
        Ok(logger) => logger,
        Err(err) => beliefscope::cli::handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Align(args) => beliefscope::cli::commands::align::execute(args, cli.json).await,
        Commands::Compare(args) => {
            beliefscope::cli::commands::compare::execute(args, &config, cli.json).await
        }
        Commands::Locate(args) => beliefscope::cli::commands::locate::execute(args, cli.json).await,
    };

    if let Err(err) = result {
        beliefscope::cli::handle_error(err, cli.json);
    }
}
