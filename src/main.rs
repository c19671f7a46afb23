use clap::Parser;
use std::process;

use reachai::cli;
use reachai::cli::commands::{Cli, Commands};
use reachai::config::AgentConfig;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli_args = Cli::parse();
    let json_output = cli_args.json;

    let config = match AgentConfig::load(cli_args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => process::exit(cli::report_error(&e, json_output)),
    };

    let exit_code = match cli_args.command {
        Commands::Segments => cli::catalog::run_segments(json_output),
        Commands::Funnel => cli::catalog::run_funnel(&config, json_output),
        Commands::Copy { segment, channel, benefits } => {
            cli::catalog::run_copy(&segment, &channel, &benefits, json_output)
        }
        Commands::Tasks { all } => cli::tasks::run(&config, all, json_output),
        Commands::Session => cli::session::run(&config, json_output),
        Commands::Import { file } => cli::import::run(&file, json_output),
        Commands::Template => cli::import::run_template(json_output),
    };

    process::exit(exit_code);
}
