use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod config;
mod domain;
mod error;
mod infrastructure;
mod services;
mod tools;
mod ui;

use cli::{Cli, Commands};
use commands::{build, deploy, launch, login, push, tag};
use config::DeployConfig;
use error::DeployError;
use infrastructure::LaunchTarget;

fn init_logging(verbose: bool) {
    // LOGGING=debug,info,warn,error or just LOGGING=debug
    let log_level = std::env::var("LOGGING")
        .or_else(|_| std::env::var("LOG_LEVEL"))
        .unwrap_or_else(|_| {
            if verbose {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(false)
        .init();
}

async fn run(command: Commands) -> Result<()> {
    let config = DeployConfig::load().map_err(DeployError::from)?;

    match command {
        Commands::Build => build::execute(&config).await,
        Commands::Tag => tag::execute(&config).await,
        Commands::Login => login::execute(&config).await,
        Commands::Push => push::execute(&config).await,
        Commands::Deploy => deploy::execute(&config).await,
        Commands::Stl => launch::execute(&config, LaunchTarget::Stl).await,
        Commands::Main => launch::execute(&config, LaunchTarget::Main).await,
    }
}

/// Exit status for a failed run: the failing subprocess's code when there is one
fn exit_code(err: &anyhow::Error) -> u8 {
    let code = err
        .downcast_ref::<DeployError>()
        .map(DeployError::exit_code)
        .unwrap_or(1);
    u8::try_from(code).ok().filter(|c| *c != 0).unwrap_or(1)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::print_error(&format!("{:#}", e));
            ExitCode::from(exit_code(&e))
        }
    }
}
