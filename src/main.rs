mod cli;
mod commands;
mod config;
mod error;
mod files;
mod subtitle;
mod transcript;

use clap::Parser;
use cli::{Cli, Command};
use colored::*;
use error::SubcueResult;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing, gated on RUST_LOG env var
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        if let Some(hint) = e.hint() {
            eprintln!("{} {}", "hint:".yellow().bold(), hint);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> SubcueResult<()> {
    match cli.command {
        Command::Init { path } => commands::init::run(&path),
        Command::Generate {
            input,
            output,
            config,
            limits,
            parallel,
            json,
        } => {
            let options = commands::generate::GenerateOptions {
                input,
                output,
                config,
                overrides: limits.into(),
                parallel,
            };
            commands::generate::run(options, json).await
        }
        Command::Extract {
            input,
            output,
            config,
        } => {
            // FFmpeg blocks; keep it off the async runtime threads
            tokio::task::spawn_blocking(move || {
                commands::extract::run(&input, &output, config.as_deref())
            })
            .await
            .map_err(|e| error::SubcueError::Other(format!("extract worker failed: {e}")))?
        }
        Command::Check {
            path,
            config,
            limits,
        } => commands::check::run(&path, config.as_deref(), &limits.into()),
    }
}
