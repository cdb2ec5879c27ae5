//! cloudcmd - cloud resource-management commands
//!
//! Main entry point: one-shot `run`, `list` of the command tree, and the
//! stdio `serve` loop.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cloudcmd_lib::utils::logging::{init_logging, status_label};
use cloudcmd_lib::AppContext;

/// CLI arguments.
#[derive(Debug, Parser)]
#[command(name = "cloudcmd", version, about = "Run cloud resource-management commands.")]
struct Cli {
    /// Configuration file (TOML or JSON); standard locations are probed when omitted.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Mode,
}

/// Supported invocation modes.
#[derive(Debug, Subcommand)]
enum Mode {
    /// Run one command and print its JSON response.
    Run {
        /// Command path followed by its options, e.g. `storage account list --subscription x`.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },
    /// List the registered commands and their options.
    List,
    /// Serve JSON-lines requests on stdin, answering on stdout.
    Serve,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "cloudcmd: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Read before config so `.env` values reach the env overrides.
    let dotenv = dotenvy::dotenv();

    let config = cloudcmd_infra::config::load_with(cli.config, &|name| std::env::var(name).ok())
        .context("failed to load configuration")?;
    init_logging(&config.logging)?;

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "loaded .env"),
        Err(err) => tracing::debug!(error = %err, "no .env file loaded"),
    }

    let ctx = Arc::new(AppContext::new(config).context("failed to initialise application")?);

    match cli.command {
        Mode::Run { tokens } => {
            let execution = ctx.invoke_tokens(&tokens).await;
            let status = execution.response.status;
            print_json(&serde_json::to_value(&execution.response)?)?;

            tracing::debug!(status, outcome = status_label(status), "run finished");
            Ok(if execution.response.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Mode::List => {
            print_json(&serde_json::to_value(ctx.catalog())?)?;
            Ok(ExitCode::SUCCESS)
        }
        Mode::Serve => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            cloudcmd_lib::server::serve(ctx, stdin, tokio::io::stdout()).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
