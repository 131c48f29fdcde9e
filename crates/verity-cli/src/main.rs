//! Verity CLI - terminal dashboard for the hallucination checker.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use verity_cli::commands;
use verity_cli::repl;
use verity_cli::{Cli, Command, Config, Formatter, VerityClient};

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr, and only when RUST_LOG asks for them
fn init_tracing() {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

async fn run() -> verity_cli::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|_| {
        let cfg = Config::default();
        cfg.save().ok();
        cfg
    });

    if let Some(server) = cli.server {
        config.server_url = server;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);
    let client = VerityClient::new(&config.server_url)?;

    match cli.command {
        None | Some(Command::Repl) => {
            repl::run_repl(&mut config, &client, &formatter).await?;
        }
        Some(Command::Verify(args)) => {
            commands::execute_verify(args, &config.settings, &client, &formatter).await?;
        }
        Some(Command::Health) => {
            commands::execute_health(&client, &formatter).await?;
        }
        Some(Command::Demo) => {
            commands::execute_demo(&client, &formatter).await?;
        }
    }

    Ok(())
}
