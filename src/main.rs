use anyhow::Context;
use clap::Parser;
use oddwatch::cli::{self, Cli, Commands, RunArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Both reqwest and tungstenite pull in rustls; pick the provider once.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match &cli.command {
        None => cli::run::execute(&cli, &RunArgs::default())
            .await
            .context("monitor exited with an error")?,
        Some(Commands::Run(args)) => cli::run::execute(&cli, args)
            .await
            .context("monitor exited with an error")?,
        Some(Commands::Check(args)) => cli::check::execute(&cli, args).await?,
        Some(Commands::Validate) => cli::check::execute_validate(&cli)?,
    }

    Ok(())
}
