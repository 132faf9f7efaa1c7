// crates/medivault-server/src/main.rs
// MediVault - demo encrypted medical chat assistant

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env files (global first, then project - project overrides)
    if let Some(home) = dirs::home_dir() {
        let _ = dotenvy::from_path(home.join(".medivault/.env"));
    }
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = match &cli.command {
        Commands::Serve { .. } => Level::INFO,
        Commands::Ask { verbose: true, .. } => Level::INFO,
        Commands::Ask { .. } | Commands::Settings { .. } | Commands::Check => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Serve { host, port } => cli::serve::run(host, port).await?,
        Commands::Ask {
            query,
            role,
            proxy,
            offline,
            audit_csv,
            verbose: _,
        } => {
            cli::ask::run(cli::ask::AskArgs {
                query,
                role,
                proxy,
                offline,
                audit_csv,
            })
            .await?
        }
        Commands::Settings { action } => cli::settings::run(action)?,
        Commands::Check => cli::check::run()?,
    }

    Ok(())
}
