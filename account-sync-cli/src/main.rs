//! Command-line frontend for account-sync
//!
//! Lists, adds, removes and refreshes the accounts kept by the coordinator.
//! Logs go to stderr (`RUST_LOG` controls the level); results go to stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use account_sync_app::{default_config_path, AppConfig, AppState};
use account_sync_core::types::Account;
use account_sync_core::AccountCoordinator;
use account_sync_provider::log_sanitizer::mask_secret;
use account_sync_provider::normalize_endpoint;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `account-sync` command arguments.
#[derive(Debug, Parser)]
#[command(name = "account-sync", about = "Manage synchronized accounts", version)]
struct Cli {
    /// Config file. Defaults to the platform config directory.
    #[arg(long, global = true, value_name = "path")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List stored accounts
    List,
    /// Add an account (refreshed from the API when reachable)
    Add {
        login: String,
        /// API endpoint, e.g. https://api.github.com
        endpoint: String,
        token: String,
    },
    /// Remove an account and its token
    Remove { login: String, endpoint: String },
    /// Refresh every account from the API
    Refresh,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = AppConfig::load(&config_path)
        .await
        .with_context(|| format!("loading {}", config_path.display()))?;
    let state = AppState::from_config(&config).context("initializing account store")?;

    let _errors = state.coordinator.on_did_error(|e| {
        if e.is_expected() {
            tracing::warn!("{e}");
        } else {
            tracing::error!("{e}");
        }
    });

    match cli.command {
        Command::List => {}
        Command::Add {
            login,
            endpoint,
            token,
        } => {
            let account = Account::new(login, normalize_endpoint(&endpoint), token);
            let stored = state.coordinator.add_account(account).await?;
            println!("Added {}", stored.login);
        }
        Command::Remove { login, endpoint } => {
            let target = find(&state.coordinator, &login, &normalize_endpoint(&endpoint))
                .await?
                .with_context(|| format!("no account {login} at {endpoint}"))?;
            state.coordinator.remove_account(&target).await?;
            println!("Removed {login}");
        }
        Command::Refresh => state.coordinator.refresh().await?,
    }

    print_accounts(&state.coordinator.get_all().await?);
    Ok(())
}

async fn find(
    coordinator: &AccountCoordinator,
    login: &str,
    endpoint: &str,
) -> Result<Option<Account>> {
    Ok(coordinator
        .get_all()
        .await?
        .into_iter()
        .find(|a| a.login == login && a.endpoint == endpoint))
}

fn print_accounts(accounts: &[Account]) {
    if accounts.is_empty() {
        println!("No accounts.");
        return;
    }
    for account in accounts {
        println!(
            "{:<20} {:<32} id={:<10} {:<24} {}",
            account.login,
            account.endpoint,
            account.id,
            account.default_email(),
            mask_secret(&account.token)
        );
    }
}
