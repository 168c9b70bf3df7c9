// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shopfloor - shared production-office workspace.
//!
//! This is the binary entry point. `serve` runs an operator session with its
//! background poll loops; the other subcommands inspect and configure storage.

mod employees;
mod serve;
mod shutdown;
mod slots;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use shopfloor_config::ShopfloorConfig;
use shopfloor_core::{Employee, PersistenceGateway, ShopfloorError};
use shopfloor_storage::{SqliteGateway, TimeoutGateway};

/// Shopfloor - shared production-office workspace.
#[derive(Parser, Debug)]
#[command(name = "shopfloor", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run an operator session until interrupted.
    Serve,
    /// Inspect or configure storage slots.
    Slots {
        #[command(subcommand)]
        action: SlotsAction,
    },
    /// List or edit the employee collection.
    Employees {
        #[command(subcommand)]
        action: EmployeesAction,
    },
    /// Validate the configuration and exit.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum SlotsAction {
    /// Show every slot with its usage.
    List {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Set the number of slots.
    Configure {
        /// Slots with ids above this are removed.
        #[arg(long)]
        count: u32,
    },
}

#[derive(Subcommand, Debug)]
enum EmployeesAction {
    /// Show every employee.
    List,
    /// Add an employee, replacing any with the same id.
    Add {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        role: String,
    },
    /// Remove an employee by id.
    Remove {
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Load and validate, printing diagnostics on failure.
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => shopfloor_config::load_and_validate_path(path),
        None => shopfloor_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            shopfloor_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Slots { action }) => match action {
            SlotsAction::List { plain } => slots::run_list(&config, plain).await,
            SlotsAction::Configure { count } => slots::run_configure(&config, count).await,
        },
        Some(Commands::Employees { action }) => match action {
            EmployeesAction::List => employees::run_list(&config).await,
            EmployeesAction::Add { id, name, role } => {
                employees::run_add(&config, Employee { id, name, role }).await
            }
            EmployeesAction::Remove { id } => employees::run_remove(&config, &id).await,
        },
        Some(Commands::Config {
            action: ConfigAction::Check,
        }) => {
            println!(
                "shopfloor: config ok (user={}, database={})",
                config.session.user_name, config.storage.database_path
            );
            Ok(())
        }
        None => {
            println!("shopfloor: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Open the configured SQLite store behind the per-call deadline.
pub(crate) async fn open_gateway(
    config: &ShopfloorConfig,
) -> Result<Arc<dyn PersistenceGateway>, ShopfloorError> {
    let sqlite = SqliteGateway::open(&config.storage).await?;
    Ok(Arc::new(TimeoutGateway::new(
        sqlite,
        config.storage.gateway_timeout(),
    )))
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so command output on stdout stays clean.
pub(crate) fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("shopfloor={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
