//! Barkeep CLI - a drinks menu service
//!
//! Run `barkeep --help` for usage information.

use barkeep::auth::{KeySet, TokenValidator};
use barkeep::config::Config;
use barkeep::storage::{DrinkStore, FileStore};
use barkeep::web::ApiServer;
use barkeep::{DrinkSummary, Ingredient};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "barkeep",
    about = "A drinks menu service with role-gated management endpoints",
    version
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the menu API server
    Serve {
        /// Address to bind to
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Add a drink directly to the store
    Add {
        /// Drink title
        #[arg(short, long)]
        title: String,

        /// Recipe as JSON (e.g. '[{"name":"milk","color":"white","parts":1}]')
        #[arg(short, long)]
        recipe: String,
    },

    /// Print the menu
    List {
        /// Show full recipes
        #[arg(long)]
        detail: bool,
    },

    /// Remove a drink from the store
    Remove {
        /// Drink ID
        #[arg(short, long)]
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .init();

    // Load configuration
    let config = if let Some(config_path) = &cli.config {
        Config::load(config_path).await?
    } else {
        let default_path = Config::default_path();
        if default_path.exists() {
            Config::load(&default_path).await?
        } else {
            Config::from_env()?
        }
    };

    // Execute command
    match cli.command {
        Commands::Serve { bind } => {
            run_server(config, bind).await?;
        }
        Commands::Add { title, recipe } => {
            add_drink(config, title, recipe).await?;
        }
        Commands::List { detail } => {
            list_menu(config, detail).await?;
        }
        Commands::Remove { id } => {
            remove_drink(config, id).await?;
        }
    }

    Ok(())
}

async fn run_server(
    mut config: Config,
    bind: Option<String>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    config.auth.validate()?;

    let store = FileStore::new(&config.storage.path).await?;

    info!(url = %config.auth.jwks_url(), "Fetching signing keys");
    let keys = KeySet::fetch(&config.auth.jwks_url()).await?;

    let validator = TokenValidator::new(
        keys,
        config.auth.algorithms.clone(),
        config.auth.audience.clone(),
        config.auth.issuer(),
    );

    let server = ApiServer::new(config, Arc::new(store), validator);
    server.run().await?;

    Ok(())
}

async fn add_drink(
    config: Config,
    title: String,
    recipe: String,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let recipe: Vec<Ingredient> = serde_json::from_str(&recipe)?;

    let store = FileStore::new(&config.storage.path).await?;
    let drink = store.insert(title, recipe).await?;

    println!("Added drink #{}: {}", drink.id, drink.title);

    Ok(())
}

async fn list_menu(config: Config, detail: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let store = FileStore::new(&config.storage.path).await?;
    let drinks = store.list().await?;

    if drinks.is_empty() {
        println!("The menu is empty.");
        return Ok(());
    }

    if detail {
        println!("{}", serde_json::to_string_pretty(&drinks)?);
    } else {
        let summaries: Vec<DrinkSummary> = drinks.iter().map(DrinkSummary::from).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    }

    Ok(())
}

async fn remove_drink(config: Config, id: i64) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let store = FileStore::new(&config.storage.path).await?;
    store.delete(id).await?;

    println!("Removed drink #{}", id);

    Ok(())
}
