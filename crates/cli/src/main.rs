//! Draft Lookup CLI - Session store migrations and shop session management.
//!
//! # Usage
//!
//! ```bash
//! # Run session store migrations
//! dl-cli migrate
//!
//! # Register (or replace) a shop's offline access token
//! dl-cli session set --shop my-store.myshopify.com --token shpat_xxx --scopes read_draft_orders
//!
//! # Remove a shop
//! dl-cli session remove --shop my-store.myshopify.com
//!
//! # List shops (tokens are never printed)
//! dl-cli session list
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "dl-cli")]
#[command(author, version, about = "Draft lookup CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run session store migrations
    Migrate,
    /// Manage offline shop sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Store an offline access token for a shop, replacing any existing one
    Set {
        /// Shop domain (e.g., my-store.myshopify.com)
        #[arg(short, long)]
        shop: String,

        /// Admin API access token
        #[arg(short, long, env = "SHOPIFY_ADMIN_ACCESS_TOKEN", hide_env_values = true)]
        token: String,

        /// Granted scopes, comma separated
        #[arg(long, value_delimiter = ',')]
        scopes: Vec<String>,

        /// Token expiry (RFC 3339); omit for non-expiring offline tokens
        #[arg(long)]
        expires_at: Option<DateTime<Utc>>,
    },
    /// Remove the stored session for a shop
    Remove {
        /// Shop domain
        #[arg(short, long)]
        shop: String,
    },
    /// List stored sessions
    List,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Session { action } => match action {
            SessionAction::Set {
                shop,
                token,
                scopes,
                expires_at,
            } => commands::session::set(&shop, &token, &scopes, expires_at).await?,
            SessionAction::Remove { shop } => commands::session::remove(&shop).await?,
            SessionAction::List => commands::session::list().await?,
        },
    }
    Ok(())
}
