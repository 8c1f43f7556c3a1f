//! Deposit Pro CLI - database migrations and shop token management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! deposit-pro-cli migrate
//!
//! # Store an Admin API access token for a shop
//! deposit-pro-cli token set -s your-store.myshopify.com -t shpat_... \
//!     --scopes read_orders,write_orders,write_products
//!
//! # Remove a shop's token
//! deposit-pro-cli token remove -s your-store.myshopify.com
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "deposit-pro-cli")]
#[command(author, version, about = "Deposit Pro CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage stored Admin API access tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Store or replace a shop's access token
    Set {
        /// Shop domain (e.g. your-store.myshopify.com)
        #[arg(short, long)]
        shop: String,

        /// Admin API access token
        #[arg(short, long)]
        token: String,

        /// Comma-separated granted scopes
        #[arg(long, default_value = "")]
        scopes: String,
    },
    /// Remove a shop's access token
    Remove {
        /// Shop domain
        #[arg(short, long)]
        shop: String,
    },
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
        Commands::Token { action } => match action {
            TokenAction::Set {
                shop,
                token,
                scopes,
            } => commands::token::set(&shop, &token, &scopes).await?,
            TokenAction::Remove { shop } => commands::token::remove(&shop).await?,
        },
    }
    Ok(())
}
