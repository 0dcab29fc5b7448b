//! FixHub CLI - snapshot cache inspection and store debugging tools.
//!
//! # Usage
//!
//! ```bash
//! # Print the cached cart snapshot
//! fixhub cache show cart
//!
//! # Remove the cached wishlist snapshot
//! fixhub cache clear wishlist
//!
//! # Print the snapshot cache directory
//! fixhub cache path
//!
//! # Hydrate and print the cart as the configured session sees it
//! fixhub cart show
//!
//! # Same for the wishlist
//! fixhub wishlist show
//! ```
//!
//! # Commands
//!
//! - `cache` - Inspect or clear the local snapshot cache
//! - `cart` - Show the hydrated cart
//! - `wishlist` - Show the hydrated wishlist

#![cfg_attr(not(test), forbid(unsafe_code))]
// CLI output is the product here, not incidental debugging
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

mod commands;

use commands::cache::Slot;

#[derive(Parser)]
#[command(name = "fixhub")]
#[command(author, version, about = "FixHub commerce client tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or clear the local snapshot cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Show the cart as the configured session sees it
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Show the wishlist as the configured session sees it
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Print a slot's cached snapshot
    Show {
        /// Snapshot slot
        #[arg(value_enum)]
        slot: Slot,
    },
    /// Remove a slot's cached snapshot
    Clear {
        /// Snapshot slot
        #[arg(value_enum)]
        slot: Slot,
    },
    /// Print the snapshot cache directory
    Path,
}

#[derive(Subcommand)]
enum CartAction {
    /// Hydrate and print the cart
    Show,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Hydrate and print the wishlist
    Show,
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Initialize tracing
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
        Commands::Cache { action } => match action {
            CacheAction::Show { slot } => commands::cache::show(slot).await?,
            CacheAction::Clear { slot } => commands::cache::clear(slot).await?,
            CacheAction::Path => commands::cache::path(),
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show().await?,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::wishlist::show().await?,
        },
    }
    Ok(())
}
