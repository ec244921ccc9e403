//! Tailwater CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! tw-cli migrate
//!
//! # Seed demo vendors and products
//! tw-cli seed
//!
//! # Create a user and print their API token
//! tw-cli token create -e angler@example.com -r customer
//!
//! # Rotate an existing user's token
//! tw-cli token rotate -u <uid>
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the database with demo data
//! - `token` - Create users and mint API tokens

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tw-cli")]
#[command(author, version, about = "Tailwater CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with demo vendors, products, and users
    Seed,
    /// Manage users and API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Create a new user and print their API token
    Create {
        /// User email address
        #[arg(short, long)]
        email: String,

        /// User role (`customer`, `vendor`, `admin`)
        #[arg(short, long, default_value = "customer")]
        role: String,
    },
    /// Rotate an existing user's API token
    Rotate {
        /// User uid
        #[arg(short, long)]
        uid: String,
    },
}

#[tokio::main]
async fn main() {
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::Token { action } => match action {
            TokenAction::Create { email, role } => {
                commands::token::create(&email, &role).await?;
            }
            TokenAction::Rotate { uid } => {
                commands::token::rotate(&uid).await?;
            }
        },
    }
    Ok(())
}
