//! ShopRate CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run portal database migrations
//! shoprate migrate
//!
//! # Seed the catalog with demo shops
//! shoprate seed
//!
//! # Create an admin account
//! shoprate admin create -u boss -p "a strong password" -e boss@example.com
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the catalog with demo shops
//! - `admin create` - Create admin accounts

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "shoprate")]
#[command(author, version, about = "ShopRate CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the catalog with demo shops
    Seed,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Login username
        #[arg(short, long)]
        username: String,

        /// Password (at least 8 characters)
        #[arg(short, long)]
        password: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// First name
        #[arg(long, default_value = "Portal")]
        first_name: String,

        /// Last name
        #[arg(long, default_value = "Admin")]
        last_name: String,

        /// Phone number
        #[arg(long, default_value = "")]
        phone: String,
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
        Commands::Seed => commands::seed::demo_shops().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                username,
                password,
                email,
                first_name,
                last_name,
                phone,
            } => {
                commands::admin::create_user(
                    &username,
                    &password,
                    &email,
                    &first_name,
                    &last_name,
                    &phone,
                )
                .await?;
            }
        },
    }
    Ok(())
}
