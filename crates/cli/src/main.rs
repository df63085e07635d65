//! Stockroom CLI - database migrations and user provisioning.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! stockroom-cli migrate
//!
//! # Create a user (member by default)
//! stockroom-cli user create -e alex@example.com -n "Alex" -p secret1
//!
//! # Create an admin directly
//! stockroom-cli user create -e admin@example.com -p secret1 --role admin
//!
//! # Promote an existing user to admin
//! stockroom-cli user promote -e alex@example.com
//! ```
//!
//! Registration over HTTP always yields members; this binary is the only
//! path that grants the admin role.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "stockroom-cli")]
#[command(author, version, about = "Stockroom CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,

        /// Password (at least 6 characters)
        #[arg(short, long)]
        password: String,

        /// Role (`member`, `admin`)
        #[arg(short, long, default_value = "member")]
        role: String,
    },
    /// Promote an existing user to admin
    Promote {
        /// Email address of the user to promote
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                name,
                password,
                role,
            } => {
                commands::user::create(&email, name.as_deref(), &password, &role).await?;
            }
            UserAction::Promote { email } => {
                commands::user::promote(&email).await?;
            }
        },
    }
    Ok(())
}
