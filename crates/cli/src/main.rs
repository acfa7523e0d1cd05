//! StoreDesk CLI - Database migrations and admin user management.
//!
//! # Usage
//!
//! ```bash
//! # Run admin database migrations
//! sd-cli migrate
//!
//! # Create an admin user with the administrator role
//! sd-cli admin create -n "Admin Name" -e admin@example.com -p 0901234567 --password secret1 -r 3
//!
//! # Reset a password
//! sd-cli admin reset-password -e admin@example.com --password newsecret
//!
//! # List admin users
//! sd-cli admin list
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sd-cli")]
#[command(author, version, about = "StoreDesk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Phone number
        #[arg(short, long)]
        phone: String,

        /// Initial password
        #[arg(long)]
        password: String,

        /// Role id to assign (repeatable)
        #[arg(short = 'r', long = "role")]
        role_ids: Vec<i64>,
    },
    /// Replace an admin user's password
    ResetPassword {
        /// Email address of the account
        #[arg(short, long)]
        email: String,

        /// New password
        #[arg(long)]
        password: String,
    },
    /// List admin users with their roles
    List,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        if let commands::CliError::Validation(errors) = &e {
            for error in errors.errors() {
                tracing::error!("  {}: {}", error.field, error.message);
            }
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                name,
                email,
                phone,
                password,
                role_ids,
            } => {
                commands::admin::create_user(&name, &email, &phone, password, role_ids).await?;
            }
            AdminAction::ResetPassword { email, password } => {
                commands::admin::reset_password(&email, password).await?;
            }
            AdminAction::List => commands::admin::list_users().await?,
        },
    }
    Ok(())
}
