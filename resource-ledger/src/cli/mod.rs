//! CLI module for resource-ledger
//!
//! Provides the command-line interface for running the server and
//! applying database migrations.

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Resource ledger - inventory resources with an append-only change history
#[derive(Parser, Debug)]
#[command(name = "resource-ledger")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    LEDGER_HOST                 Bind address (default: 0.0.0.0)
    LEDGER_PORT                 Listen port (default: 3000)
    LEDGER_DATABASE_URL         Database URL (default: sqlite:data/ledger.db)
    LEDGER_JWT_SECRET           JWT signing key (auto-generated if not set)
    LEDGER_JWT_EXPIRATION_HOURS JWT lifetime in hours (default: 72)
    LEDGER_ADMIN_USERNAME       Initial admin username (default: admin)
    LEDGER_ADMIN_PASSWORD       Initial admin password (generated if not set)
    LEDGER_ADMIN_EMAIL          Initial admin email (default: admin@localhost)
    LEDGER_SEED_DATA            Seed sample resources into an empty database
    LEDGER_CORS_ORIGIN          Allowed CORS origin (default: any)
    LEDGER_LOG_LEVEL            Log filter (default: info)
    LEDGER_LOG_DIR              Directory for daily rotated log files
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve(serve::ServeArgs),
    /// Apply database migrations and exit
    Migrate(migrate::MigrateArgs),
}
