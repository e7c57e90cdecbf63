//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// dbdelta - versioned XML schema migrations
#[derive(Parser, Debug)]
#[command(name = "dbdelta")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override database path (DuckDB file or :memory:)
    #[arg(short, long, global = true, env = "DBDELTA_DATABASE")]
    pub database: Option<String>,

    /// Override the migration file directory
    #[arg(short, long, global = true, env = "DBDELTA_DIR")]
    pub migrations_dir: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty migration file named <YYYY-MM-DD>-<id>.xml
    Create(CreateArgs),

    /// Apply pending migrations in ascending order
    Up(MigrateArgs),

    /// Revert applied migrations in descending order
    Down(MigrateArgs),

    /// Show applied, pending, and missing migrations
    Status(StatusArgs),
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Migration name, e.g. add_users_table
    pub id: Option<String>,
}

/// Arguments shared by the up and down commands
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Restrict the run to these migration files (default: all eligible)
    pub ids: Vec<String>,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
