//! Runtime context for CLI commands

use anyhow::{Context, Result};
use dd_core::{Config, MigrationStore};
use dd_db::DuckDbBackend;
use dd_ledger::Ledger;
use std::path::Path;

use crate::cli::GlobalArgs;

/// Runtime context containing the loaded config, the migration store, and
/// the database connection
pub struct RuntimeContext {
    /// Effective configuration after CLI overrides
    pub config: Config,

    /// Migration file store (directory exists once this is built)
    pub store: MigrationStore,

    /// Database connection
    pub db: DuckDbBackend,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments.
    ///
    /// Creates the migration directory and the ledger table if either is
    /// missing, so every command starts from a usable project.
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let root = Path::new(&args.project_dir);
        let config = load_config(args, root)?;

        let store = MigrationStore::open(&config.migrations_dir_absolute(root))
            .context("Failed to prepare migration directory")?;

        let db_path = config.database_path(root);
        log::debug!("Opening database {db_path}");
        let db = DuckDbBackend::new(&db_path).context("Failed to connect to database")?;

        let ctx = Self {
            config,
            store,
            db,
        };
        let ledger = ctx.ledger()?;
        ledger
            .ensure_initialized()
            .context("Failed to initialize ledger table")?;
        log::debug!("Using ledger table {}", ledger.table());
        Ok(ctx)
    }

    /// Ledger over this context's database and configured table
    pub fn ledger(&self) -> Result<Ledger<'_>> {
        Ledger::new(&self.db, self.config.ledger_table()).context("Invalid ledger table name")
    }
}

/// Load config from a custom path or the project directory, then apply
/// command-line overrides.
pub(crate) fn load_config(args: &GlobalArgs, root: &Path) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        Config::load(Path::new(config_path)).context("Failed to load configuration file")?
    } else {
        Config::load_from_dir(root).context("Failed to load project configuration")?
    };

    if let Some(dir) = args.migrations_dir.as_deref().filter(|s| !s.is_empty()) {
        config.migrations_dir = dir.to_string();
    }
    if let Some(path) = args.database.as_deref().filter(|s| !s.is_empty()) {
        config.database.path = path.to_string();
    }
    Ok(config)
}
