//! dd-core - Core library for dbdelta
//!
//! This crate provides configuration parsing, the migration file store, the
//! XML definition parser, and the selection logic that reconciles files on
//! disk against the applied-migration ledger.

pub mod config;
pub mod definition;
pub mod direction;
pub mod error;
pub mod migration_id;
pub mod scaffold;
pub mod selection;
pub mod store;

pub use config::{Config, DatabaseConfig};
pub use definition::MigrationDefinition;
pub use direction::Direction;
pub use error::{CoreError, CoreResult};
pub use migration_id::MigrationId;
pub use scaffold::{create_scaffold, scaffold_id};
pub use selection::{select, Selection};
pub use store::MigrationStore;
