//! Scaffold generator for new, empty migration files.

use crate::error::{CoreError, CoreResult};
use crate::migration_id::MigrationId;
use crate::store::MigrationStore;
use chrono::NaiveDate;
use std::path::PathBuf;

/// Template written for every new migration. The empty CDATA sections parse
/// as "no statements", so an unedited scaffold is skipped with a warning.
pub const SCAFFOLD_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<patch>
  <up>
    <sql><![CDATA[ ]]></sql>
  </up>
  <down>
    <sql><![CDATA[ ]]></sql>
  </down>
</patch>
"#;

const EXTENSION: &str = ".xml";

/// Build the identifier `<YYYY-MM-DD>-<name>.xml` for a new migration.
///
/// A trailing `.xml` on `name` is not doubled. Names that are empty or could
/// escape the migration directory are rejected.
pub fn scaffold_id(date: NaiveDate, name: &str) -> CoreResult<MigrationId> {
    let name = name.trim();
    let stem = name.strip_suffix(EXTENSION).unwrap_or(name);
    if stem.is_empty() {
        return Err(CoreError::MissingArgument {
            message: "migration id is required, e.g. `dbdelta create add_users_table`"
                .to_string(),
        });
    }
    if stem.contains('/') || stem.contains('\\') || stem.contains("..") {
        return Err(CoreError::InvalidMigrationName {
            name: name.to_string(),
            reason: "must not contain '/', '\\', or '..'".to_string(),
        });
    }
    Ok(MigrationId::new(format!(
        "{}-{}{}",
        date.format("%Y-%m-%d"),
        stem,
        EXTENSION
    )))
}

/// Create a scaffold file for `name` dated `date` in `store`.
///
/// Returns the new identifier and the path written.
pub fn create_scaffold(
    store: &MigrationStore,
    name: &str,
    date: NaiveDate,
    overwrite: bool,
) -> CoreResult<(MigrationId, PathBuf)> {
    let id = scaffold_id(date, name)?;
    let path = store.write_scaffold(&id, SCAFFOLD_TEMPLATE, overwrite)?;
    log::info!("Created migration scaffold {}", path.display());
    Ok((id, path))
}
