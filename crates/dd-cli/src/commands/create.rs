//! Create command implementation

use anyhow::{Context, Result};
use chrono::Local;
use dd_core::create_scaffold;

use crate::cli::{CreateArgs, GlobalArgs};
use crate::context::RuntimeContext;

/// Execute the create command
pub fn execute(args: &CreateArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let name = args.id.as_deref().unwrap_or_default();
    let today = Local::now().date_naive();

    let (id, path) = create_scaffold(&ctx.store, name, today, ctx.config.overwrite_scaffolds)
        .context("Failed to create migration")?;

    println!("Created migration {id}");
    if global.verbose {
        println!("  {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
