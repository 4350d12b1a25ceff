//! Implementation of `berth list`.

use std::path::Path;

use crate::core::source_table::SourceTable;
use crate::recipes::RecipeRegistry;

/// A known recipe and the versions its source table offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSummary {
    pub name: &'static str,
    pub description: &'static str,
    /// Empty when the recipe has no readable source table.
    pub versions: Vec<String>,
}

/// Summarize every registered recipe, reading versions from `recipes_dir`.
pub fn list_recipes(registry: &RecipeRegistry, recipes_dir: &Path) -> Vec<RecipeSummary> {
    registry
        .all()
        .map(|recipe| {
            let meta = recipe.metadata();
            let versions = match SourceTable::load(&recipes_dir.join(meta.name)) {
                Ok(table) => table.versions().map(str::to_string).collect(),
                Err(e) => {
                    tracing::debug!("no source table for {}: {:#}", meta.name, e);
                    Vec::new()
                }
            };
            RecipeSummary {
                name: meta.name,
                description: meta.description,
                versions,
            }
        })
        .collect()
}
