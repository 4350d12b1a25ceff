//! `berth list` command

use anyhow::Result;

use berth::ops::list_recipes;
use berth::RecipeRegistry;

use crate::cli::ListArgs;
use crate::commands::Session;

pub fn execute(args: ListArgs, session: &Session) -> Result<()> {
    let recipes_dir = args
        .recipes_dir
        .unwrap_or_else(|| session.gctx.recipes_dir());

    for summary in list_recipes(&RecipeRegistry::new(), &recipes_dir) {
        let versions = if summary.versions.is_empty() {
            "(no source table)".to_string()
        } else {
            summary.versions.join(", ")
        };
        println!("{:<10} {}", summary.name, versions);
    }
    Ok(())
}
