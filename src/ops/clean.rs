//! Implementation of `berth clean`.

use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Result};

use crate::ops::resolve::lookup_recipe;
use crate::recipes::RecipeRegistry;
use crate::util::fs::remove_dir_all_if_exists;
use crate::util::GlobalContext;

/// Options for the clean command.
#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    /// Only this recipe; everything when `None`
    pub recipe: Option<String>,

    /// Only this version of `recipe`
    pub version: Option<String>,

    /// Remove finished packages too, not only working folders
    pub packages: bool,
}

/// Remove working folders (and optionally packages). Returns the folders
/// that existed and were removed.
pub fn clean(
    gctx: &GlobalContext,
    registry: &RecipeRegistry,
    opts: &CleanOptions,
) -> Result<Vec<PathBuf>> {
    if opts.version.is_some() && opts.recipe.is_none() {
        bail!("--version requires a recipe name");
    }
    if let Some(ref recipe) = opts.recipe {
        lookup_recipe(registry, recipe)?;
    }
    if let Some(ref version) = opts.version {
        if !is_single_component(version) {
            bail!("invalid version `{}`: must be a single path component", version);
        }
    }

    let mut roots = vec![gctx.work_root()];
    if opts.packages {
        roots.push(gctx.packages_root());
    }

    let mut removed = Vec::new();
    for root in roots {
        let mut target = root;
        if let Some(ref recipe) = opts.recipe {
            target.push(recipe);
            if let Some(ref version) = opts.version {
                target.push(version);
            }
        }
        if target.exists() {
            remove_dir_all_if_exists(&target)?;
            tracing::debug!("removed {}", target.display());
            removed.push(target);
        }
    }

    Ok(removed)
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
