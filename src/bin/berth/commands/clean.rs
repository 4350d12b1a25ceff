//! `berth clean` command

use anyhow::Result;

use berth::ops::{clean, CleanOptions};
use berth::util::Status;
use berth::RecipeRegistry;

use crate::cli::CleanArgs;
use crate::commands::Session;

pub fn execute(args: CleanArgs, session: &Session) -> Result<()> {
    let opts = CleanOptions {
        recipe: args.recipe,
        version: args.version,
        packages: args.packages,
    };

    let removed = clean(&session.gctx, &RecipeRegistry::new(), &opts)?;
    if removed.is_empty() {
        session.shell.note("nothing to clean");
    }
    for path in removed {
        session.shell.status(Status::Removed, path.display());
    }
    Ok(())
}
