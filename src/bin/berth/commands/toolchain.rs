//! `berth toolchain` command
//!
//! Shows the CMake variables a recipe would be configured with, without
//! fetching or building anything.

use anyhow::Result;

use berth::ops::preview_toolchain;
use berth::RecipeRegistry;

use crate::cli::ToolchainArgs;
use crate::commands::Session;

pub fn execute(args: ToolchainArgs, session: &Session) -> Result<()> {
    let settings = session.settings(&args.settings)?;
    let toolchain = preview_toolchain(&RecipeRegistry::new(), &args.recipe, &args.options, &settings)?;

    if args.cmake {
        print!("{}", toolchain.render());
    } else {
        print!("{}", toolchain.variables());
    }
    Ok(())
}
