//! `berth inspect` command

use anyhow::Result;

use berth::ops::{format_report, inspect};
use berth::{Os, RecipeRegistry};

use crate::cli::InspectArgs;

pub fn execute(args: InspectArgs) -> Result<()> {
    let os = match args.os {
        Some(ref os) => os.parse()?,
        None => Os::host(),
    };

    let report = inspect(&RecipeRegistry::new(), &args.recipe, os)?;
    print!("{}", format_report(&report));
    Ok(())
}
