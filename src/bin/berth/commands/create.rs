//! `berth create` command

use anyhow::Result;

use berth::builder::BuildOptions;
use berth::ops::{create, CreateOptions};
use berth::RecipeRegistry;

use crate::cli::CreateArgs;
use crate::commands::Session;

pub fn execute(args: CreateArgs, session: &Session) -> Result<()> {
    let settings = session.settings(&args.settings)?;
    let config = &session.config;

    let opts = CreateOptions {
        recipe: args.recipe,
        version: args.version,
        overrides: args.options,
        settings,
        recipes_dir: args
            .recipes_dir
            .unwrap_or_else(|| session.gctx.recipes_dir()),
        package_folder: args.package_folder,
        build: BuildOptions {
            generator: args.generator.or_else(|| config.build.generator.clone()),
            jobs: args.jobs.or(config.build.jobs),
            stream_output: session.shell.is_verbose(),
        },
        offline: args.offline || config.net.offline,
    };

    let result = create(&session.gctx, &session.shell, &RecipeRegistry::new(), &opts)?;
    println!("{}", result.package_folder.display());
    Ok(())
}
