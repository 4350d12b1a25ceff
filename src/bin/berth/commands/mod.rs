//! Command implementations

pub mod clean;
pub mod completions;
pub mod create;
pub mod inspect;
pub mod list;
pub mod toolchain;

use anyhow::Result;

use berth::core::Settings;
use berth::util::config::{load_config, Config, SettingsConfig};
use berth::util::shell::ColorChoice;
use berth::util::{GlobalContext, Shell};

use crate::cli::{Cli, SettingsArgs};

/// State every command starts from: paths, output and merged configuration.
pub struct Session {
    pub gctx: GlobalContext,
    pub shell: Shell,
    pub config: Config,
}

impl Session {
    pub fn new(cli: &Cli) -> Result<Self> {
        let color: ColorChoice = cli.color.parse().map_err(anyhow::Error::msg)?;
        let shell = Shell::from_flags(cli.quiet, cli.verbose, color);
        let gctx = GlobalContext::new(cli.home.clone())?;
        let config = load_config(&gctx.config_path(), &gctx.project_config_path());
        tracing::debug!("berth home: {}", gctx.home().display());

        Ok(Session {
            gctx,
            shell,
            config,
        })
    }

    /// Host settings, overridden by configuration, overridden by flags.
    pub fn settings(&self, args: &SettingsArgs) -> Result<Settings> {
        let mut config = self.config.clone();
        config.merge(Config {
            settings: SettingsConfig {
                os: args.os.clone(),
                arch: args.arch.clone(),
                compiler: args.compiler.clone(),
                build_type: args.build_type.clone(),
            },
            ..Default::default()
        });
        config.apply_settings(Settings::host())
    }
}
