//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// berth - package recipes for native C/C++ libraries
#[derive(Parser)]
#[command(name = "berth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: String,

    /// Directory holding berth's configuration, working folders and packages
    #[arg(long, global = true, env = "BERTH_HOME")]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a recipe and stage its package
    Create(CreateArgs),

    /// Show a recipe's metadata and options for a target OS
    Inspect(InspectArgs),

    /// Print the CMake variables a recipe would be configured with
    Toolchain(ToolchainArgs),

    /// List recipes and the versions their source tables offer
    List(ListArgs),

    /// Remove working folders and, optionally, packages
    Clean(CleanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Target settings shared by commands that configure a recipe.
#[derive(Args, Default)]
pub struct SettingsArgs {
    /// Target operating system (Linux, Windows, Macos)
    #[arg(long)]
    pub os: Option<String>,

    /// Target architecture (x86_64, x86, armv8)
    #[arg(long)]
    pub arch: Option<String>,

    /// Compiler (gcc, clang, apple-clang, msvc)
    #[arg(long)]
    pub compiler: Option<String>,

    /// Build type (Debug, Release, RelWithDebInfo, MinSizeRel)
    #[arg(long)]
    pub build_type: Option<String>,
}

#[derive(Args)]
pub struct CreateArgs {
    /// Recipe name
    pub recipe: String,

    /// Version to build
    #[arg(long)]
    pub version: String,

    /// Option override, `name=value` (repeatable)
    #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
    pub options: Vec<String>,

    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Folder containing one sub-folder per recipe [default: ./recipes]
    #[arg(long)]
    pub recipes_dir: Option<PathBuf>,

    /// Stage the package here instead of under the berth home
    #[arg(long)]
    pub package_folder: Option<PathBuf>,

    /// CMake generator
    #[arg(short = 'G', long)]
    pub generator: Option<String>,

    /// Number of parallel build jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Do not fetch sources over the network
    #[arg(long)]
    pub offline: bool,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Recipe name
    pub recipe: String,

    /// Target operating system [default: host]
    #[arg(long)]
    pub os: Option<String>,
}

#[derive(Args)]
pub struct ToolchainArgs {
    /// Recipe name
    pub recipe: String,

    /// Option override, `name=value` (repeatable)
    #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
    pub options: Vec<String>,

    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Print the toolchain file instead of `NAME=value` lines
    #[arg(long)]
    pub cmake: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Folder containing one sub-folder per recipe [default: ./recipes]
    #[arg(long)]
    pub recipes_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct CleanArgs {
    /// Only this recipe
    pub recipe: Option<String>,

    /// Only this version of the recipe
    #[arg(long, requires = "recipe")]
    pub version: Option<String>,

    /// Remove packages as well as working folders
    #[arg(long)]
    pub packages: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
